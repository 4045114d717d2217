use super::super::args::{Cli, Command};
use crate::exit_codes::SUCCESS;
use frostline_provider::ResourceKind;

pub fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Render(args) => super::render::run(args),
        Command::Plan(args) => super::plan::run(args),
        Command::UpgradeState(args) => super::upgrade_state::run(args),
        Command::Config(args) => super::config::run(args),
        Command::Kinds => {
            for kind in ResourceKind::ALL {
                println!("{kind}");
            }
            Ok(SUCCESS)
        }
    }
}
