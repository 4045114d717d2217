use anyhow::Context;
use frostline_provider::Provider;
use tracing::info;

use super::input::read_state;
use crate::cli::args::UpgradeStateArgs;
use crate::exit_codes::SUCCESS;

pub fn run(args: UpgradeStateArgs) -> anyhow::Result<i32> {
    let state = Provider::load_state(args.kind, &read_state(&args.file)?)
        .with_context(|| format!("failed to upgrade {}", args.file.display()))?;
    info!(kind = %args.kind, version = state.schema_version, "state upgraded");
    println!("{}", state.to_json()?);
    Ok(SUCCESS)
}
