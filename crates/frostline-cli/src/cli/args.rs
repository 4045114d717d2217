use std::path::PathBuf;

use clap::{Parser, Subcommand};
use frostline_provider::ResourceKind;

#[derive(Parser)]
#[command(
    name = "frostline",
    version,
    about = "Declarative masking policies, tag attachments, column applications and accounts"
)]
pub struct Cli {
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the statement that would create a resource
    Render(RenderArgs),
    /// Plan a desired resource against persisted state
    Plan(PlanArgs),
    /// Upgrade a persisted state envelope to the current schema version
    UpgradeState(UpgradeStateArgs),
    /// Print the resolved provider configuration as JSON
    Config(ConfigArgs),
    /// List supported resource kinds
    Kinds,
}

fn parse_kind(s: &str) -> Result<ResourceKind, String> {
    s.parse().map_err(|e: frostline_core::ProviderError| e.to_string())
}

#[derive(Parser, Debug)]
pub struct RenderArgs {
    #[arg(value_parser = parse_kind)]
    pub kind: ResourceKind,

    /// YAML document with the resource's attributes
    pub file: PathBuf,
}

#[derive(Parser, Debug)]
pub struct PlanArgs {
    #[arg(value_parser = parse_kind)]
    pub kind: ResourceKind,

    /// YAML document with the desired attributes
    #[arg(long)]
    pub desired: PathBuf,

    /// JSON state envelope; omitted means the resource does not exist yet
    #[arg(long)]
    pub state: Option<PathBuf>,

    /// Exit with 1 when the plan is not a no-op
    #[arg(long)]
    pub detailed_exitcode: bool,
}

#[derive(Parser, Debug)]
pub struct UpgradeStateArgs {
    #[arg(value_parser = parse_kind)]
    pub kind: ResourceKind,

    /// JSON state envelope
    pub file: PathBuf,
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// YAML provider configuration; without it the FROSTLINE_* environment is used
    #[arg(long)]
    pub file: Option<PathBuf>,
}
