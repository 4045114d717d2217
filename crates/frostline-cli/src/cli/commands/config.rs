use std::fs;

use anyhow::Context;
use frostline_core::ProviderConfig;
use tracing::debug;

use crate::cli::args::ConfigArgs;
use crate::exit_codes::SUCCESS;

pub fn run(args: ConfigArgs) -> anyhow::Result<i32> {
    let config = match &args.file {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            ProviderConfig::from_yaml_str(&content)
                .with_context(|| format!("invalid provider configuration in {}", path.display()))?
        }
        None => ProviderConfig::from_env(),
    };
    debug!(from_file = args.file.is_some(), "provider configuration resolved");
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(SUCCESS)
}
