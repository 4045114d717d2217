use anyhow::Context;
use tracing::debug;

use super::input::read_attributes;
use crate::cli::args::RenderArgs;
use crate::exit_codes::SUCCESS;

pub fn run(args: RenderArgs) -> anyhow::Result<i32> {
    let attrs = read_attributes(&args.file)?;
    debug!(kind = %args.kind, file = %args.file.display(), "rendering create statement");
    let sql = args
        .kind
        .resource()
        .render_create(&attrs)
        .with_context(|| format!("invalid {} in {}", args.kind, args.file.display()))?;
    println!("{}", frostline_core::redact_statement(&sql));
    Ok(SUCCESS)
}
