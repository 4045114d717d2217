use anyhow::Context;
use frostline_provider::Provider;
use tracing::info;

use super::input::{read_attributes, read_state};
use crate::cli::args::PlanArgs;
use crate::exit_codes::{CHANGES_PRESENT, SUCCESS};

pub fn run(args: PlanArgs) -> anyhow::Result<i32> {
    let desired = read_attributes(&args.desired)?;
    let prior = match &args.state {
        Some(path) => Some(
            Provider::load_state(args.kind, &read_state(path)?)
                .with_context(|| format!("failed to load state {}", path.display()))?,
        ),
        None => None,
    };

    let plan = Provider::plan(args.kind, prior.as_ref(), &desired)
        .with_context(|| format!("invalid {} in {}", args.kind, args.desired.display()))?;
    info!(kind = %args.kind, action = ?plan.action, changes = plan.changes.len(), "planned");
    println!("{}", serde_json::to_string_pretty(&plan)?);

    if args.detailed_exitcode && !plan.is_noop() {
        return Ok(CHANGES_PRESENT);
    }
    Ok(SUCCESS)
}
