//! Plan command implementation

use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, PlanArgs};
use crate::commands::common::selection_request;
use crate::context::RuntimeContext;

/// Execute the plan command
pub async fn execute(args: &PlanArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let request = selection_request(&args.selection);

    let plan = ctx
        .gatherer
        .plan(request.table(), args.selection.depth.map(Into::into))
        .with_context(|| format!("Failed to plan '{}'", args.selection.table))?;
    ctx.verbose(&format!(
        "{} join(s), {} alias(es) at depth {}",
        plan.joins().len(),
        plan.aliases().len(),
        plan.depth()
    ));

    let sql = ctx
        .gatherer
        .plan_sql(&request)
        .with_context(|| format!("Failed to render SQL for '{}'", args.selection.table))?;
    println!("{sql}");
    Ok(())
}
