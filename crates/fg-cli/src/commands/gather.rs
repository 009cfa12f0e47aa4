//! Gather command implementation

use anyhow::{Context, Result};
use fg_gather::Cardinality;

use crate::cli::{GatherArgs, GlobalArgs, PolicyArg};
use crate::commands::common::selection_request;
use crate::context::RuntimeContext;

/// Execute the gather command
pub async fn execute(args: &GatherArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;

    let mut request = selection_request(&args.selection);
    if let Some(policy) = args.policy {
        if policy == PolicyArg::Null {
            log::warn!("--policy null behaves like omit");
        }
        request = request.on_invalid_reference(policy.into());
    }
    let cardinality = cardinality_for(args);

    if ctx.verbose {
        let sql = ctx.gatherer.plan_sql(&request)?;
        ctx.verbose(&format!("Executing:\n{sql}"));
    }

    let gathered = ctx
        .gatherer
        .gather(request, cardinality)
        .await
        .with_context(|| format!("Failed to gather '{}'", args.selection.table))?;

    ctx.verbose(&format!(
        "Gathered {} '{}' model(s) at depth {}; {} row(s) fetched across {} table(s)",
        gathered.payload().len(),
        gathered.table(),
        gathered.depth(),
        gathered.collection().len(),
        gathered.collection().tables().len()
    ));

    let json = if args.compact {
        serde_json::to_string(gathered.payload())?
    } else {
        serde_json::to_string_pretty(gathered.payload())?
    };
    println!("{json}");
    Ok(())
}

/// Explicit `--cardinality`, else one row for `--id` and every row otherwise.
fn cardinality_for(args: &GatherArgs) -> Cardinality {
    match (args.cardinality, args.selection.id) {
        (Some(explicit), _) => explicit.into(),
        (None, Some(_)) => Cardinality::One,
        (None, None) => Cardinality::Some,
    }
}
