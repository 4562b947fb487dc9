//! Status command implementation
//!
//! Shows the current selection and how many pages are exported or still pending.

use crate::adapters::remarkable::RemarkableCatalog;
use crate::cli::{exit_code_for, RunContext, EXIT_OK};
use crate::core::export::ExportPlan;
use crate::core::state::{ExportTracker, JsonFileStorage};
use std::sync::Arc;

/// Execute the status command
pub fn execute(ctx: &RunContext) -> anyhow::Result<i32> {
    tracing::info!("Checking export status");

    let tracker = match ExportTracker::load(Arc::new(JsonFileStorage::new(&ctx.paths.tracker_path))) {
        Ok(t) => t,
        Err(e) => {
            println!("Error: {e}");
            return Ok(exit_code_for(&e));
        }
    };
    let state = tracker.state();

    println!("Export Status");
    println!();
    println!("  Notebook: {} ({})", state.notebook_name, state.notebook_id);
    println!("  Journal:  {}", state.journal_id);
    println!("  Config:   {}", ctx.paths.tracker_path.display());
    println!("  Exported: {} page(s)", tracker.exported_count());

    match RemarkableCatalog::open(&ctx.paths.source_sync_root)
        .and_then(|c| c.notebook(&state.notebook_id))
    {
        Ok(catalog) => {
            let plan = ExportPlan::build(&catalog, &tracker);
            println!(
                "  Pending:  {} of {} page(s)",
                plan.due.len(),
                plan.total_pages
            );
        }
        Err(e) => {
            tracing::warn!(error = %e, "Cannot read notebook for status");
            println!("  Pending:  unknown ({e})");
        }
    }

    Ok(EXIT_OK)
}
