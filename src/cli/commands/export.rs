//! Export command implementation
//!
//! Runs the export for the configured notebook, or with `--dry-run` lists the pages a
//! run would export without invoking any tool or touching the tracker.

use crate::adapters::converters::{InkscapeStage, RmcStage};
use crate::adapters::dayone::{DayOneCli, DayOneStore};
use crate::adapters::remarkable::{NotebookCatalog, RemarkableCatalog};
use crate::cli::{exit_code_for, RunContext, EXIT_INTERRUPTED, EXIT_OK};
use crate::core::convert::ConversionPipeline;
use crate::core::export::plan::format_local;
use crate::core::export::{
    ExportCoordinator, ExportOptions, ExportPlan, ExportSummary, PageOutcome,
};
use crate::core::inject::AttachmentInjector;
use crate::core::state::{ExportTracker, JsonFileStorage};
use crate::domain::{AppError, PageRecord};
use std::sync::Arc;
use tokio::sync::watch;

/// Execute the export command
pub async fn execute(
    ctx: &RunContext,
    dry_run: bool,
    shutdown_signal: watch::Receiver<bool>,
) -> anyhow::Result<i32> {
    tracing::info!(dry_run, "Starting export command");

    let tracker = match ExportTracker::load(Arc::new(JsonFileStorage::new(&ctx.paths.tracker_path))) {
        Ok(t) => t,
        Err(e) => return Ok(report_fatal(&e)),
    };

    let catalog = match RemarkableCatalog::open(&ctx.paths.source_sync_root)
        .and_then(|c| c.notebook(&tracker.state().notebook_id))
    {
        Ok(c) => c,
        Err(e) => {
            let code = report_fatal(&e);
            if matches!(e, AppError::CatalogUnavailable(_)) {
                println!("  Run `remarkable-dayone --setup` to select a different notebook.");
            }
            return Ok(code);
        }
    };

    if catalog.page_count() == 0 {
        println!("Notebook '{}' has no pages.", catalog.notebook_name());
        return Ok(EXIT_OK);
    }

    let plan = ExportPlan::build(&catalog, &tracker);
    if plan.is_empty() {
        println!(
            "Nothing to export. All {} pages of '{}' are already exported.",
            plan.total_pages, plan.notebook_name
        );
        return Ok(EXIT_OK);
    }

    let journal = tracker.state().journal_id.clone();
    println!(
        "{} {} page(s) from '{}' to Day One journal '{}'",
        if dry_run { "Would export" } else { "Exporting" },
        plan.due.len(),
        plan.notebook_name,
        journal
    );
    if plan.already_exported > 0 {
        println!(
            "  ({} page(s) already exported, skipping)",
            plan.already_exported
        );
    }
    println!();

    if dry_run {
        for line in plan.preview_lines(&ctx.settings.export.date_format) {
            println!("  {line}");
        }
        println!("\nRun without --dry-run to export.");
        return Ok(EXIT_OK);
    }

    let mut coordinator = match build_coordinator(ctx, tracker, &journal) {
        Ok(c) => c.with_shutdown_signal(shutdown_signal),
        Err(e) => return Ok(report_fatal(&e)),
    };

    let total = catalog.page_count();
    let date_format = ctx.settings.export.date_format.clone();
    coordinator = coordinator.with_progress(Box::new(move |page, outcome| {
        println!("  {}", progress_line(page, outcome, total, &date_format));
    }));

    let summary = match coordinator.execute_export(&catalog).await {
        Ok(s) => s,
        Err(e) => return Ok(report_fatal(&e)),
    };

    print_summary(&summary, &catalog);

    if summary.interrupted {
        println!();
        println!("Export interrupted. Progress saved; run again to continue.");
        tracing::info!("Export interrupted by user signal");
        return Ok(EXIT_INTERRUPTED);
    }
    Ok(EXIT_OK)
}

fn build_coordinator(
    ctx: &RunContext,
    tracker: ExportTracker,
    journal: &str,
) -> crate::domain::Result<ExportCoordinator> {
    let tools = &ctx.settings.tools;
    let pipeline = ConversionPipeline::new(
        Arc::new(RmcStage::new(&tools.rmc_bin)),
        Arc::new(InkscapeStage::new(&tools.inkscape_bin)),
        &tools.unsupported_stroke_pattern,
    )?;
    let store = DayOneStore::open(&ctx.paths.target_database, &ctx.paths.target_attachment_dir)?;
    let entries = DayOneCli::new(&tools.dayone_bin, &ctx.settings.export.date_format);

    Ok(ExportCoordinator::new(
        pipeline,
        Arc::new(entries),
        AttachmentInjector::new(Arc::new(store)),
        tracker,
        ExportOptions::new(journal, &ctx.settings.export),
    ))
}

fn progress_line(page: &PageRecord, outcome: &PageOutcome, total: usize, date_format: &str) -> String {
    let status = match outcome {
        PageOutcome::Exported => format!("OK ({})", format_local(page, date_format)),
        PageOutcome::Skipped => "already exported".to_string(),
        PageOutcome::Failed { reason, .. } => format!("FAILED - {reason}"),
        PageOutcome::Partial { reason, .. } => {
            format!("ENTRY CREATED, ATTACHMENT MISSING - {reason}")
        }
    };
    format!("Page {}/{}: {status}", page.page_index, total)
}

fn print_summary(summary: &ExportSummary, catalog: &NotebookCatalog) {
    println!();
    println!(
        "Done! {} page(s) exported, {} error(s).",
        summary.exported,
        summary.failed + summary.partial
    );
    if summary.partial > 0 {
        println!(
            "  {} entr{} created without the page image.",
            summary.partial,
            if summary.partial == 1 { "y was" } else { "ies were" }
        );
    }
    if !summary.errors.is_empty() {
        println!();
        println!("Errors in '{}':", catalog.notebook_name());
        for error in &summary.errors {
            println!(
                "  - Page {} ({}): {}",
                error.page_index, error.page_id, error.message
            );
        }
    }
    if summary.has_retryable() {
        println!("  Re-run to retry failed pages.");
    }
}

fn report_fatal(error: &AppError) -> i32 {
    tracing::error!(error = %error, "Export aborted");
    println!("Error: {error}");
    exit_code_for(error)
}
