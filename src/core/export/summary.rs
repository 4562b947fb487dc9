//! Export summary and reporting
//!
//! Per-page outcomes and the end-of-run counts printed to the user.

use crate::domain::{PageErrorDetail, PageId, PageRecord};
use std::fmt;
use std::time::Duration;

/// Step of the per-page state machine that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    Conversion,
    EntryCreation,
    Injection,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureStage::Conversion => "conversion",
            FailureStage::EntryCreation => "entry creation",
            FailureStage::Injection => "attachment injection",
        };
        f.write_str(name)
    }
}

/// Terminal state of one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Entry created and attachment placed
    Exported,

    /// Already recorded by the tracker
    Skipped,

    /// Nothing was created; retried on the next run
    Failed { stage: FailureStage, reason: String },

    /// The text entry exists but its image is missing
    ///
    /// `marked` tells whether the page was recorded as exported anyway.
    Partial { reason: String, marked: bool },
}

/// Outcome of one page
#[derive(Debug, Clone)]
pub struct PageReport {
    pub page_id: PageId,
    pub page_index: usize,
    pub outcome: PageOutcome,
}

/// Summary of an export run
#[derive(Debug, Clone, Default)]
pub struct ExportSummary {
    /// Pages exported in this run
    pub exported: usize,

    /// Pages skipped because they were already exported
    pub skipped: usize,

    /// Pages that failed before an entry was created
    pub failed: usize,

    /// Pages whose entry was created without its attachment
    pub partial: usize,

    /// Outcomes in processing order
    pub pages: Vec<PageReport>,

    /// Failures and partial exports, with reasons
    pub errors: Vec<PageErrorDetail>,

    /// Duration of the run
    pub duration: Duration,

    /// Set when a shutdown signal stopped the run between pages
    pub interrupted: bool,
}

impl ExportSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Record the outcome of one page
    pub fn record(&mut self, page: &PageRecord, outcome: PageOutcome) {
        match &outcome {
            PageOutcome::Exported => self.exported += 1,
            PageOutcome::Skipped => self.skipped += 1,
            PageOutcome::Failed { stage, reason } => {
                self.failed += 1;
                self.errors.push(
                    PageErrorDetail::new(
                        page.page_id.as_str(),
                        page.page_index,
                        format!("{stage}: {reason}"),
                    )
                    .retryable(),
                );
            }
            PageOutcome::Partial { reason, marked } => {
                self.partial += 1;
                let detail = PageErrorDetail::new(
                    page.page_id.as_str(),
                    page.page_index,
                    format!("entry created without attachment: {reason}"),
                );
                self.errors
                    .push(if *marked { detail } else { detail.retryable() });
            }
        }
        self.pages.push(PageReport {
            page_id: page.page_id.clone(),
            page_index: page.page_index,
            outcome,
        });
    }

    /// Ids of pages with the given outcome kind, in processing order
    pub fn page_ids_where(&self, pred: impl Fn(&PageOutcome) -> bool) -> Vec<&PageId> {
        self.pages
            .iter()
            .filter(|r| pred(&r.outcome))
            .map(|r| &r.page_id)
            .collect()
    }

    /// Whether every attempted page was exported in full
    pub fn is_successful(&self) -> bool {
        self.failed == 0 && self.partial == 0
    }

    /// Whether a plain re-run would retry something
    pub fn has_retryable(&self) -> bool {
        self.errors.iter().any(|e| e.retryable)
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            exported = self.exported,
            skipped = self.skipped,
            failed = self.failed,
            partial = self.partial,
            interrupted = self.interrupted,
            duration_secs = self.duration.as_secs(),
            "Export completed"
        );

        for error in &self.errors {
            tracing::warn!(
                page_id = %error.page_id,
                page_index = error.page_index,
                retryable = error.retryable,
                message = %error.message,
                "Export error"
            );
        }
    }
}
