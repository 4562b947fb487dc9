//! Export coordinator - per-page orchestration
//!
//! Pages are processed strictly one after another:
//!
//! 1. already recorded → `Skipped`
//! 2. convert → `Failed` on error
//! 3. create the entry → `Failed` on error
//! 4. inject the attachment → `Partial` on error, recorded or not per policy
//! 5. record in the tracker (persisted before the next page starts)
//!
//! Page-scoped errors become outcomes. Only tracker persistence failures abort the run.

use super::entry::{EntryCreator, NewEntry};
use super::summary::{ExportSummary, FailureStage, PageOutcome};
use crate::adapters::remarkable::NotebookCatalog;
use crate::config::{ExportConfig, InjectionFailurePolicy};
use crate::core::convert::ConversionPipeline;
use crate::core::inject::AttachmentInjector;
use crate::core::state::ExportTracker;
use crate::domain::{ConversionError, InjectionError, PageRecord, Result};
use crate::{log_page_failure, log_page_start};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Export options fixed for the whole run
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Destination journal
    pub journal: String,

    /// Tag naming the source application, added before the notebook name
    pub source_tag: String,

    pub on_injection_failure: InjectionFailurePolicy,
}

impl ExportOptions {
    pub fn new(journal: impl Into<String>, export: &ExportConfig) -> Self {
        Self {
            journal: journal.into(),
            source_tag: export.source_tag.clone(),
            on_injection_failure: export.on_injection_failure,
        }
    }
}

/// Called after each page reaches a terminal state
pub type ProgressCallback = Box<dyn Fn(&PageRecord, &PageOutcome) + Send + Sync>;

/// Export coordinator
pub struct ExportCoordinator {
    pipeline: ConversionPipeline,
    entries: Arc<dyn EntryCreator>,
    injector: AttachmentInjector,
    tracker: ExportTracker,
    options: ExportOptions,
    shutdown_signal: Option<watch::Receiver<bool>>,
    progress: Option<ProgressCallback>,
}

impl ExportCoordinator {
    pub fn new(
        pipeline: ConversionPipeline,
        entries: Arc<dyn EntryCreator>,
        injector: AttachmentInjector,
        tracker: ExportTracker,
        options: ExportOptions,
    ) -> Self {
        Self {
            pipeline,
            entries,
            injector,
            tracker,
            options,
            shutdown_signal: None,
            progress: None,
        }
    }

    /// Stop between pages once the receiver reads `true`
    pub fn with_shutdown_signal(mut self, shutdown_signal: watch::Receiver<bool>) -> Self {
        self.shutdown_signal = Some(shutdown_signal);
        self
    }

    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn tracker(&self) -> &ExportTracker {
        &self.tracker
    }

    /// Export every page of `catalog` not yet recorded
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::AppError::Tracker`] if an exported page could not be
    /// recorded. Pages finished before that stay recorded.
    pub async fn execute_export(&mut self, catalog: &NotebookCatalog) -> Result<ExportSummary> {
        let start_time = Instant::now();
        let mut summary = ExportSummary::new();
        let total = catalog.page_count();

        tracing::info!(
            notebook = %catalog.notebook_name(),
            journal = %self.options.journal,
            already_exported = self.tracker.exported_count(),
            "Starting export"
        );

        for page in catalog.pages() {
            if self.shutdown_requested() {
                tracing::warn!(
                    page_id = %page.page_id,
                    "Shutdown requested, stopping before next page"
                );
                summary.interrupted = true;
                break;
            }

            if self.tracker.is_exported(&page.page_id) {
                tracing::debug!(page_id = %page.page_id, "Already exported, skipping");
                summary.record(&page, PageOutcome::Skipped);
                continue;
            }

            log_page_start!(page.page_id, page.page_index, total);
            let outcome = self.export_page(&page).await?;
            if let Some(progress) = &self.progress {
                progress(&page, &outcome);
            }
            summary.record(&page, outcome);
        }

        summary = summary.with_duration(start_time.elapsed());
        summary.log_summary();
        Ok(summary)
    }

    async fn export_page(&mut self, page: &PageRecord) -> Result<PageOutcome> {
        let image = match self.pipeline.convert(page).await {
            Ok(image) => image,
            Err(e) => {
                if let ConversionError::KnownUnsupportedStroke { .. } = e {
                    tracing::warn!(
                        page_id = %page.page_id,
                        "Page uses highlighter strokes the converter cannot render"
                    );
                }
                log_page_failure!(page.page_id, "conversion", e);
                return Ok(PageOutcome::Failed {
                    stage: FailureStage::Conversion,
                    reason: e.to_string(),
                });
            }
        };

        let entry = NewEntry {
            journal: self.options.journal.clone(),
            date: page.last_modified,
            tags: vec![self.options.source_tag.clone(), page.notebook_name.clone()],
            body: page.entry_body(),
            attachment: image.path().to_path_buf(),
        };

        let created = match self.entries.create_entry(&entry).await {
            Ok(created) => created,
            Err(e) => {
                log_page_failure!(page.page_id, "entry_creation", e);
                return Ok(PageOutcome::Failed {
                    stage: FailureStage::EntryCreation,
                    reason: e.to_string(),
                });
            }
        };

        let injected = match &created.entry_id {
            Some(entry_id) => self.injector.inject(entry_id, image.path()),
            None => Err(InjectionError::MissingEntryId),
        };
        drop(image);

        match injected {
            Ok(handle) => {
                self.tracker.mark_exported(&page.page_id)?;
                tracing::info!(
                    page_id = %page.page_id,
                    entry_id = ?created.entry_id.as_ref().map(ToString::to_string),
                    attachment = %handle.path.display(),
                    "Page exported"
                );
                Ok(PageOutcome::Exported)
            }
            Err(e) => {
                let marked = self.options.on_injection_failure == InjectionFailurePolicy::MarkExported;
                if marked {
                    self.tracker.mark_exported(&page.page_id)?;
                }
                tracing::warn!(
                    page_id = %page.page_id,
                    stage = "injection",
                    reason = %e,
                    marked,
                    "Entry created but attachment is missing"
                );
                Ok(PageOutcome::Partial {
                    reason: e.to_string(),
                    marked,
                })
            }
        }
    }

    fn shutdown_requested(&self) -> bool {
        self.shutdown_signal
            .as_ref()
            .is_some_and(|rx| *rx.borrow())
    }
}
