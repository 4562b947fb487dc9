//! Export planning
//!
//! Works out which pages a run would export. Used as-is for `--dry-run`; the
//! coordinator applies the same membership test page by page.

use crate::adapters::remarkable::NotebookCatalog;
use crate::core::state::ExportTracker;
use crate::domain::PageRecord;

/// Pages due for export in one notebook
#[derive(Debug, Clone)]
pub struct ExportPlan {
    pub notebook_name: String,

    /// Non-deleted pages in the notebook, blank ones included
    pub total_pages: usize,

    /// Pages already recorded by the tracker
    pub already_exported: usize,

    /// Pages with content not yet exported, in page order
    pub due: Vec<PageRecord>,
}

impl ExportPlan {
    /// Build the plan without side effects
    pub fn build(catalog: &NotebookCatalog, tracker: &ExportTracker) -> Self {
        let due = catalog
            .pages()
            .filter(|page| !tracker.is_exported(&page.page_id))
            .collect();
        Self {
            notebook_name: catalog.notebook_name().to_string(),
            total_pages: catalog.page_count(),
            already_exported: tracker.exported_count(),
            due,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.due.is_empty()
    }

    /// One preview line per due page: `Page N: <id prefix>... (<date>)`
    pub fn preview_lines(&self, date_format: &str) -> Vec<String> {
        self.due
            .iter()
            .map(|page| {
                format!(
                    "Page {}: {}... ({})",
                    page.page_index,
                    page.page_id.short(),
                    format_local(page, date_format)
                )
            })
            .collect()
    }
}

/// Page timestamp in local time, as used for the entry date
pub fn format_local(page: &PageRecord, date_format: &str) -> String {
    page.last_modified
        .with_timezone(&chrono::Local)
        .format(date_format)
        .to_string()
}
