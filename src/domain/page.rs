//! Page and notebook domain models

use super::ids::{NotebookId, PageId};
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// One handwritten page of a reMarkable notebook
///
/// `page_id` is the identity; `page_index` is only the position observed at scan time
/// and may shift when pages are inserted or removed elsewhere in the notebook.
///
/// # Examples
///
/// ```
/// use remarkable_dayone::domain::page::PageRecordBuilder;
/// use chrono::{TimeZone, Utc};
///
/// let page = PageRecordBuilder::new()
///     .page_id("p1")
///     .unwrap()
///     .notebook("nb-1", "Morning Pages")
///     .unwrap()
///     .page_index(1)
///     .last_modified(Utc.timestamp_millis_opt(1_700_000_000_000).unwrap())
///     .source_path("/data/nb-1/p1.rm")
///     .build()
///     .unwrap();
///
/// assert_eq!(page.entry_body(), "Page 1 of Morning Pages");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    /// Stable page identifier
    pub page_id: PageId,

    /// Owning notebook identifier
    pub notebook_id: NotebookId,

    /// Owning notebook display name
    pub notebook_name: String,

    /// 1-based position within the notebook at scan time
    pub page_index: usize,

    /// Last edit timestamp, used as the journal entry date
    pub last_modified: DateTime<Utc>,

    /// Location of the raw `.rm` drawing file
    pub source_path: PathBuf,
}

impl PageRecord {
    /// Creates a new builder for constructing a PageRecord
    pub fn builder() -> PageRecordBuilder {
        PageRecordBuilder::default()
    }

    /// Body text of the journal entry created for this page
    pub fn entry_body(&self) -> String {
        format!("Page {} of {}", self.page_index, self.notebook_name)
    }
}

/// Builder for constructing PageRecord instances
#[derive(Debug, Default)]
pub struct PageRecordBuilder {
    page_id: Option<PageId>,
    notebook_id: Option<NotebookId>,
    notebook_name: Option<String>,
    page_index: Option<usize>,
    last_modified: Option<DateTime<Utc>>,
    source_path: Option<PathBuf>,
}

impl PageRecordBuilder {
    /// Creates a new PageRecordBuilder
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page id
    pub fn page_id(mut self, id: impl Into<String>) -> Result<Self, String> {
        self.page_id = Some(PageId::new(id)?);
        Ok(self)
    }

    /// Sets the owning notebook
    pub fn notebook(
        mut self,
        id: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Self, String> {
        self.notebook_id = Some(NotebookId::new(id)?);
        self.notebook_name = Some(name.into());
        Ok(self)
    }

    /// Sets the 1-based page position
    pub fn page_index(mut self, index: usize) -> Self {
        self.page_index = Some(index);
        self
    }

    /// Sets the last-modified timestamp
    pub fn last_modified(mut self, ts: DateTime<Utc>) -> Self {
        self.last_modified = Some(ts);
        self
    }

    /// Sets the `.rm` source path
    pub fn source_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_path = Some(path.into());
        self
    }

    /// Builds the PageRecord
    ///
    /// # Errors
    ///
    /// Returns an error if any required field is missing or the index is zero
    pub fn build(self) -> Result<PageRecord, String> {
        let page_index = self.page_index.ok_or("page_index is required")?;
        if page_index == 0 {
            return Err("page_index is 1-based".to_string());
        }
        Ok(PageRecord {
            page_id: self.page_id.ok_or("page_id is required")?,
            notebook_id: self.notebook_id.ok_or("notebook is required")?,
            notebook_name: self.notebook_name.ok_or("notebook is required")?,
            page_index,
            last_modified: self.last_modified.ok_or("last_modified is required")?,
            source_path: self.source_path.ok_or("source_path is required")?,
        })
    }
}

/// A handwritten notebook found in the sync tree, as listed by setup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotebookSummary {
    /// Notebook identifier
    pub id: NotebookId,

    /// Visible name
    pub name: String,

    /// Visible name of the enclosing folder, empty at the root
    pub folder: String,

    /// Non-deleted pages in the notebook
    pub page_count: usize,

    /// Pages that have drawing content on disk
    pub pages_with_content: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> PageRecordBuilder {
        PageRecordBuilder::new()
            .page_id("p3")
            .unwrap()
            .notebook("nb", "Dream Log")
            .unwrap()
            .page_index(3)
            .last_modified(Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap())
            .source_path("/tmp/nb/p3.rm")
    }

    #[test]
    fn test_build_page_record() {
        let page = sample().build().unwrap();
        assert_eq!(page.page_id.as_str(), "p3");
        assert_eq!(page.notebook_name, "Dream Log");
        assert_eq!(page.entry_body(), "Page 3 of Dream Log");
    }

    #[test]
    fn test_build_rejects_zero_index() {
        let result = sample().page_index(0).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_build_requires_source_path() {
        let result = PageRecordBuilder::new()
            .page_id("p1")
            .unwrap()
            .notebook("nb", "x")
            .unwrap()
            .page_index(1)
            .last_modified(Utc::now())
            .build();
        assert_eq!(result.unwrap_err(), "source_path is required");
    }
}
