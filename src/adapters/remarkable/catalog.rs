//! Page catalog reader
//!
//! Read-only view over the reMarkable desktop sync tree:
//!
//! ```text
//! <data dir>/<notebook>.metadata      type, parent (trash), visibleName
//! <data dir>/<notebook>.content       fileType, page list
//! <data dir>/<notebook>/<page>.rm     drawing content (absent for blank pages)
//! ```

use super::models::{ContentPage, DocumentContent, DocumentMetadata};
use crate::domain::ids::{NotebookId, PageId};
use crate::domain::page::{NotebookSummary, PageRecord};
use crate::domain::{AppError, Result};
use chrono::{DateTime, TimeZone, Utc};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// Entry point into a reMarkable sync tree
#[derive(Debug, Clone)]
pub struct RemarkableCatalog {
    data_dir: PathBuf,
}

impl RemarkableCatalog {
    /// Open the sync tree
    ///
    /// # Errors
    ///
    /// Returns [`AppError::CatalogUnavailable`] if the directory does not exist.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        if !data_dir.is_dir() {
            return Err(AppError::CatalogUnavailable(format!(
                "reMarkable data directory not found: {}. Make sure the reMarkable desktop app is installed and has synced.",
                data_dir.display()
            )));
        }
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// All handwritten, non-trashed notebooks, sorted by name (case-insensitive)
    ///
    /// Unreadable metadata or content files are skipped.
    pub fn discover_notebooks(&self) -> Result<Vec<NotebookSummary>> {
        let entries = fs::read_dir(&self.data_dir).map_err(|e| {
            AppError::CatalogUnavailable(format!(
                "Failed to read {}: {e}",
                self.data_dir.display()
            ))
        })?;

        let mut notebooks = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("metadata") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let Ok(id) = NotebookId::new(stem) else {
                continue;
            };

            let Ok(meta) = read_json::<DocumentMetadata>(&path) else {
                tracing::debug!(path = %path.display(), "Skipping unreadable metadata");
                continue;
            };
            if !meta.is_live_document() {
                continue;
            }
            let Ok(content) = read_json::<DocumentContent>(&self.content_path(&id)) else {
                continue;
            };
            if !content.is_notebook() {
                continue;
            }
            let Ok(pages) = content.live_pages() else {
                tracing::debug!(notebook_id = %id, "Skipping notebook with malformed page list");
                continue;
            };

            let notebook_dir = self.data_dir.join(id.as_str());
            let pages_with_content = pages
                .iter()
                .filter(|p| PageId::new(p.id.as_str()).is_ok_and(|id| rm_path(&notebook_dir, &id).exists()))
                .count();

            notebooks.push(NotebookSummary {
                folder: self.folder_name(&meta.parent),
                name: display_name(&meta),
                page_count: pages.len(),
                pages_with_content,
                id,
            });
        }

        notebooks.sort_by_key(|n| n.name.to_lowercase());
        Ok(notebooks)
    }

    /// Page listing for one notebook
    ///
    /// # Errors
    ///
    /// Returns [`AppError::CatalogUnavailable`] if the notebook is missing, trashed,
    /// not a handwritten notebook, or its files cannot be parsed.
    pub fn notebook(&self, id: &NotebookId) -> Result<NotebookCatalog> {
        let meta_path = self.data_dir.join(format!("{}.metadata", id.as_str()));
        if !meta_path.exists() {
            return Err(AppError::CatalogUnavailable(format!(
                "Notebook {id} not found in reMarkable data. It may have been deleted or the data hasn't synced."
            )));
        }
        let meta: DocumentMetadata = read_json(&meta_path)?;
        if !meta.is_live_document() {
            return Err(AppError::CatalogUnavailable(format!(
                "Notebook '{}' ({id}) is in the trash or no longer a document",
                display_name(&meta)
            )));
        }

        let content_path = self.content_path(id);
        let content: DocumentContent = read_json(&content_path)?;
        if !content.is_notebook() {
            return Err(AppError::CatalogUnavailable(format!(
                "'{}' ({id}) is a {} import, not a handwritten notebook",
                display_name(&meta),
                content.file_type
            )));
        }

        let pages = content.live_pages().map_err(|e| {
            AppError::CatalogUnavailable(format!(
                "Malformed cPages in {}: {e}",
                content_path.display()
            ))
        })?;

        Ok(NotebookCatalog {
            notebook_id: id.clone(),
            notebook_name: display_name(&meta),
            notebook_dir: self.data_dir.join(id.as_str()),
            pages,
        })
    }

    fn content_path(&self, id: &NotebookId) -> PathBuf {
        self.data_dir.join(format!("{}.content", id.as_str()))
    }

    fn folder_name(&self, parent: &str) -> String {
        if parent.is_empty() || parent == DocumentMetadata::TRASH {
            return String::new();
        }
        read_json::<DocumentMetadata>(&self.data_dir.join(format!("{parent}.metadata")))
            .map(|m| m.visible_name)
            .unwrap_or_default()
    }
}

/// Ordered pages of one notebook, as seen at scan time
///
/// [`pages`](Self::pages) can be called any number of times; each call walks the same
/// listing again.
#[derive(Debug, Clone)]
pub struct NotebookCatalog {
    notebook_id: NotebookId,
    notebook_name: String,
    notebook_dir: PathBuf,
    pages: Vec<ContentPage>,
}

impl NotebookCatalog {
    pub fn notebook_id(&self) -> &NotebookId {
        &self.notebook_id
    }

    pub fn notebook_name(&self) -> &str {
        &self.notebook_name
    }

    /// Non-deleted pages, blank ones included
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Pages with drawing content, ascending by position
    ///
    /// Blank pages (no `.rm` file) are skipped but still count towards the position
    /// of later pages.
    pub fn pages(&self) -> impl Iterator<Item = PageRecord> + '_ {
        self.pages
            .iter()
            .enumerate()
            .filter_map(move |(i, page)| self.page_record(i + 1, page))
    }

    fn page_record(&self, page_index: usize, page: &ContentPage) -> Option<PageRecord> {
        let page_id = match PageId::new(page.id.as_str()) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(page_id = %page.id, error = %e, "Skipping page with unusable id");
                return None;
            }
        };
        let source_path = rm_path(&self.notebook_dir, &page_id);
        if !source_path.is_file() {
            return None;
        }

        let last_modified = match Utc.timestamp_millis_opt(page.modified_ms).single() {
            Some(ts) if page.modified_ms > 0 => ts,
            _ => match fs::metadata(&source_path).and_then(|m| m.modified()) {
                Ok(mtime) => DateTime::<Utc>::from(mtime),
                Err(e) => {
                    tracing::warn!(
                        page_id = %page.id,
                        error = %e,
                        "Cannot determine page timestamp, skipping"
                    );
                    return None;
                }
            },
        };

        Some(PageRecord {
            page_id,
            notebook_id: self.notebook_id.clone(),
            notebook_name: self.notebook_name.clone(),
            page_index,
            last_modified,
            source_path,
        })
    }
}

fn rm_path(notebook_dir: &Path, page_id: &PageId) -> PathBuf {
    notebook_dir.join(format!("{}.rm", page_id.as_str()))
}

fn display_name(meta: &DocumentMetadata) -> String {
    if meta.visible_name.is_empty() {
        "(unnamed)".to_string()
    } else {
        meta.visible_name.clone()
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path).map_err(|e| {
        AppError::CatalogUnavailable(format!("Failed to read {}: {e}", path.display()))
    })?;
    serde_json::from_str(&contents).map_err(|e| {
        AppError::CatalogUnavailable(format!("Malformed {}: {e}", path.display()))
    })
}
