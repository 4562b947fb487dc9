//! Export tracker
//!
//! Owns the tracker record for the duration of a run. Nothing else mutates it.

use super::record::TrackerState;
use super::storage::TrackerStorage;
use crate::domain::ids::PageId;
use crate::domain::{AppError, Result};
use std::collections::HashSet;
use std::sync::Arc;

/// Membership test and durable recording of exported pages
///
/// Every successful [`mark_exported`](Self::mark_exported) persists the whole record
/// before returning, so an interrupted run leaves exactly the pages finished so far
/// recorded.
pub struct ExportTracker {
    storage: Arc<dyn TrackerStorage>,
    state: TrackerState,
    index: HashSet<PageId>,
}

impl ExportTracker {
    /// Wrap an in-memory record without touching storage
    pub fn new(storage: Arc<dyn TrackerStorage>, state: TrackerState) -> Self {
        let index = state.exported_pages.iter().cloned().collect();
        Self {
            storage,
            state,
            index,
        }
    }

    /// Load the record from storage
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Configuration`] if nothing has been set up yet, or
    /// [`AppError::Tracker`] if the stored record is unreadable.
    pub fn load(storage: Arc<dyn TrackerStorage>) -> Result<Self> {
        let state = storage.load()?.ok_or_else(|| {
            AppError::Configuration(
                "No configuration found. Run `remarkable-dayone --setup` first.".to_string(),
            )
        })?;
        tracing::debug!(
            notebook_id = %state.notebook_id,
            exported = state.exported_pages.len(),
            "Tracker loaded"
        );
        Ok(Self::new(storage, state))
    }

    /// Current record
    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    /// Whether the page has already produced an entry
    pub fn is_exported(&self, page_id: &PageId) -> bool {
        self.index.contains(page_id)
    }

    /// Number of recorded pages
    pub fn exported_count(&self) -> usize {
        self.index.len()
    }

    /// Record a page as exported and persist
    ///
    /// Returns `Ok(false)` without writing if the page was already recorded. If
    /// persisting fails the page is not recorded in memory either.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Tracker`] if the record could not be saved.
    pub fn mark_exported(&mut self, page_id: &PageId) -> Result<bool> {
        if self.index.contains(page_id) {
            return Ok(false);
        }

        self.state.exported_pages.push(page_id.clone());
        if let Err(e) = self.save() {
            self.state.exported_pages.pop();
            return Err(e);
        }
        self.index.insert(page_id.clone());

        tracing::debug!(page_id = %page_id, exported = self.index.len(), "Page recorded");
        Ok(true)
    }

    /// Persist the whole record
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Tracker`] if the record could not be saved.
    pub fn save(&self) -> Result<()> {
        self.storage.save(&self.state)
    }
}
