//! Journal entry creation capability

use crate::domain::{EntryCreationError, EntryId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// A journal entry to create for one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    /// Destination journal name
    pub journal: String,

    /// Entry date
    pub date: DateTime<Utc>,

    pub tags: Vec<String>,

    pub body: String,

    /// Image the target should attach
    pub attachment: PathBuf,
}

/// Result of a successful entry creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedEntry {
    /// Identifier of the new entry, when the command reported one
    pub entry_id: Option<EntryId>,
}

/// Creates entries in the target journaling application
#[async_trait]
pub trait EntryCreator: Send + Sync {
    async fn create_entry(&self, entry: &NewEntry) -> Result<CreatedEntry, EntryCreationError>;
}
