//! Identifier newtypes
//!
//! Wrappers keep reMarkable page/notebook ids and Day One entry ids from being mixed up.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// reMarkable page identifier
///
/// Assigned by the reMarkable sync store and stable across re-scans, so it is the key
/// the export tracker records.
///
/// # Examples
///
/// ```
/// use remarkable_dayone::domain::ids::PageId;
/// use std::str::FromStr;
///
/// let id = PageId::from_str("0b7a5a2e-6d1c-4a8e-9f52-3f3a52d1c9aa").unwrap();
/// assert_eq!(id.short(), "0b7a5a2e");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(String);

impl PageId {
    /// Creates a new PageId, rejecting blank values and path separators
    ///
    /// Page ids become file names (`<id>.rm`, `<id>.png`), so they must stay a single
    /// path component.
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Page ID cannot be empty".to_string());
        }
        if id.contains('/') || id.contains('\\') || id == ".." {
            return Err(format!("Page ID must not contain path separators: {id}"));
        }
        Ok(Self(id))
    }

    /// Returns the page id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters, used in compact listings
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((end, _)) => &self.0[..end],
            None => &self.0,
        }
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PageId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for PageId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// reMarkable notebook identifier (the `<id>.metadata` file stem)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotebookId(String);

impl NotebookId {
    /// Creates a new NotebookId, rejecting blank values and path separators
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Notebook ID cannot be empty".to_string());
        }
        if id.contains('/') || id.contains('\\') {
            return Err(format!("Notebook ID must not contain path separators: {id}"));
        }
        Ok(Self(id))
    }

    /// Returns the notebook id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NotebookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NotebookId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Day One entry identifier
///
/// Day One stores entry uuids as 32 upper-case hex digits without dashes
/// (`ZENTRY.ZUUID`). Any uuid spelling is accepted and normalised to that form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryId(String);

impl EntryId {
    /// Parses and normalises an entry uuid
    pub fn new(id: &str) -> Result<Self, String> {
        let parsed =
            Uuid::parse_str(id.trim()).map_err(|e| format!("Invalid Day One entry id '{id}': {e}"))?;
        Ok(Self(parsed.simple().to_string().to_uppercase()))
    }

    /// Returns the entry id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntryId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
