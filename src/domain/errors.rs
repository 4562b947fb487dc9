//! Domain error types
//!
//! Fatal, run-wide failures are [`AppError`]. Failures scoped to a single page
//! ([`ConversionError`], [`EntryCreationError`], [`InjectionError`]) are caught by the
//! export coordinator and turned into per-page outcomes; they never abort a run.

use std::path::PathBuf;
use thiserror::Error;

/// Main application error type
///
/// Every variant is fatal to the command that produced it.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors (settings file, tracker selection missing)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The reMarkable sync tree is missing or malformed
    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// The tracker configuration file is unreadable, corrupt or could not be written
    #[error("Export tracker error: {0}")]
    Tracker(String),

    /// The Day One database could not be opened or queried
    #[error("Day One database error: {0}")]
    TargetDatabase(String),

    /// Interactive setup has nothing to offer
    #[error("Setup error: {0}")]
    Setup(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

/// Failure of the conversion pipeline for one page
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConversionError {
    /// A stage exited non-zero, could not be started, or produced no output
    #[error("{stage} conversion failed: {detail}")]
    ConversionFailed { stage: String, detail: String },

    /// The page contains highlighter strokes the drawing decoder cannot handle
    #[error("unsupported highlighter stroke: {detail}")]
    KnownUnsupportedStroke { detail: String },
}

impl ConversionError {
    /// Name of the stage that failed
    pub fn stage(&self) -> &str {
        match self {
            ConversionError::ConversionFailed { stage, .. } => stage,
            ConversionError::KnownUnsupportedStroke { .. } => "rmc",
        }
    }
}

/// Failure of the Day One entry-creation command
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EntryCreationError {
    /// The command could not be started
    #[error("failed to run dayone: {0}")]
    Spawn(String),

    /// The command exited non-zero
    #[error("dayone failed: {0}")]
    Rejected(String),
}

/// Failure to place the generated image where Day One expects it
///
/// The text entry already exists when any of these occur.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InjectionError {
    /// The entry-creation output did not name the created entry
    #[error("dayone did not report the created entry id")]
    MissingEntryId,

    /// No attachment row was reserved for the entry
    #[error("no pending attachment found for entry {0}")]
    NoPendingAttachment(String),

    /// Querying the Day One database failed
    #[error("attachment lookup failed: {0}")]
    Lookup(String),

    /// The expected directory is missing or the copy failed
    #[error("could not write attachment to {}: {detail}", .path.display())]
    InjectionFailed { path: PathBuf, detail: String },
}

/// Per-page failure detail recorded in the export summary
#[derive(Debug, Clone)]
pub struct PageErrorDetail {
    /// Page identifier
    pub page_id: String,

    /// 1-based page position in the notebook
    pub page_index: usize,

    /// Error message
    pub message: String,

    /// Whether a plain re-run will retry this page
    pub retryable: bool,
}

impl PageErrorDetail {
    /// Creates a new page error detail
    pub fn new(page_id: impl Into<String>, page_index: usize, message: impl Into<String>) -> Self {
        Self {
            page_id: page_id.into(),
            page_index,
            message: message.into(),
            retryable: false,
        }
    }

    /// Marks the error as retryable
    pub fn retryable(mut self) -> Self {
        self.retryable = true;
        self
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        AppError::TargetDatabase(err.to_string())
    }
}
