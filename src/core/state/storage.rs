//! Tracker storage backends

use super::record::TrackerState;
use crate::domain::{AppError, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Whole-document persistence for the tracker record
pub trait TrackerStorage: Send + Sync {
    /// Read the stored record
    ///
    /// Returns `Ok(None)` when nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the record exists but cannot be read or parsed.
    fn load(&self) -> Result<Option<TrackerState>>;

    /// Durably replace the stored record
    ///
    /// # Errors
    ///
    /// Returns an error if the record could not be written; the previous record is
    /// then still intact.
    fn save(&self, state: &TrackerState) -> Result<()>;
}

/// Pretty-printed JSON file, replaced atomically on every save
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the JSON file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tracker_error(&self, action: &str, err: impl std::fmt::Display) -> AppError {
        AppError::Tracker(format!("Failed to {action} {}: {err}", self.path.display()))
    }
}

impl TrackerStorage for JsonFileStorage {
    fn load(&self) -> Result<Option<TrackerState>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path).map_err(|e| self.tracker_error("read", e))?;
        let state = serde_json::from_str(&contents).map_err(|e| self.tracker_error("parse", e))?;
        Ok(Some(state))
    }

    fn save(&self, state: &TrackerState) -> Result<()> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent).map_err(|e| self.tracker_error("create directory for", e))?;

        // Temp file lives beside the target so the rename stays on one filesystem
        let mut tmp = NamedTempFile::new_in(&parent).map_err(|e| self.tracker_error("stage", e))?;
        serde_json::to_writer_pretty(&mut tmp, state).map_err(|e| self.tracker_error("encode", e))?;
        tmp.write_all(b"\n")
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| self.tracker_error("write", e))?;
        tmp.persist(&self.path)
            .map_err(|e| self.tracker_error("replace", e.error))?;

        if let Ok(dir) = fs::File::open(&parent) {
            let _ = dir.sync_all();
        }

        tracing::debug!(
            path = %self.path.display(),
            exported = state.exported_pages.len(),
            "Tracker saved"
        );
        Ok(())
    }
}
