//! Day One SQLite store
//!
//! Read-only access to `DayOne.sqlite` (Core Data schema). Only two things are read:
//! journal names for setup, and the attachment row the CLI reserved for a new entry.

use crate::core::inject::{AttachmentLocator, PendingAttachment};
use crate::domain::{AppError, EntryId, InjectionError, Result};
use rusqlite::{Connection, OpenFlags, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const DEFAULT_ATTACHMENT_TYPE: &str = "png";

/// Read-only handle on the Day One database
pub struct DayOneStore {
    conn: Mutex<Connection>,
    attachment_dir: PathBuf,
}

impl DayOneStore {
    /// Open the database
    ///
    /// # Errors
    ///
    /// Returns [`AppError::TargetDatabase`] if the file is missing, cannot be opened,
    /// or does not look like a Day One database.
    pub fn open(database: impl AsRef<Path>, attachment_dir: impl Into<PathBuf>) -> Result<Self> {
        let database = database.as_ref();
        if !database.is_file() {
            return Err(AppError::TargetDatabase(format!(
                "Day One database not found at {}",
                database.display()
            )));
        }

        let conn = Connection::open_with_flags(
            database,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| {
            AppError::TargetDatabase(format!("Cannot open {}: {e}", database.display()))
        })?;

        conn.query_row("SELECT COUNT(*) FROM ZJOURNAL", [], |row| row.get::<_, i64>(0))
            .map_err(|e| {
                AppError::TargetDatabase(format!(
                    "{} is not a readable Day One database: {e}",
                    database.display()
                ))
            })?;

        tracing::debug!(database = %database.display(), "Opened Day One database");
        Ok(Self {
            conn: Mutex::new(conn),
            attachment_dir: attachment_dir.into(),
        })
    }

    /// Journal names, deduplicated and sorted
    pub fn list_journals(&self) -> Result<Vec<String>> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| AppError::TargetDatabase("connection lock poisoned".to_string()))?;
        let mut stmt = conn.prepare("SELECT ZNAME FROM ZJOURNAL WHERE ZNAME IS NOT NULL")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut journals = Vec::new();
        for name in rows {
            let name = name?;
            if !name.trim().is_empty() {
                journals.push(name);
            }
        }
        journals.sort();
        journals.dedup();
        Ok(journals)
    }

    pub fn attachment_dir(&self) -> &Path {
        &self.attachment_dir
    }
}

impl AttachmentLocator for DayOneStore {
    fn find_pending_attachment(
        &self,
        entry_id: &EntryId,
    ) -> std::result::Result<Option<PendingAttachment>, InjectionError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| InjectionError::Lookup("connection lock poisoned".to_string()))?;

        let row = conn
            .query_row(
                "SELECT a.ZIDENTIFIER, a.ZMD5, a.ZTYPE
                 FROM ZATTACHMENT a
                 JOIN ZENTRY e ON a.ZENTRY = e.Z_PK
                 WHERE e.ZUUID = ?1
                 ORDER BY a.Z_PK DESC
                 LIMIT 1",
                [entry_id.as_str()],
                |row| {
                    Ok((
                        row.get::<_, Option<String>>(0)?,
                        row.get::<_, Option<String>>(1)?,
                        row.get::<_, Option<String>>(2)?,
                    ))
                },
            )
            .optional()
            .map_err(|e| InjectionError::Lookup(e.to_string()))?;

        let Some((Some(identifier), md5, kind)) = row else {
            return Ok(None);
        };

        Ok(Some(PendingAttachment {
            file_stem: md5
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| identifier.clone()),
            extension: kind
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| DEFAULT_ATTACHMENT_TYPE.to_string()),
            identifier,
        }))
    }

    fn expected_path(&self, attachment: &PendingAttachment) -> PathBuf {
        self.attachment_dir
            .join(format!("{}.{}", attachment.file_stem, attachment.extension))
    }
}
