//! Attachment injection
//!
//! The `dayone` CLI reserves an attachment for a new entry but cannot copy the image
//! into Day One's sandboxed photo directory. The injector looks up what was reserved
//! and puts the file where Day One will look for it.

use crate::domain::{EntryId, InjectionError};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;

/// An attachment row reserved by the target application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAttachment {
    /// Attachment identifier
    pub identifier: String,

    /// File name stem the storage layer expects
    pub file_stem: String,

    /// File extension without the dot
    pub extension: String,
}

/// Where an attachment was placed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentHandle {
    pub identifier: String,
    pub path: PathBuf,
}

/// Narrow view onto the target application's store
pub trait AttachmentLocator: Send + Sync {
    /// Most recently reserved attachment of `entry_id`, if any
    fn find_pending_attachment(
        &self,
        entry_id: &EntryId,
    ) -> Result<Option<PendingAttachment>, InjectionError>;

    /// Path the target expects the attachment file at
    fn expected_path(&self, attachment: &PendingAttachment) -> PathBuf;
}

/// Places generated images at the path the target expects
#[derive(Clone)]
pub struct AttachmentInjector {
    locator: Arc<dyn AttachmentLocator>,
}

impl AttachmentInjector {
    pub fn new(locator: Arc<dyn AttachmentLocator>) -> Self {
        Self { locator }
    }

    /// Copy `image` into place for the entry just created
    ///
    /// Must only be called after entry creation returned successfully.
    ///
    /// # Errors
    ///
    /// - [`InjectionError::NoPendingAttachment`] if nothing was reserved for the entry
    /// - [`InjectionError::Lookup`] if the store cannot be queried
    /// - [`InjectionError::InjectionFailed`] if the directory is missing or the copy fails
    pub fn inject(
        &self,
        entry_id: &EntryId,
        image: &Path,
    ) -> Result<AttachmentHandle, InjectionError> {
        let pending = self
            .locator
            .find_pending_attachment(entry_id)?
            .ok_or_else(|| InjectionError::NoPendingAttachment(entry_id.to_string()))?;

        let path = self.locator.expected_path(&pending);
        copy_into_place(image, &path)?;

        tracing::debug!(
            entry_id = %entry_id,
            attachment_id = %pending.identifier,
            path = %path.display(),
            "Attachment placed"
        );

        Ok(AttachmentHandle {
            identifier: pending.identifier,
            path,
        })
    }
}

// Written to a temp file beside the destination and renamed, so Day One never sees a
// half-copied image.
fn copy_into_place(source: &Path, dest: &Path) -> Result<(), InjectionError> {
    let failed = |detail: String| InjectionError::InjectionFailed {
        path: dest.to_path_buf(),
        detail,
    };

    let dir = match dest.parent() {
        Some(dir) if dir.is_dir() => dir,
        Some(dir) => {
            return Err(failed(format!(
                "attachment directory {} does not exist",
                dir.display()
            )))
        }
        None => return Err(failed("path has no parent directory".to_string())),
    };

    let mut input = File::open(source).map_err(|e| failed(format!("cannot read image: {e}")))?;
    let mut tmp = NamedTempFile::new_in(dir)
        .map_err(|e| failed(format!("directory is not writable: {e}")))?;
    io::copy(&mut input, tmp.as_file_mut()).map_err(|e| failed(e.to_string()))?;
    tmp.as_file().sync_all().map_err(|e| failed(e.to_string()))?;
    tmp.persist(dest).map_err(|e| failed(e.error.to_string()))?;
    Ok(())
}
