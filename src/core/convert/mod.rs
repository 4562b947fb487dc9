//! Conversion pipeline
//!
//! Turns one page's `.rm` drawing into a PNG through two external stages
//! (drawing → SVG → PNG). Work happens in a per-page scratch directory that is removed
//! when the returned [`ConvertedImage`] is dropped, or immediately on failure.

pub mod stage;

pub use stage::{ConversionStage, StageFailure};

use crate::domain::{AppError, ConversionError, PageRecord, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// A generated raster image and the scratch directory that holds it
#[derive(Debug)]
pub struct ConvertedImage {
    path: PathBuf,
    _workdir: TempDir,
}

impl ConvertedImage {
    /// Location of the PNG, valid while `self` is alive
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Two-stage drawing → vector → raster conversion
pub struct ConversionPipeline {
    vector_stage: Arc<dyn ConversionStage>,
    raster_stage: Arc<dyn ConversionStage>,
    unsupported_stroke: Regex,
}

impl ConversionPipeline {
    /// Create a pipeline
    ///
    /// `unsupported_stroke_pattern` is matched against the vector stage's diagnostics to
    /// recognise the highlighter defect.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Configuration`] if the pattern is not a valid regex.
    pub fn new(
        vector_stage: Arc<dyn ConversionStage>,
        raster_stage: Arc<dyn ConversionStage>,
        unsupported_stroke_pattern: &str,
    ) -> Result<Self> {
        let unsupported_stroke = Regex::new(unsupported_stroke_pattern).map_err(|e| {
            AppError::Configuration(format!("Invalid unsupported stroke pattern: {e}"))
        })?;
        Ok(Self {
            vector_stage,
            raster_stage,
            unsupported_stroke,
        })
    }

    /// Convert one page
    ///
    /// Each stage runs exactly once. On failure nothing is left on disk.
    pub async fn convert(&self, page: &PageRecord) -> std::result::Result<ConvertedImage, ConversionError> {
        let workdir = tempfile::Builder::new()
            .prefix("remarkable-dayone-")
            .tempdir()
            .map_err(|e| ConversionError::ConversionFailed {
                stage: "workdir".to_string(),
                detail: format!("could not create scratch directory: {e}"),
            })?;

        let svg_path = workdir.path().join(format!("{}.svg", page.page_id));
        let png_path = workdir.path().join(format!("{}.png", page.page_id));

        if let Err(failure) = self.vector_stage.run(&page.source_path, &svg_path).await {
            return Err(self.classify_vector_failure(failure));
        }
        require_output(self.vector_stage.name(), &svg_path)?;

        self.raster_stage
            .run(&svg_path, &png_path)
            .await
            .map_err(|failure| ConversionError::ConversionFailed {
                stage: self.raster_stage.name().to_string(),
                detail: failure.detail,
            })?;
        require_output(self.raster_stage.name(), &png_path)?;

        if let Err(e) = std::fs::remove_file(&svg_path) {
            tracing::debug!(path = %svg_path.display(), error = %e, "Could not remove intermediate SVG");
        }

        tracing::debug!(page_id = %page.page_id, png = %png_path.display(), "Page converted");
        Ok(ConvertedImage {
            path: png_path,
            _workdir: workdir,
        })
    }

    fn classify_vector_failure(&self, failure: StageFailure) -> ConversionError {
        if self.unsupported_stroke.is_match(&failure.diagnostics)
            || self.unsupported_stroke.is_match(&failure.detail)
        {
            ConversionError::KnownUnsupportedStroke {
                detail: failure.detail,
            }
        } else {
            ConversionError::ConversionFailed {
                stage: self.vector_stage.name().to_string(),
                detail: failure.detail,
            }
        }
    }
}

fn require_output(stage: &str, path: &Path) -> std::result::Result<(), ConversionError> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() && meta.len() > 0 => Ok(()),
        _ => Err(ConversionError::ConversionFailed {
            stage: stage.to_string(),
            detail: format!("no output produced at {}", path.display()),
        }),
    }
}
