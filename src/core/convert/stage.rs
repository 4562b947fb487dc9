//! Conversion stage capability

use async_trait::async_trait;
use std::path::Path;

/// Why a stage did not produce its output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageFailure {
    /// One-line reason shown to the user
    pub detail: String,

    /// Full diagnostic output (stderr) used for classification
    pub diagnostics: String,
}

impl StageFailure {
    pub fn new(detail: impl Into<String>, diagnostics: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            diagnostics: diagnostics.into(),
        }
    }
}

/// One external format conversion, `input` → `output`
///
/// Implementations write `output` and return `Ok` only on success; the pipeline still
/// verifies the file exists.
#[async_trait]
pub trait ConversionStage: Send + Sync {
    /// Short stage name used in failure reports (`rmc`, `inkscape`)
    fn name(&self) -> &str;

    async fn run(&self, input: &Path, output: &Path) -> Result<(), StageFailure>;
}
