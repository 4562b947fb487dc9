//! External conversion stages
//!
//! - [`RmcStage`]: `.rm` → SVG with `rmc -t svg <in> -o <out>`
//! - [`InkscapeStage`]: SVG → PNG with `inkscape --export-type=png --export-filename=<out> <in>`

use super::process::{self, ProcessError};
use crate::config::expand_home;
use crate::core::convert::{ConversionStage, StageFailure};
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::Path;

impl From<ProcessError> for StageFailure {
    fn from(err: ProcessError) -> Self {
        StageFailure::new(err.summary(), err.stderr())
    }
}

/// reMarkable drawing decoder
#[derive(Debug, Clone)]
pub struct RmcStage {
    program: String,
}

impl RmcStage {
    pub fn new(program: &str) -> Self {
        Self {
            program: expand_home(program).to_string_lossy().into_owned(),
        }
    }

    fn args(input: &Path, output: &Path) -> Vec<OsString> {
        vec![
            "-t".into(),
            "svg".into(),
            input.as_os_str().to_owned(),
            "-o".into(),
            output.as_os_str().to_owned(),
        ]
    }
}

#[async_trait]
impl ConversionStage for RmcStage {
    fn name(&self) -> &str {
        "rmc"
    }

    async fn run(&self, input: &Path, output: &Path) -> Result<(), StageFailure> {
        process::run(&self.program, &Self::args(input, output)).await?;
        Ok(())
    }
}

/// Vector renderer
#[derive(Debug, Clone)]
pub struct InkscapeStage {
    program: String,
}

impl InkscapeStage {
    pub fn new(program: &str) -> Self {
        Self {
            program: expand_home(program).to_string_lossy().into_owned(),
        }
    }

    fn args(input: &Path, output: &Path) -> Vec<OsString> {
        let mut export_filename = OsString::from("--export-filename=");
        export_filename.push(output.as_os_str());
        vec![
            "--export-type=png".into(),
            export_filename,
            input.as_os_str().to_owned(),
        ]
    }
}

#[async_trait]
impl ConversionStage for InkscapeStage {
    fn name(&self) -> &str {
        "inkscape"
    }

    async fn run(&self, input: &Path, output: &Path) -> Result<(), StageFailure> {
        process::run(&self.program, &Self::args(input, output)).await?;
        Ok(())
    }
}
