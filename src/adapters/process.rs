//! External command execution
//!
//! Every external tool (rmc, Inkscape, dayone) is run to completion with captured
//! output. There is no timeout: a hung tool hangs the run.

use std::ffi::OsString;
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;

/// Captured output of a successful invocation
#[derive(Debug, Clone, Default)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Failure of an external invocation
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The program could not be started
    #[error("could not start {program}: {detail}")]
    Spawn { program: String, detail: String },

    /// The program exited unsuccessfully
    #[error("{program} exited with {}: {stderr_tail}", describe_status(.code))]
    Failed {
        program: String,
        code: Option<i32>,
        stderr: String,
        stderr_tail: String,
    },
}

impl ProcessError {
    /// Full stderr of a failed invocation, empty for spawn failures
    pub fn stderr(&self) -> &str {
        match self {
            ProcessError::Spawn { .. } => "",
            ProcessError::Failed { stderr, .. } => stderr,
        }
    }

    /// One-line description suitable for a per-page failure reason
    pub fn summary(&self) -> String {
        match self {
            ProcessError::Spawn { detail, .. } => detail.clone(),
            ProcessError::Failed {
                code, stderr_tail, ..
            } if stderr_tail.is_empty() => describe_status(code),
            ProcessError::Failed { stderr_tail, .. } => stderr_tail.clone(),
        }
    }
}

fn describe_status(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("exit status {c}"),
        None => "termination by signal".to_string(),
    }
}

/// Last non-empty line of a tool's stderr
///
/// Python tracebacks put the actual exception on the final line.
pub fn last_line(text: &str) -> String {
    text.lines()
        .rev()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Run a program to completion
///
/// # Errors
///
/// Returns [`ProcessError::Spawn`] if the program cannot be started and
/// [`ProcessError::Failed`] on a non-zero exit.
pub async fn run(program: &str, args: &[OsString]) -> Result<ProcessOutput, ProcessError> {
    tracing::debug!(program, args = ?args, "Running external command");

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| ProcessError::Spawn {
            program: program.to_string(),
            detail: e.to_string(),
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        let stderr_tail = last_line(&stderr);
        tracing::debug!(
            program,
            code = ?output.status.code(),
            stderr = %stderr_tail,
            "External command failed"
        );
        return Err(ProcessError::Failed {
            program: program.to_string(),
            code: output.status.code(),
            stderr,
            stderr_tail,
        });
    }

    Ok(ProcessOutput { stdout, stderr })
}
