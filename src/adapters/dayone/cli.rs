//! `dayone` command-line client

use crate::adapters::process::{self, ProcessError};
use crate::config::expand_home;
use crate::core::export::{CreatedEntry, EntryCreator, NewEntry};
use crate::domain::{EntryCreationError, EntryId};
use async_trait::async_trait;
use chrono::Local;
use std::ffi::OsString;

/// Creates entries by running the Day One CLI
#[derive(Debug, Clone)]
pub struct DayOneCli {
    program: String,
    date_format: String,
}

impl DayOneCli {
    /// `date_format` is a chrono format applied to the entry date in local time
    pub fn new(program: &str, date_format: &str) -> Self {
        Self {
            program: expand_home(program).to_string_lossy().into_owned(),
            date_format: date_format.to_string(),
        }
    }

    // --tags and --attachments swallow every following argument up to the next option
    // or `--`, so they go last and `--` ends them.
    fn args(&self, entry: &NewEntry) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::new();
        if !entry.journal.is_empty() {
            args.push("--journal".into());
            args.push(entry.journal.clone().into());
        }
        args.push("--date".into());
        args.push(
            entry
                .date
                .with_timezone(&Local)
                .format(&self.date_format)
                .to_string()
                .into(),
        );
        if !entry.tags.is_empty() {
            args.push("--tags".into());
            args.extend(entry.tags.iter().map(OsString::from));
        }
        args.push("--attachments".into());
        args.push(entry.attachment.as_os_str().to_owned());
        args.push("--".into());
        args.push("new".into());
        args.push(entry.body.clone().into());
        args
    }
}

#[async_trait]
impl EntryCreator for DayOneCli {
    async fn create_entry(&self, entry: &NewEntry) -> Result<CreatedEntry, EntryCreationError> {
        let output = process::run(&self.program, &self.args(entry))
            .await
            .map_err(|e| match e {
                ProcessError::Spawn { detail, .. } => EntryCreationError::Spawn(detail),
                failed @ ProcessError::Failed { .. } => {
                    let stderr = failed.stderr().trim();
                    EntryCreationError::Rejected(if stderr.is_empty() {
                        failed.summary()
                    } else {
                        stderr.to_string()
                    })
                }
            })?;

        let entry_id = parse_entry_id(&output.stdout);
        if entry_id.is_none() {
            tracing::warn!(stdout = %output.stdout.trim(), "dayone did not report an entry uuid");
        }
        Ok(CreatedEntry { entry_id })
    }
}

/// Entry uuid from `dayone new` output, e.g. `Created new entry with uuid: 5F2B…`
fn parse_entry_id(stdout: &str) -> Option<EntryId> {
    stdout
        .split(|c: char| c.is_whitespace() || c == ',')
        .map(|token| token.trim_matches(|c: char| !c.is_ascii_alphanumeric()))
        .filter(|token| token.len() >= 32)
        .find_map(|token| EntryId::new(token).ok())
}
