//! Setup command implementation
//!
//! Interactive selection of the reMarkable notebook to export and the Day One journal
//! that receives it. Writes the tracker configuration.

use crate::adapters::dayone::DayOneStore;
use crate::adapters::remarkable::RemarkableCatalog;
use crate::cli::{exit_code_for, RunContext, EXIT_OK};
use crate::core::state::{JsonFileStorage, TrackerState, TrackerStorage};
use crate::domain::{AppError, NotebookSummary};
use std::io::{self, BufRead, Write};

const DEFAULT_JOURNAL: &str = "Journal";

/// Execute the setup command on the terminal
pub fn execute(ctx: &RunContext) -> anyhow::Result<i32> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    run(ctx, &JsonFileStorage::new(&ctx.paths.tracker_path), &mut input, &mut output)
}

/// Run the setup dialogue over arbitrary input/output
pub fn run<R: BufRead, W: Write>(
    ctx: &RunContext,
    storage: &dyn TrackerStorage,
    input: &mut R,
    out: &mut W,
) -> anyhow::Result<i32> {
    tracing::info!("Starting setup");

    // Never overwrite a tracker that cannot be read
    let previous = match storage.load() {
        Ok(previous) => previous,
        Err(e) => {
            tracing::error!(error = %e, "Existing tracker unreadable");
            writeln!(out, "Error: {e}")?;
            writeln!(out, "  Fix or remove the file, then run setup again.")?;
            return Ok(exit_code_for(&e));
        }
    };

    writeln!(out, "Scanning reMarkable notebooks...\n")?;

    let notebooks = match RemarkableCatalog::open(&ctx.paths.source_sync_root)
        .and_then(|catalog| catalog.discover_notebooks())
    {
        Ok(notebooks) => notebooks,
        Err(e) => {
            tracing::error!(error = %e, "Cannot read reMarkable data");
            writeln!(out, "Error: {e}")?;
            return Ok(exit_code_for(&e));
        }
    };

    if notebooks.is_empty() {
        let err = AppError::Setup(format!(
            "No handwritten notebooks found in reMarkable data. Looked in: {}",
            ctx.paths.source_sync_root.display()
        ));
        tracing::error!(error = %err, "Nothing to select");
        writeln!(out, "{err}")?;
        return Ok(exit_code_for(&err));
    }

    writeln!(out, "Found {} handwritten notebook(s):\n", notebooks.len())?;
    for (i, nb) in notebooks.iter().enumerate() {
        writeln!(out, "{}", notebook_line(i + 1, nb))?;
    }
    writeln!(out)?;

    let Some(idx) = prompt_choice(input, out, "Select notebook number: ", notebooks.len())? else {
        writeln!(out, "\nSetup cancelled.")?;
        return Ok(EXIT_OK);
    };
    let selected = &notebooks[idx];
    writeln!(out, "\nSelected: {}", selected.name)?;

    let Some(journal) = select_journal(ctx, input, out)? else {
        writeln!(out, "\nSetup cancelled.")?;
        return Ok(EXIT_OK);
    };

    let (state, preserved) =
        TrackerState::reselect(previous, selected.id.clone(), &selected.name, &journal);
    if preserved > 0 {
        writeln!(out, "  (Preserving {preserved} previously exported page records)")?;
    }

    if let Err(e) = storage.save(&state) {
        tracing::error!(error = %e, "Failed to save configuration");
        writeln!(out, "Error: {e}")?;
        return Ok(exit_code_for(&e));
    }
    tracing::info!(
        notebook_id = %state.notebook_id,
        journal = %state.journal_id,
        preserved,
        "Setup saved"
    );

    writeln!(out, "\nSetup complete!")?;
    writeln!(out, "  Notebook: {}", selected.name)?;
    writeln!(out, "  Journal:  {journal}")?;
    writeln!(out, "  Config:   {}", ctx.paths.tracker_path.display())?;
    writeln!(
        out,
        "\nRun `remarkable-dayone` to export pages, or `remarkable-dayone --dry-run` to preview."
    )?;
    Ok(EXIT_OK)
}

fn notebook_line(number: usize, nb: &NotebookSummary) -> String {
    let location = if nb.folder.is_empty() {
        String::new()
    } else {
        format!("  [{}]", nb.folder)
    };
    format!(
        "  {number:3}. {}{location}  ({}/{} pages with content)",
        nb.name, nb.pages_with_content, nb.page_count
    )
}

/// Journal from the Day One database, or typed in when it cannot be read
fn select_journal<R: BufRead, W: Write>(
    ctx: &RunContext,
    input: &mut R,
    out: &mut W,
) -> anyhow::Result<Option<String>> {
    let journals = DayOneStore::open(&ctx.paths.target_database, &ctx.paths.target_attachment_dir)
        .and_then(|store| store.list_journals())
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Could not list Day One journals");
            Vec::new()
        });

    if journals.is_empty() {
        writeln!(out, "\nCould not read Day One journals from database.")?;
        write!(out, "Day One journal name [{DEFAULT_JOURNAL}]: ")?;
        out.flush()?;
        let Some(line) = read_line(input)? else {
            return Ok(None);
        };
        let name = line.trim();
        return Ok(Some(if name.is_empty() {
            DEFAULT_JOURNAL.to_string()
        } else {
            name.to_string()
        }));
    }

    writeln!(out, "\nDay One journals:\n")?;
    for (i, journal) in journals.iter().enumerate() {
        writeln!(out, "  {:3}. {journal}", i + 1)?;
    }
    writeln!(out)?;

    let choice = prompt_choice(input, out, "Select journal number: ", journals.len())?;
    Ok(choice.map(|idx| journals[idx].clone()))
}

/// Ask until a number in `1..=count` is entered; `None` on end of input
fn prompt_choice<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    prompt: &str,
    count: usize,
) -> anyhow::Result<Option<usize>> {
    loop {
        write!(out, "{prompt}")?;
        out.flush()?;
        let Some(line) = read_line(input)? else {
            return Ok(None);
        };
        match line.trim().parse::<usize>() {
            Ok(n) if (1..=count).contains(&n) => return Ok(Some(n - 1)),
            Ok(_) => writeln!(out, "  Please enter a number between 1 and {count}")?,
            Err(_) => writeln!(out, "  Please enter a valid number")?,
        }
    }
}

fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    match input.read_line(&mut line)? {
        0 => Ok(None),
        _ => Ok(Some(line)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{EXIT_CONFIG, EXIT_FATAL};
    use crate::config::{AppSettings, ResolvedPaths};
    use crate::domain::{NotebookId, PageId};
    use serde_json::json;
    use std::fs;
    use std::io::Cursor;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_notebook(dir: &Path, id: &str, name: &str) {
        fs::write(
            dir.join(format!("{id}.metadata")),
            json!({"type": "DocumentType", "parent": "", "visibleName": name}).to_string(),
        )
        .unwrap();
        fs::write(
            dir.join(format!("{id}.content")),
            json!({"fileType": "notebook", "cPages": {"pages": [{"id": "p1"}]}}).to_string(),
        )
        .unwrap();
    }

    fn context(root: &TempDir) -> RunContext {
        let data = root.path().join("remarkable");
        fs::create_dir_all(&data).unwrap();
        write_notebook(&data, "nb-b", "Zettel");
        write_notebook(&data, "nb-a", "alpha");
        RunContext {
            settings: AppSettings::default(),
            paths: ResolvedPaths {
                source_sync_root: data,
                target_database: root.path().join("missing.sqlite"),
                target_attachment_dir: root.path().join("DayOnePhotos"),
                tracker_path: root.path().join("config.json"),
            },
        }
    }

    fn run_with(ctx: &RunContext, answers: &str) -> (i32, String) {
        let storage = JsonFileStorage::new(&ctx.paths.tracker_path);
        let mut input = Cursor::new(answers.as_bytes().to_vec());
        let mut output = Vec::new();
        let code = run(ctx, &storage, &mut input, &mut output).unwrap();
        (code, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_setup_reprompts_and_uses_default_journal() {
        let root = TempDir::new().unwrap();
        let ctx = context(&root);

        let (code, output) = run_with(&ctx, "abc\n9\n1\n\n");

        assert_eq!(code, EXIT_OK);
        assert!(output.contains("Please enter a valid number"));
        assert!(output.contains("Please enter a number between 1 and 2"));
        assert!(output.contains("Selected: alpha"));

        let state = JsonFileStorage::new(&ctx.paths.tracker_path)
            .load()
            .unwrap()
            .unwrap();
        assert_eq!(state.notebook_id.as_str(), "nb-a");
        assert_eq!(state.journal_id, "Journal");
    }

    #[test]
    fn test_setup_eof_writes_nothing() {
        let root = TempDir::new().unwrap();
        let ctx = context(&root);

        let (code, output) = run_with(&ctx, "");

        assert_eq!(code, EXIT_OK);
        assert!(output.contains("Setup cancelled."));
        assert!(!ctx.paths.tracker_path.exists());
    }

    #[test]
    fn test_setup_preserves_history_for_same_notebook() {
        let root = TempDir::new().unwrap();
        let ctx = context(&root);
        let storage = JsonFileStorage::new(&ctx.paths.tracker_path);
        let mut previous =
            TrackerState::new(NotebookId::new("nb-b").unwrap(), "Zettel", "Old");
        previous.exported_pages.push(PageId::new("p1").unwrap());
        storage.save(&previous).unwrap();

        let (_, output) = run_with(&ctx, "2\nDreams\n");
        assert!(output.contains("Preserving 1 previously exported page records"));
        let state = storage.load().unwrap().unwrap();
        assert_eq!(state.journal_id, "Dreams");
        assert_eq!(state.exported_pages.len(), 1);

        let (_, _) = run_with(&ctx, "1\n\n");
        let state = storage.load().unwrap().unwrap();
        assert!(state.exported_pages.is_empty());
    }

    #[test]
    fn test_setup_without_notebooks_is_config_error() {
        let root = TempDir::new().unwrap();
        let mut ctx = context(&root);
        ctx.paths.source_sync_root = root.path().join("empty");
        fs::create_dir_all(&ctx.paths.source_sync_root).unwrap();

        let (code, output) = run_with(&ctx, "");
        assert_eq!(code, EXIT_CONFIG);
        assert!(output.contains("No handwritten notebooks found"));
    }

    #[test]
    fn test_setup_refuses_to_replace_corrupt_tracker() {
        let root = TempDir::new().unwrap();
        let ctx = context(&root);
        let truncated = r#"{"notebook_id": "nb-a", "journal_id": "Dreams", "exported_pages": ["p1", "p2""#;
        fs::write(&ctx.paths.tracker_path, truncated).unwrap();

        let (code, output) = run_with(&ctx, "1\n\n");

        assert_eq!(code, EXIT_FATAL);
        assert!(output.contains("Export tracker error"));
        assert!(!output.contains("Select notebook number"));
        assert_eq!(fs::read_to_string(&ctx.paths.tracker_path).unwrap(), truncated);
    }
}
