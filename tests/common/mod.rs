//! Shared fixtures: a fake reMarkable sync tree and test doubles for the external tools

#![allow(dead_code)]

use async_trait::async_trait;
use remarkable_dayone::config::InjectionFailurePolicy;
use remarkable_dayone::core::convert::{ConversionPipeline, ConversionStage, StageFailure};
use remarkable_dayone::core::export::{
    CreatedEntry, EntryCreator, ExportCoordinator, ExportOptions, NewEntry,
};
use remarkable_dayone::core::inject::{AttachmentInjector, AttachmentLocator, PendingAttachment};
use remarkable_dayone::core::state::{ExportTracker, JsonFileStorage, TrackerState, TrackerStorage};
use remarkable_dayone::domain::{EntryCreationError, EntryId, InjectionError, NotebookId};
use serde_json::json;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub const NOTEBOOK: &str = "3f1c9a52-dream-log";
pub const NOTEBOOK_NAME: &str = "Dream Log";
pub const JOURNAL: &str = "Dreams";

pub const T1: i64 = 1_700_000_000_000;
pub const T2: i64 = 1_700_000_100_000;
pub const T3: i64 = 1_700_000_200_000;

pub const HIGHLIGHTER_STDERR: &str =
    "Traceback (most recent call last):\n  File \"rmc/exporters/svg.py\", line 95\nKeyError: <PenColor.HIGHLIGHT: 9>\n";

/// reMarkable desktop data directory in a temp dir
pub struct SyncTree {
    dir: TempDir,
}

impl SyncTree {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Handwritten notebook; `None` timestamps leave the `.rm` file out (blank page)
    pub fn add_notebook(&self, id: &str, name: &str, pages: &[(&str, Option<i64>)]) {
        self.write_metadata(id, name, "");
        let entries: Vec<_> = pages
            .iter()
            .map(|(page, ts)| json!({"id": page, "modifed": ts.unwrap_or(0).to_string()}))
            .collect();
        self.write_content(id, "notebook", json!({"pages": entries}));

        let nb_dir = self.path().join(id);
        fs::create_dir_all(&nb_dir).unwrap();
        for (page, ts) in pages {
            if ts.is_some() {
                fs::write(nb_dir.join(format!("{page}.rm")), b"reMarkable .lines file, version=6")
                    .unwrap();
            }
        }
    }

    /// The standard three-page notebook `p1, p2, p3` dated `T1 < T2 < T3`
    pub fn add_three_page_notebook(&self) {
        self.add_notebook(
            NOTEBOOK,
            NOTEBOOK_NAME,
            &[("p1", Some(T1)), ("p2", Some(T2)), ("p3", Some(T3))],
        );
    }

    pub fn add_pdf(&self, id: &str, name: &str) {
        self.write_metadata(id, name, "");
        self.write_content(id, "pdf", json!({"pages": [{"id": "pdf-page"}]}));
    }

    pub fn add_trashed(&self, id: &str, name: &str) {
        self.add_notebook(id, name, &[("t1", Some(T1))]);
        self.write_metadata(id, name, "trash");
    }

    fn write_metadata(&self, id: &str, name: &str, parent: &str) {
        fs::write(
            self.path().join(format!("{id}.metadata")),
            json!({"type": "DocumentType", "parent": parent, "visibleName": name}).to_string(),
        )
        .unwrap();
    }

    fn write_content(&self, id: &str, file_type: &str, c_pages: serde_json::Value) {
        fs::write(
            self.path().join(format!("{id}.content")),
            json!({"fileType": file_type, "cPages": c_pages}).to_string(),
        )
        .unwrap();
    }
}

/// Conversion stage that copies its input, or fails for selected pages
pub struct FakeStage {
    name: &'static str,
    failing_pages: HashSet<String>,
    stderr: &'static str,
    calls: AtomicUsize,
}

impl FakeStage {
    pub fn ok(name: &'static str) -> Arc<Self> {
        Self::failing(name, &[], "")
    }

    pub fn failing(name: &'static str, pages: &[&str], stderr: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            failing_pages: pages.iter().map(|p| p.to_string()).collect(),
            stderr,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConversionStage for FakeStage {
    fn name(&self) -> &str {
        self.name
    }

    async fn run(&self, input: &Path, output: &Path) -> Result<(), StageFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let page = input.file_stem().unwrap().to_string_lossy().into_owned();
        if self.failing_pages.contains(&page) {
            let detail = self.stderr.lines().last().unwrap_or("exit status 1");
            return Err(StageFailure::new(detail, self.stderr));
        }
        fs::write(output, format!("{} of {page}", self.name)).unwrap();
        Ok(())
    }
}

/// Entry creator that records every request and hands out sequential ids
#[derive(Default)]
pub struct FakeEntryCreator {
    pub created: Mutex<Vec<NewEntry>>,
    failing_bodies: HashSet<String>,
    report_ids: bool,
}

impl FakeEntryCreator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            report_ids: true,
            ..Self::default()
        })
    }

    /// Creator whose command output names no entry
    pub fn silent() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn rejecting(bodies: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            failing_bodies: bodies.iter().map(|b| b.to_string()).collect(),
            report_ids: true,
            ..Self::default()
        })
    }

    pub fn entries(&self) -> Vec<NewEntry> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl EntryCreator for FakeEntryCreator {
    async fn create_entry(&self, entry: &NewEntry) -> Result<CreatedEntry, EntryCreationError> {
        assert!(entry.attachment.exists(), "attachment must exist while the entry is created");
        if self.failing_bodies.contains(&entry.body) {
            return Err(EntryCreationError::Rejected("journal is locked".to_string()));
        }
        let mut created = self.created.lock().unwrap();
        created.push(entry.clone());
        let entry_id = self
            .report_ids
            .then(|| EntryId::new(&format!("{:032X}", created.len())).unwrap());
        Ok(CreatedEntry { entry_id })
    }
}

/// Locator backed by a plain directory; every entry gets an attachment reserved
pub struct FakeLocator {
    pub dir: PathBuf,
    pub reserve: bool,
}

impl FakeLocator {
    pub fn new(dir: impl Into<PathBuf>) -> Arc<Self> {
        Arc::new(Self {
            dir: dir.into(),
            reserve: true,
        })
    }

    pub fn without_reservations(dir: impl Into<PathBuf>) -> Arc<Self> {
        Arc::new(Self {
            dir: dir.into(),
            reserve: false,
        })
    }
}

impl AttachmentLocator for FakeLocator {
    fn find_pending_attachment(
        &self,
        entry_id: &EntryId,
    ) -> Result<Option<PendingAttachment>, InjectionError> {
        Ok(self.reserve.then(|| PendingAttachment {
            identifier: entry_id.to_string(),
            file_stem: entry_id.as_str().to_lowercase(),
            extension: "png".to_string(),
        }))
    }

    fn expected_path(&self, attachment: &PendingAttachment) -> PathBuf {
        self.dir
            .join(format!("{}.{}", attachment.file_stem, attachment.extension))
    }
}

/// Scratch area for tracker file and Day One photo directory
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("DayOnePhotos")).unwrap();
        Self { dir }
    }

    pub fn tracker_path(&self) -> PathBuf {
        self.dir.path().join("config.json")
    }

    pub fn photos_dir(&self) -> PathBuf {
        self.dir.path().join("DayOnePhotos")
    }

    pub fn storage(&self) -> Arc<JsonFileStorage> {
        Arc::new(JsonFileStorage::new(self.tracker_path()))
    }

    /// Write the selection the way setup does
    pub fn select(&self, notebook: &str, exported: &[&str]) {
        let mut state =
            TrackerState::new(NotebookId::new(notebook).unwrap(), NOTEBOOK_NAME, JOURNAL);
        for page in exported {
            state.exported_pages.push(page.parse().unwrap());
        }
        self.storage().save(&state).unwrap();
    }

    pub fn exported_pages(&self) -> Vec<String> {
        let state = self.storage().load().unwrap().unwrap();
        state
            .exported_pages
            .iter()
            .map(|p| p.as_str().to_string())
            .collect()
    }

    pub fn load_tracker(&self) -> ExportTracker {
        ExportTracker::load(self.storage()).unwrap()
    }
}

/// Coordinator wired to the given doubles
pub fn coordinator(
    workspace: &Workspace,
    vector: Arc<FakeStage>,
    creator: Arc<FakeEntryCreator>,
    locator: Arc<FakeLocator>,
    policy: InjectionFailurePolicy,
) -> ExportCoordinator {
    let pipeline = ConversionPipeline::new(
        vector,
        FakeStage::ok("inkscape"),
        &remarkable_dayone::config::ToolsConfig::default().unsupported_stroke_pattern,
    )
    .unwrap();

    let options = ExportOptions {
        journal: JOURNAL.to_string(),
        source_tag: "reMarkable".to_string(),
        on_injection_failure: policy,
    };

    ExportCoordinator::new(
        pipeline,
        creator,
        AttachmentInjector::new(locator),
        workspace.load_tracker(),
        options,
    )
}
