//! End-to-end export runs against a fake sync tree and fake external tools

mod common;

use chrono::{TimeZone, Utc};
use common::*;
use remarkable_dayone::adapters::remarkable::RemarkableCatalog;
use remarkable_dayone::config::InjectionFailurePolicy;
use remarkable_dayone::core::export::{FailureStage, PageOutcome};
use remarkable_dayone::domain::NotebookId;
use std::fs;

fn open_notebook(tree: &SyncTree) -> remarkable_dayone::adapters::remarkable::NotebookCatalog {
    RemarkableCatalog::open(tree.path())
        .unwrap()
        .notebook(&NotebookId::new(NOTEBOOK).unwrap())
        .unwrap()
}

#[tokio::test]
async fn test_failed_page_is_isolated_and_left_for_retry() {
    let tree = SyncTree::new();
    tree.add_three_page_notebook();
    let workspace = Workspace::new();
    workspace.select(NOTEBOOK, &[]);

    let creator = FakeEntryCreator::new();
    let mut coordinator = coordinator(
        &workspace,
        FakeStage::failing("rmc", &["p2"], "Error: unexpected block type 0x0d\n"),
        creator.clone(),
        FakeLocator::new(workspace.photos_dir()),
        InjectionFailurePolicy::MarkExported,
    );

    let summary = coordinator.execute_export(&open_notebook(&tree)).await.unwrap();

    assert_eq!(workspace.exported_pages(), vec!["p1", "p3"]);
    assert_eq!(summary.exported, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.errors.len(), 1);
    assert_eq!(summary.errors[0].page_id, "p2");
    assert!(summary.errors[0].message.starts_with("conversion:"));
    assert!(summary.errors[0].retryable);
    assert!(!summary.is_successful());

    let dates: Vec<_> = creator.entries().iter().map(|e| e.date).collect();
    assert_eq!(
        dates,
        vec![
            Utc.timestamp_millis_opt(T1).unwrap(),
            Utc.timestamp_millis_opt(T3).unwrap()
        ]
    );
}

#[tokio::test]
async fn test_entries_carry_journal_tags_and_body() {
    let tree = SyncTree::new();
    tree.add_three_page_notebook();
    let workspace = Workspace::new();
    workspace.select(NOTEBOOK, &[]);

    let creator = FakeEntryCreator::new();
    let mut coordinator = coordinator(
        &workspace,
        FakeStage::ok("rmc"),
        creator.clone(),
        FakeLocator::new(workspace.photos_dir()),
        InjectionFailurePolicy::MarkExported,
    );
    coordinator.execute_export(&open_notebook(&tree)).await.unwrap();

    let entries = creator.entries();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].journal, JOURNAL);
    assert_eq!(entries[0].tags, vec!["reMarkable", NOTEBOOK_NAME]);
    assert_eq!(entries[1].body, "Page 2 of Dream Log");
}

#[tokio::test]
async fn test_attachment_lands_in_reserved_path() {
    let tree = SyncTree::new();
    tree.add_notebook(NOTEBOOK, NOTEBOOK_NAME, &[("p1", Some(T1))]);
    let workspace = Workspace::new();
    workspace.select(NOTEBOOK, &[]);

    let mut coordinator = coordinator(
        &workspace,
        FakeStage::ok("rmc"),
        FakeEntryCreator::new(),
        FakeLocator::new(workspace.photos_dir()),
        InjectionFailurePolicy::MarkExported,
    );
    coordinator.execute_export(&open_notebook(&tree)).await.unwrap();

    let expected = workspace
        .photos_dir()
        .join(format!("{:032x}.png", 1));
    assert_eq!(fs::read_to_string(expected).unwrap(), "inkscape of p1");
}

#[tokio::test]
async fn test_second_run_exports_nothing() {
    let tree = SyncTree::new();
    tree.add_three_page_notebook();
    let workspace = Workspace::new();
    workspace.select(NOTEBOOK, &[]);

    let mut first = coordinator(
        &workspace,
        FakeStage::ok("rmc"),
        FakeEntryCreator::new(),
        FakeLocator::new(workspace.photos_dir()),
        InjectionFailurePolicy::MarkExported,
    );
    first.execute_export(&open_notebook(&tree)).await.unwrap();
    let after_first = fs::read(workspace.tracker_path()).unwrap();

    let creator = FakeEntryCreator::new();
    let vector = FakeStage::ok("rmc");
    let mut second = coordinator(
        &workspace,
        vector.clone(),
        creator.clone(),
        FakeLocator::new(workspace.photos_dir()),
        InjectionFailurePolicy::MarkExported,
    );
    let summary = second.execute_export(&open_notebook(&tree)).await.unwrap();

    assert_eq!(summary.exported, 0);
    assert_eq!(summary.skipped, 3);
    assert_eq!(vector.calls(), 0);
    assert!(creator.entries().is_empty());
    assert_eq!(fs::read(workspace.tracker_path()).unwrap(), after_first);
}

#[tokio::test]
async fn test_resumes_after_partial_history() {
    let tree = SyncTree::new();
    tree.add_three_page_notebook();
    let workspace = Workspace::new();
    workspace.select(NOTEBOOK, &["p1"]);

    let creator = FakeEntryCreator::new();
    let mut coordinator = coordinator(
        &workspace,
        FakeStage::ok("rmc"),
        creator.clone(),
        FakeLocator::new(workspace.photos_dir()),
        InjectionFailurePolicy::MarkExported,
    );
    let summary = coordinator.execute_export(&open_notebook(&tree)).await.unwrap();

    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.exported, 2);
    assert_eq!(workspace.exported_pages(), vec!["p1", "p2", "p3"]);
    let bodies: Vec<_> = creator.entries().into_iter().map(|e| e.body).collect();
    assert_eq!(bodies, vec!["Page 2 of Dream Log", "Page 3 of Dream Log"]);
}

#[tokio::test]
async fn test_new_pages_are_picked_up_later() {
    let tree = SyncTree::new();
    tree.add_notebook(NOTEBOOK, NOTEBOOK_NAME, &[("p1", Some(T1))]);
    let workspace = Workspace::new();
    workspace.select(NOTEBOOK, &[]);

    let mut first = coordinator(
        &workspace,
        FakeStage::ok("rmc"),
        FakeEntryCreator::new(),
        FakeLocator::new(workspace.photos_dir()),
        InjectionFailurePolicy::MarkExported,
    );
    first.execute_export(&open_notebook(&tree)).await.unwrap();

    tree.add_notebook(
        NOTEBOOK,
        NOTEBOOK_NAME,
        &[("p1", Some(T1)), ("p2", Some(T2))],
    );
    let creator = FakeEntryCreator::new();
    let mut second = coordinator(
        &workspace,
        FakeStage::ok("rmc"),
        creator.clone(),
        FakeLocator::new(workspace.photos_dir()),
        InjectionFailurePolicy::MarkExported,
    );
    let summary = second.execute_export(&open_notebook(&tree)).await.unwrap();

    assert_eq!(summary.exported, 1);
    assert_eq!(creator.entries()[0].body, "Page 2 of Dream Log");
    assert_eq!(workspace.exported_pages(), vec!["p1", "p2"]);
}

#[tokio::test]
async fn test_blank_pages_keep_their_position() {
    let tree = SyncTree::new();
    tree.add_notebook(
        NOTEBOOK,
        NOTEBOOK_NAME,
        &[("p1", Some(T1)), ("blank", None), ("p3", Some(T3))],
    );
    let workspace = Workspace::new();
    workspace.select(NOTEBOOK, &[]);

    let creator = FakeEntryCreator::new();
    let mut coordinator = coordinator(
        &workspace,
        FakeStage::ok("rmc"),
        creator.clone(),
        FakeLocator::new(workspace.photos_dir()),
        InjectionFailurePolicy::MarkExported,
    );
    coordinator.execute_export(&open_notebook(&tree)).await.unwrap();

    let bodies: Vec<_> = creator.entries().into_iter().map(|e| e.body).collect();
    assert_eq!(bodies, vec!["Page 1 of Dream Log", "Page 3 of Dream Log"]);
    assert_eq!(workspace.exported_pages(), vec!["p1", "p3"]);
}

#[tokio::test]
async fn test_highlighter_page_fails_without_stopping_run() {
    let tree = SyncTree::new();
    tree.add_three_page_notebook();
    let workspace = Workspace::new();
    workspace.select(NOTEBOOK, &[]);

    let mut coordinator = coordinator(
        &workspace,
        FakeStage::failing("rmc", &["p1"], HIGHLIGHTER_STDERR),
        FakeEntryCreator::new(),
        FakeLocator::new(workspace.photos_dir()),
        InjectionFailurePolicy::MarkExported,
    );
    let summary = coordinator.execute_export(&open_notebook(&tree)).await.unwrap();

    assert_eq!(workspace.exported_pages(), vec!["p2", "p3"]);
    match &summary.pages[0].outcome {
        PageOutcome::Failed { stage, reason } => {
            assert_eq!(*stage, FailureStage::Conversion);
            assert!(reason.contains("highlighter"));
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_rejected_entry_is_not_recorded() {
    let tree = SyncTree::new();
    tree.add_three_page_notebook();
    let workspace = Workspace::new();
    workspace.select(NOTEBOOK, &[]);

    let mut coordinator = coordinator(
        &workspace,
        FakeStage::ok("rmc"),
        FakeEntryCreator::rejecting(&["Page 2 of Dream Log"]),
        FakeLocator::new(workspace.photos_dir()),
        InjectionFailurePolicy::MarkExported,
    );
    let summary = coordinator.execute_export(&open_notebook(&tree)).await.unwrap();

    assert_eq!(workspace.exported_pages(), vec!["p1", "p3"]);
    assert_eq!(
        summary.page_ids_where(|o| matches!(
            o,
            PageOutcome::Failed { stage: FailureStage::EntryCreation, .. }
        ))
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>(),
        vec!["p2"]
    );
}

#[tokio::test]
async fn test_missing_attachment_marked_by_default_policy() {
    let tree = SyncTree::new();
    tree.add_notebook(NOTEBOOK, NOTEBOOK_NAME, &[("p1", Some(T1))]);
    let workspace = Workspace::new();
    workspace.select(NOTEBOOK, &[]);

    let mut coordinator = coordinator(
        &workspace,
        FakeStage::ok("rmc"),
        FakeEntryCreator::new(),
        FakeLocator::without_reservations(workspace.photos_dir()),
        InjectionFailurePolicy::MarkExported,
    );
    let summary = coordinator.execute_export(&open_notebook(&tree)).await.unwrap();

    assert_eq!(summary.partial, 1);
    assert!(matches!(
        summary.pages[0].outcome,
        PageOutcome::Partial { marked: true, .. }
    ));
    assert!(!summary.errors[0].retryable);
    assert_eq!(workspace.exported_pages(), vec!["p1"]);
}

#[tokio::test]
async fn test_missing_attachment_left_for_retry_policy() {
    let tree = SyncTree::new();
    tree.add_notebook(NOTEBOOK, NOTEBOOK_NAME, &[("p1", Some(T1))]);
    let workspace = Workspace::new();
    workspace.select(NOTEBOOK, &[]);

    let mut coordinator = coordinator(
        &workspace,
        FakeStage::ok("rmc"),
        FakeEntryCreator::new(),
        FakeLocator::without_reservations(workspace.photos_dir()),
        InjectionFailurePolicy::Retry,
    );
    let summary = coordinator.execute_export(&open_notebook(&tree)).await.unwrap();

    assert!(matches!(
        summary.pages[0].outcome,
        PageOutcome::Partial { marked: false, .. }
    ));
    assert!(summary.has_retryable());
    assert!(workspace.exported_pages().is_empty());
}

#[tokio::test]
async fn test_unreported_entry_id_is_partial() {
    let tree = SyncTree::new();
    tree.add_notebook(NOTEBOOK, NOTEBOOK_NAME, &[("p1", Some(T1))]);
    let workspace = Workspace::new();
    workspace.select(NOTEBOOK, &[]);

    let mut coordinator = coordinator(
        &workspace,
        FakeStage::ok("rmc"),
        FakeEntryCreator::silent(),
        FakeLocator::new(workspace.photos_dir()),
        InjectionFailurePolicy::MarkExported,
    );
    let summary = coordinator.execute_export(&open_notebook(&tree)).await.unwrap();

    match &summary.pages[0].outcome {
        PageOutcome::Partial { reason, marked } => {
            assert!(reason.contains("entry id"));
            assert!(marked);
        }
        other => panic!("expected partial export, got {other:?}"),
    }
}

#[tokio::test]
async fn test_attachment_dir_missing_is_partial() {
    let tree = SyncTree::new();
    tree.add_notebook(NOTEBOOK, NOTEBOOK_NAME, &[("p1", Some(T1))]);
    let workspace = Workspace::new();
    workspace.select(NOTEBOOK, &[]);

    let mut coordinator = coordinator(
        &workspace,
        FakeStage::ok("rmc"),
        FakeEntryCreator::new(),
        FakeLocator::new(workspace.photos_dir().join("nowhere")),
        InjectionFailurePolicy::Retry,
    );
    let summary = coordinator.execute_export(&open_notebook(&tree)).await.unwrap();

    assert_eq!(summary.partial, 1);
    assert!(summary.errors[0].message.contains("does not exist"));
    assert!(workspace.exported_pages().is_empty());
}
