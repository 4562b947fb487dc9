//! Persisted tracker record
//!
//! The JSON document holding the notebook/journal selection and every page already
//! exported under that selection.

use crate::domain::ids::{NotebookId, PageId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Selection plus export history, as stored on disk
///
/// Fields written by other versions of the tool are kept in `extra` and written back
/// unchanged. Files using the older `remarkable_notebook_guid` / `dayone_journal`
/// keys are read transparently.
///
/// # Examples
///
/// ```
/// use remarkable_dayone::core::state::TrackerState;
/// use remarkable_dayone::domain::NotebookId;
///
/// let state = TrackerState::new(NotebookId::new("nb-1").unwrap(), "Morning Pages", "Journal");
/// assert!(state.exported_pages.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerState {
    /// Selected reMarkable notebook
    #[serde(alias = "remarkable_notebook_guid")]
    pub notebook_id: NotebookId,

    /// Notebook name at selection time
    #[serde(default, alias = "remarkable_notebook_name")]
    pub notebook_name: String,

    /// Destination Day One journal
    #[serde(alias = "dayone_journal")]
    pub journal_id: String,

    /// Pages already exported, in export order
    #[serde(default)]
    pub exported_pages: Vec<PageId>,

    /// Unrecognised fields, preserved across rewrites
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TrackerState {
    /// Fresh selection with no export history
    pub fn new(
        notebook_id: NotebookId,
        notebook_name: impl Into<String>,
        journal_id: impl Into<String>,
    ) -> Self {
        Self {
            notebook_id,
            notebook_name: notebook_name.into(),
            journal_id: journal_id.into(),
            exported_pages: Vec::new(),
            extra: Map::new(),
        }
    }

    /// State for a new setup selection
    ///
    /// Export history carries over only when the same notebook is selected again; a
    /// different notebook starts from an empty history. Returns the new state and the
    /// number of preserved page records.
    pub fn reselect(
        previous: Option<TrackerState>,
        notebook_id: NotebookId,
        notebook_name: impl Into<String>,
        journal_id: impl Into<String>,
    ) -> (Self, usize) {
        let mut state = Self::new(notebook_id, notebook_name, journal_id);
        if let Some(prev) = previous {
            state.extra = prev.extra;
            if prev.notebook_id == state.notebook_id {
                state.exported_pages = prev.exported_pages;
            }
        }
        let preserved = state.exported_pages.len();
        (state, preserved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nb(id: &str) -> NotebookId {
        NotebookId::new(id).unwrap()
    }

    #[test]
    fn test_serializes_documented_keys() {
        let mut state = TrackerState::new(nb("nb-1"), "Dream Log", "Journal");
        state.exported_pages.push(PageId::new("p1").unwrap());

        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["notebook_id"], "nb-1");
        assert_eq!(value["journal_id"], "Journal");
        assert_eq!(value["exported_pages"], json!(["p1"]));
    }

    #[test]
    fn test_reads_legacy_keys() {
        let legacy = json!({
            "remarkable_notebook_guid": "nb-9",
            "remarkable_notebook_name": "Old",
            "dayone_journal": "Journal",
            "exported_pages": ["a", "b"]
        });

        let state: TrackerState = serde_json::from_value(legacy).unwrap();
        assert_eq!(state.notebook_id.as_str(), "nb-9");
        assert_eq!(state.notebook_name, "Old");
        assert_eq!(state.exported_pages.len(), 2);
        assert!(state.extra.is_empty());
    }

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let doc = json!({
            "notebook_id": "nb-1",
            "journal_id": "Journal",
            "exported_pages": [],
            "future_option": {"enabled": true}
        });

        let state: TrackerState = serde_json::from_value(doc).unwrap();
        let back = serde_json::to_value(&state).unwrap();
        assert_eq!(back["future_option"], json!({"enabled": true}));
    }

    #[test]
    fn test_reselect_same_notebook_preserves_history() {
        let mut prev = TrackerState::new(nb("nb-1"), "Dream Log", "Journal");
        prev.exported_pages.push(PageId::new("p1").unwrap());

        let (state, preserved) = TrackerState::reselect(Some(prev), nb("nb-1"), "Dream Log", "Work");
        assert_eq!(preserved, 1);
        assert_eq!(state.journal_id, "Work");
    }

    #[test]
    fn test_reselect_other_notebook_clears_history() {
        let mut prev = TrackerState::new(nb("nb-1"), "Dream Log", "Journal");
        prev.exported_pages.push(PageId::new("p1").unwrap());

        let (state, preserved) = TrackerState::reselect(Some(prev), nb("nb-2"), "Sketches", "Journal");
        assert_eq!(preserved, 0);
        assert!(state.exported_pages.is_empty());
    }
}
