//! reMarkable sync-tree file formats
//!
//! Only the fields the exporter reads are modelled; everything else is ignored.

use serde::Deserialize;
use serde_json::Value;

/// `<id>.metadata`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    /// `DocumentType` or `CollectionType`
    #[serde(rename = "type", default)]
    pub item_type: String,

    /// Parent folder id, `""` at the root, `"trash"` when trashed
    #[serde(default)]
    pub parent: String,

    #[serde(default)]
    pub visible_name: String,

    /// Set by older sync versions on removed items
    #[serde(default)]
    pub deleted: bool,
}

impl DocumentMetadata {
    pub const DOCUMENT_TYPE: &'static str = "DocumentType";
    pub const TRASH: &'static str = "trash";

    /// Document that has not been trashed or deleted
    pub fn is_live_document(&self) -> bool {
        self.item_type == Self::DOCUMENT_TYPE && self.parent != Self::TRASH && !self.deleted
    }
}

/// `<id>.content`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentContent {
    /// `notebook`, `pdf` or `epub`
    #[serde(default)]
    pub file_type: String,

    /// Page list of format version 2 and later
    #[serde(default, rename = "cPages")]
    pub c_pages: Option<Value>,

    /// Page id list of format version 1
    #[serde(default)]
    pub pages: Option<Vec<String>>,
}

impl DocumentContent {
    pub const NOTEBOOK: &'static str = "notebook";

    /// Handwritten notebook rather than an imported PDF/EPUB
    pub fn is_notebook(&self) -> bool {
        self.file_type == Self::NOTEBOOK
    }

    /// Non-deleted pages in display order
    ///
    /// # Errors
    ///
    /// Fails if `cPages.pages` is present but is not an array of page entries.
    pub fn live_pages(&self) -> Result<Vec<ContentPage>, serde_json::Error> {
        if let Some(c_pages) = self.c_pages.as_ref().and_then(|v| v.get("pages")) {
            let entries: Vec<RawPage> = serde_json::from_value(c_pages.clone())?;
            return Ok(entries
                .into_iter()
                .filter(|p| !p.deleted.as_ref().is_some_and(is_truthy_marker))
                .filter_map(|p| {
                    let id = p.id.filter(|id| !id.trim().is_empty())?;
                    let modified_ms = p
                        .modifed
                        .as_ref()
                        .or(p.modified.as_ref())
                        .and_then(epoch_millis)
                        .unwrap_or(0);
                    Some(ContentPage { id, modified_ms })
                })
                .collect());
        }

        Ok(self
            .pages
            .iter()
            .flatten()
            .filter(|id| !id.trim().is_empty())
            .map(|id| ContentPage {
                id: id.clone(),
                modified_ms: 0,
            })
            .collect())
    }
}

/// One page entry from a content file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentPage {
    pub id: String,

    /// Epoch milliseconds, 0 when unknown
    pub modified_ms: i64,
}

#[derive(Debug, Deserialize)]
struct RawPage {
    #[serde(default)]
    id: Option<String>,

    // Misspelled in the reMarkable format
    #[serde(default)]
    modifed: Option<Value>,

    #[serde(default)]
    modified: Option<Value>,

    #[serde(default)]
    deleted: Option<Value>,
}

fn epoch_millis(value: &Value) -> Option<i64> {
    match value {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_i64(),
        _ => None,
    }
}

// Deletion markers are CRDT values: {"timestamp": "...", "value": 1}
fn is_truthy_marker(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.get("value").is_some_and(is_truthy_marker),
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_i64().is_some_and(|v| v != 0),
        Value::String(s) => !s.is_empty() && s != "0",
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_metadata_live_document() {
        let meta: DocumentMetadata = serde_json::from_value(json!({
            "type": "DocumentType",
            "parent": "",
            "visibleName": "Dream Log"
        }))
        .unwrap();
        assert!(meta.is_live_document());

        let trashed = DocumentMetadata {
            parent: "trash".to_string(),
            ..meta.clone()
        };
        assert!(!trashed.is_live_document());

        let folder = DocumentMetadata {
            item_type: "CollectionType".to_string(),
            ..meta
        };
        assert!(!folder.is_live_document());
    }

    #[test]
    fn test_live_pages_reads_cpages() {
        let content: DocumentContent = serde_json::from_value(json!({
            "fileType": "notebook",
            "cPages": {
                "pages": [
                    {"id": "p1", "modifed": "1700000000000"},
                    {"id": "p2", "deleted": {"timestamp": "1:2", "value": 1}},
                    {"id": "p3", "modified": 1700000500000i64},
                    {"idx": {"value": "bc"}}
                ]
            }
        }))
        .unwrap();

        let pages = content.live_pages().unwrap();
        assert_eq!(
            pages,
            vec![
                ContentPage { id: "p1".to_string(), modified_ms: 1_700_000_000_000 },
                ContentPage { id: "p3".to_string(), modified_ms: 1_700_000_500_000 },
            ]
        );
    }

    #[test]
    fn test_live_pages_reads_legacy_list() {
        let content: DocumentContent = serde_json::from_value(json!({
            "fileType": "notebook",
            "pages": ["a", "b"]
        }))
        .unwrap();

        let ids: Vec<_> = content.live_pages().unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_live_pages_tolerates_odd_cpages() {
        let content: DocumentContent = serde_json::from_value(json!({
            "fileType": "notebook",
            "cPages": []
        }))
        .unwrap();
        assert!(content.live_pages().unwrap().is_empty());
    }

    #[test]
    fn test_live_pages_rejects_bad_entry() {
        let content: DocumentContent = serde_json::from_value(json!({
            "fileType": "notebook",
            "cPages": {"pages": [{"id": "p1"}, {"id": 7}, {"id": "p3"}]}
        }))
        .unwrap();
        assert!(content.live_pages().is_err());
    }

    #[test]
    fn test_live_pages_rejects_non_array_pages() {
        let content: DocumentContent = serde_json::from_value(json!({
            "fileType": "notebook",
            "cPages": {"pages": {"id": "p1"}}
        }))
        .unwrap();
        assert!(content.live_pages().is_err());
    }

    #[test]
    fn test_pdf_is_not_notebook() {
        let content: DocumentContent =
            serde_json::from_value(json!({"fileType": "pdf"})).unwrap();
        assert!(!content.is_notebook());
    }
}
