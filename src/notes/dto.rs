use serde::{Deserialize, Serialize};

use crate::notes::repo_types::{Note, NoteChanges};

#[derive(Debug, Default, Deserialize)]
pub struct AddNoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Body of `PUT /edit-note/:id`. `null` and a missing key mean the same.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditNoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_pinned: Option<bool>,
}

impl From<EditNoteRequest> for NoteChanges {
    fn from(req: EditNoteRequest) -> Self {
        // Empty strings would break the non-empty title/content rule.
        Self {
            title: req.title.filter(|t| !t.is_empty()),
            content: req.content.filter(|c| !c.is_empty()),
            tags: req.tags,
            is_pinned: req.is_pinned,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinNoteRequest {
    pub is_pinned: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NoteResponse {
    pub error: bool,
    pub note: Note,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct NotesResponse {
    pub error: bool,
    pub notes: Vec<Note>,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub error: bool,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_request_keeps_explicit_false() {
        let req: EditNoteRequest =
            serde_json::from_str(r#"{"tags":["x"],"isPinned":false}"#).unwrap();
        let changes = NoteChanges::from(req);
        assert_eq!(changes.is_pinned, Some(false));
        assert_eq!(changes.tags, Some(vec!["x".to_string()]));
        assert_eq!(changes.title, None);
    }

    #[test]
    fn edit_request_null_and_empty_are_absent() {
        let req: EditNoteRequest =
            serde_json::from_str(r#"{"title":null,"content":""}"#).unwrap();
        let changes = NoteChanges::from(req);
        assert_eq!(changes, NoteChanges::default());
        assert!(!changes.has_changes());
    }
}
