use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Note record in the notes table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub is_pinned: bool,
    pub user_id: Uuid, // owner, never reassigned
    #[serde(with = "time::serde::rfc3339")]
    pub created_on: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewNote {
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

/// Partial update: every `Some` field overwrites, every `None` keeps the
/// stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_pinned: Option<bool>,
}

impl NoteChanges {
    /// Only title, content and tags count; a lone pin flag is not an edit.
    pub fn has_changes(&self) -> bool {
        self.title.is_some() || self.content.is_some() || self.tags.is_some()
    }

    pub fn apply(self, note: &mut Note) {
        if let Some(title) = self.title {
            note.title = title;
        }
        if let Some(content) = self.content {
            note.content = content;
        }
        if let Some(tags) = self.tags {
            note.tags = tags;
        }
        if let Some(is_pinned) = self.is_pinned {
            note.is_pinned = is_pinned;
        }
    }
}

/// Stable partition: pinned notes first, store order kept within each group.
pub fn pinned_first(notes: &mut [Note]) {
    notes.sort_by_key(|n| !n.is_pinned);
}
