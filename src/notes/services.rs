use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::{required, AppError},
    notes::{
        dto::AddNoteRequest,
        repo::NoteStore,
        repo_types::{pinned_first, NewNote, Note, NoteChanges},
    },
};

pub async fn create_note(
    notes: &dyn NoteStore,
    owner: Uuid,
    req: AddNoteRequest,
) -> Result<Note, AppError> {
    let title = required(req.title, "Title is required!")?;
    let content = required(req.content, "Content is required!")?;

    let note = notes
        .create(NewNote {
            user_id: owner,
            title,
            content,
            tags: req.tags.unwrap_or_default(),
        })
        .await?;
    info!(user_id = %owner, note_id = %note.id, "note created");
    Ok(note)
}

/// Applies `changes` field by field. Read and write are separate store
/// calls, so concurrent edits of one note resolve as last writer wins.
pub async fn edit_note(
    notes: &dyn NoteStore,
    owner: Uuid,
    note_id: Uuid,
    changes: NoteChanges,
) -> Result<Note, AppError> {
    if !changes.has_changes() {
        return Err(AppError::validation("No Changes Provided!"));
    }
    update_owned(notes, owner, note_id, changes).await
}

pub async fn set_pinned(
    notes: &dyn NoteStore,
    owner: Uuid,
    note_id: Uuid,
    is_pinned: bool,
) -> Result<Note, AppError> {
    let changes = NoteChanges {
        is_pinned: Some(is_pinned),
        ..Default::default()
    };
    update_owned(notes, owner, note_id, changes).await
}

async fn update_owned(
    notes: &dyn NoteStore,
    owner: Uuid,
    note_id: Uuid,
    changes: NoteChanges,
) -> Result<Note, AppError> {
    let Some(mut note) = notes.find_owned(owner, note_id).await? else {
        warn!(user_id = %owner, %note_id, "note not found");
        return Err(AppError::NoteNotFound);
    };
    changes.apply(&mut note);
    if !notes.save(&note).await? {
        return Err(AppError::NoteNotFound);
    }
    info!(user_id = %owner, %note_id, "note updated");
    Ok(note)
}

/// The owner's notes, pinned ones first.
pub async fn list_notes(notes: &dyn NoteStore, owner: Uuid) -> Result<Vec<Note>, AppError> {
    let mut all = notes.list_by_owner(owner).await?;
    pinned_first(&mut all);
    Ok(all)
}

pub async fn delete_note(notes: &dyn NoteStore, owner: Uuid, note_id: Uuid) -> Result<(), AppError> {
    if !notes.delete_owned(owner, note_id).await? {
        warn!(user_id = %owner, %note_id, "note not found");
        return Err(AppError::NoteNotFound);
    }
    info!(user_id = %owner, %note_id, "note deleted");
    Ok(())
}

/// Case-insensitive substring match over title or content.
pub async fn search_notes(
    notes: &dyn NoteStore,
    owner: Uuid,
    query: Option<String>,
) -> Result<Vec<Note>, AppError> {
    let query = required(query, "Search Query is required!")?;
    Ok(notes.search_by_owner(owner, &query).await?)
}
