use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
    Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::extractors::AuthUser,
    error::{AppError, Json},
    notes::{
        dto::{
            AddNoteRequest, EditNoteRequest, MessageResponse, NoteResponse, NotesResponse,
            PinNoteRequest, SearchParams,
        },
        services,
    },
    state::AppState,
};

/// Every route here must sit behind `require_auth`.
pub fn note_routes() -> Router<AppState> {
    Router::new()
        .route("/add-note", post(add_note))
        .route("/edit-note/:id", put(edit_note))
        .route("/get-all-notes", get(get_all_notes))
        .route("/delete-note/:id", delete(delete_note))
        .route("/update-note-Pinned/:id", put(update_note_pinned))
        .route("/search-notes", get(search_notes))
}

/// Ids that are not UUIDs cannot name an owned note.
fn parse_note_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NoteNotFound)
}

#[instrument(skip(state, payload))]
pub async fn add_note(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<AddNoteRequest>,
) -> Result<Json<NoteResponse>, AppError> {
    let note = services::create_note(state.notes.as_ref(), auth.id, payload).await?;
    Ok(Json(NoteResponse {
        error: false,
        note,
        message: "Note added successfully!".into(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn edit_note(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<EditNoteRequest>,
) -> Result<Json<NoteResponse>, AppError> {
    let changes = payload.into();
    let note_id = parse_note_id(&id)?;
    let note = services::edit_note(state.notes.as_ref(), auth.id, note_id, changes).await?;
    Ok(Json(NoteResponse {
        error: false,
        note,
        message: "Note updated successfully!".into(),
    }))
}

#[instrument(skip(state))]
pub async fn get_all_notes(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<NotesResponse>, AppError> {
    let notes = services::list_notes(state.notes.as_ref(), auth.id).await?;
    Ok(Json(NotesResponse {
        error: false,
        notes,
        message: "Notes fetched successfully!".into(),
    }))
}

#[instrument(skip(state))]
pub async fn delete_note(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let note_id = parse_note_id(&id)?;
    services::delete_note(state.notes.as_ref(), auth.id, note_id).await?;
    Ok(Json(MessageResponse {
        error: false,
        message: "Note deleted successfully!".into(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_note_pinned(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<PinNoteRequest>,
) -> Result<Json<NoteResponse>, AppError> {
    let is_pinned = payload
        .is_pinned
        .ok_or_else(|| AppError::validation("isPinned is required!"))?;
    let note_id = parse_note_id(&id)?;
    let note = services::set_pinned(state.notes.as_ref(), auth.id, note_id, is_pinned).await?;
    Ok(Json(NoteResponse {
        error: false,
        note,
        message: "Note updated successfully!".into(),
    }))
}

#[instrument(skip(state))]
pub async fn search_notes(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<SearchParams>,
) -> Result<Json<NotesResponse>, AppError> {
    let notes = services::search_notes(state.notes.as_ref(), auth.id, params.query).await?;
    Ok(Json(NotesResponse {
        error: false,
        notes,
        message: "Notes fetched successfully!".into(),
    }))
}
