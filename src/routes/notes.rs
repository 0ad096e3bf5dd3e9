// SPDX-License-Identifier: MIT

//! Note routes, scoped to a contact and its owner.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::Note;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/notes/contact/{contact_id}", get(list_notes))
        .route("/api/notes", post(create_note))
        .route("/api/notes/{id}", put(update_note).delete(delete_note))
}

/// List a contact's notes, newest first. The contact must belong to the
/// requester.
async fn list_notes(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(contact_id): Path<String>,
) -> Result<Json<Vec<Note>>> {
    ensure_contact_owned(&state, &user.user_id, &contact_id).await?;

    let notes = state.db.notes_for_contact(&user.user_id, &contact_id).await?;
    Ok(Json(notes))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteRequest {
    #[serde(default)]
    pub contact_id: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Create a note. Contact ownership is checked before anything is
/// written, so a foreign contact id creates nothing.
async fn create_note(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateNoteRequest>,
) -> Result<(StatusCode, Json<Note>)> {
    let (contact_id, content) = match (payload.contact_id, payload.content) {
        (Some(contact_id), Some(content)) if !content.trim().is_empty() => (contact_id, content),
        _ => {
            return Err(AppError::BadRequest(
                "Contact ID and content are required".to_string(),
            ))
        }
    };

    ensure_contact_owned(&state, &user.user_id, &contact_id).await?;

    let note = state
        .db
        .create_note(&user.user_id, &contact_id, &content)
        .await?;

    Ok((StatusCode::CREATED, Json(note)))
}

#[derive(Deserialize)]
pub struct UpdateNoteRequest {
    #[serde(default)]
    pub content: Option<String>,
}

/// Replace a note's content.
async fn update_note(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateNoteRequest>,
) -> Result<Json<Note>> {
    let content = payload
        .content
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Content is required".to_string()))?;

    let mut note = state
        .db
        .get_note(&user.user_id, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Note not found".to_string()))?;

    state
        .db
        .update_note_content(&user.user_id, &id, &content)
        .await?;
    note.content = content;

    Ok(Json(note))
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// Delete a note.
async fn delete_note(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let deleted = state.db.delete_note(&user.user_id, &id).await?;

    if !deleted {
        return Err(AppError::NotFound("Note not found".to_string()));
    }

    Ok(Json(DeleteResponse {
        message: "Note deleted successfully".to_string(),
    }))
}

/// Uniform 404 when a contact is absent or owned by another user.
async fn ensure_contact_owned(
    state: &Arc<AppState>,
    user_id: &str,
    contact_id: &str,
) -> Result<()> {
    state
        .db
        .get_contact(user_id, contact_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::NotFound("Contact not found".to_string()))
}
