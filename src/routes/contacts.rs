// SPDX-License-Identifier: MIT

//! Contact CRUD routes.
//!
//! Ownership scoping produces a uniform "Contact not found" for ids that
//! do not exist and ids that belong to another user, so existence never
//! leaks across accounts.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{ContactDetail, ContactFilter, ContactPatch, NewContact};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/contacts", get(list_contacts).post(create_contact))
        .route(
            "/api/contacts/{id}",
            get(get_contact).put(update_contact).delete(delete_contact),
        )
}

/// List contacts with optional filters.
async fn list_contacts(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(filter): Query<ContactFilter>,
) -> Result<Json<Vec<ContactDetail>>> {
    tracing::debug!(user_id = %user.user_id, ?filter, "Listing contacts");

    let contacts = state.db.list_contacts(&user.user_id, &filter).await?;
    Ok(Json(contacts))
}

/// Get a single contact with full note history and referral linkage.
async fn get_contact(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<ContactDetail>> {
    let contact = state
        .db
        .get_contact_detail(&user.user_id, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Contact not found".to_string()))?;

    Ok(Json(contact))
}

/// Create a contact.
async fn create_contact(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<NewContact>,
) -> Result<(StatusCode, Json<ContactDetail>)> {
    let full_name = payload
        .full_name
        .clone()
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Full name is required".to_string()))?;

    if let Some(referrer_id) = &payload.referred_by_id {
        ensure_referrer_owned(&state, &user.user_id, referrer_id).await?;
    }

    let contact = state
        .db
        .create_contact(&user.user_id, full_name, payload)
        .await?;

    tracing::info!(user_id = %user.user_id, contact_id = %contact.id, "Contact created");

    let detail = state
        .db
        .get_contact_detail(&user.user_id, &contact.id)
        .await?
        .ok_or_else(|| AppError::Database("Contact vanished after create".to_string()))?;

    Ok((StatusCode::CREATED, Json(detail)))
}

/// Update a contact. Supplied keys are replaced whole; omitted keys are
/// left unchanged. A changed referrer is revalidated against ownership.
async fn update_contact(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(patch): Json<ContactPatch>,
) -> Result<Json<ContactDetail>> {
    let existing = state
        .db
        .get_contact(&user.user_id, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Contact not found".to_string()))?;

    if let Some(Some(referrer_id)) = &patch.referred_by_id {
        if existing.referred_by_id.as_deref() != Some(referrer_id.as_str()) {
            ensure_referrer_owned(&state, &user.user_id, referrer_id).await?;
        }
    }

    let mut merged = patch.apply(existing);
    merged.updated_at = Utc::now();
    state.db.update_contact(&merged).await?;

    let detail = state
        .db
        .get_contact_detail(&user.user_id, &id)
        .await?
        .ok_or_else(|| AppError::Database("Contact vanished after update".to_string()))?;

    Ok(Json(detail))
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// Delete a contact. Notes cascade; referral edges pointing at the
/// deleted contact are nulled out.
async fn delete_contact(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let deleted = state.db.delete_contact(&user.user_id, &id).await?;

    if !deleted {
        return Err(AppError::NotFound("Contact not found".to_string()));
    }

    tracing::info!(user_id = %user.user_id, contact_id = %id, "Contact deleted");

    Ok(Json(DeleteResponse {
        message: "Contact deleted successfully".to_string(),
    }))
}

/// A referrer id must resolve to a contact owned by the same user.
async fn ensure_referrer_owned(
    state: &Arc<AppState>,
    user_id: &str,
    referrer_id: &str,
) -> Result<()> {
    state
        .db
        .get_contact(user_id, referrer_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::BadRequest("Invalid referrer".to_string()))
}
