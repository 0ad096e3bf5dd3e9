// SPDX-License-Identifier: MIT

//! Bulk export and import of the contact set.
//!
//! Records travel as flat JSON objects (the frontend handles the CSV
//! framing). Import is best-effort per record: a bad record is counted
//! and reported, never aborts the batch.

use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::NewContact;
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;

/// Separator used when flattening a contact's notes into one field.
const NOTES_SEPARATOR: &str = " | ";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/export", get(export_contacts))
        .route("/api/import", post(import_contacts))
}

/// One flat export record per contact, oldest first.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRecord {
    pub full_name: String,
    pub job_title: String,
    pub firm: String,
    pub role: String,
    pub email: String,
    pub phone: String,
    pub linked_in: String,
    pub reached_out: String,
    pub responded: String,
    pub referred_by: String,
    pub notes: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Export the user's contacts as flat records.
async fn export_contacts(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<ExportRecord>>> {
    let contacts = state.db.contacts_oldest_first(&user.user_id).await?;
    let mut notes_by_contact = state.db.notes_grouped_by_contact(&user.user_id).await?;

    // The full set is in hand, so referrer names resolve locally.
    let names_by_id: HashMap<&str, &str> = contacts
        .iter()
        .map(|c| (c.id.as_str(), c.full_name.as_str()))
        .collect();

    let records = contacts
        .iter()
        .map(|contact| {
            let referred_by = contact
                .referred_by_id
                .as_deref()
                .and_then(|id| names_by_id.get(id))
                .map(|name| name.to_string())
                .unwrap_or_default();

            let notes = notes_by_contact
                .remove(&contact.id)
                .map(|notes| {
                    notes
                        .iter()
                        .map(|n| n.content.as_str())
                        .collect::<Vec<_>>()
                        .join(NOTES_SEPARATOR)
                })
                .unwrap_or_default();

            ExportRecord {
                full_name: contact.full_name.clone(),
                job_title: contact.job_title.clone().unwrap_or_default(),
                firm: contact.firm.clone().unwrap_or_default(),
                role: contact.role.clone().unwrap_or_default(),
                email: contact.email.clone().unwrap_or_default(),
                phone: contact.phone.clone().unwrap_or_default(),
                linked_in: contact.linked_in.clone().unwrap_or_default(),
                reached_out: yes_no(contact.reached_out),
                responded: yes_no(contact.responded),
                referred_by,
                notes,
                created_at: format_utc_rfc3339(contact.created_at),
                updated_at: format_utc_rfc3339(contact.updated_at),
            }
        })
        .collect();

    Ok(Json(records))
}

/// One inbound flat record. Status flags accept either a boolean or the
/// literal "Yes" string (the export rendering).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRecord {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub firm: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub linked_in: Option<String>,
    #[serde(default, deserialize_with = "flag_from_yes_or_bool")]
    pub reached_out: bool,
    #[serde(default, deserialize_with = "flag_from_yes_or_bool")]
    pub responded: bool,
}

#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub contacts: Vec<ImportRecord>,
}

#[derive(Debug, Default, Serialize)]
pub struct ImportResults {
    pub success: u32,
    pub failed: u32,
    pub errors: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub message: String,
    pub results: ImportResults,
}

/// Import a batch of flat records. Per record: name required, then a
/// duplicate check (same name and firm, exact), then create.
async fn import_contacts(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<ImportRequest>,
) -> Result<Json<ImportResponse>> {
    let mut results = ImportResults::default();

    for record in payload.contacts {
        let Some(full_name) = record
            .full_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
        else {
            results.failed += 1;
            results
                .errors
                .push("Missing full name for contact".to_string());
            continue;
        };

        match import_one(&state, &user.user_id, full_name, &record).await {
            Ok(true) => results.success += 1,
            Ok(false) => {
                results.failed += 1;
                results.errors.push(format!("Duplicate contact: {}", full_name));
            }
            Err(e) => {
                results.failed += 1;
                results
                    .errors
                    .push(format!("Error importing {}: {}", full_name, e));
            }
        }
    }

    tracing::info!(
        user_id = %user.user_id,
        success = results.success,
        failed = results.failed,
        "Import completed"
    );

    Ok(Json(ImportResponse {
        message: format!(
            "Import completed: {} succeeded, {} failed",
            results.success, results.failed
        ),
        results,
    }))
}

/// Returns Ok(false) when the record is a duplicate.
async fn import_one(
    state: &Arc<AppState>,
    user_id: &str,
    full_name: &str,
    record: &ImportRecord,
) -> std::result::Result<bool, AppError> {
    let firm = record.firm.as_deref().filter(|f| !f.is_empty());

    if state
        .db
        .find_duplicate_contact(user_id, full_name, firm)
        .await?
        .is_some()
    {
        return Ok(false);
    }

    let payload = NewContact {
        full_name: Some(full_name.to_string()),
        job_title: non_empty(&record.job_title),
        firm: firm.map(String::from),
        role: non_empty(&record.role),
        email: non_empty(&record.email),
        phone: non_empty(&record.phone),
        linked_in: non_empty(&record.linked_in),
        reached_out: Some(record.reached_out),
        responded: Some(record.responded),
        referred_by_id: None,
    };

    state
        .db
        .create_contact(user_id, full_name.to_string(), payload)
        .await?;

    Ok(true)
}

fn yes_no(flag: bool) -> String {
    if flag { "Yes" } else { "No" }.to_string()
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|v| !v.is_empty()).map(String::from)
}

/// Accept `true`/`false`, the literal "Yes", or anything else as false.
fn flag_from_yes_or_bool<'de, D>(de: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    Ok(match Option::<Flag>::deserialize(de)? {
        Some(Flag::Bool(b)) => b,
        Some(Flag::Text(s)) => s == "Yes",
        None => false,
    })
}
