//! Contact model, filter predicates, and write payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::Note;

/// A networking contact owned by exactly one user.
///
/// `referred_by_id`, when set, points at another contact of the *same*
/// user. That invariant is enforced at write time, not by the schema.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    pub user_id: String,
    pub full_name: String,
    pub job_title: Option<String>,
    pub firm: Option<String>,
    pub role: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linked_in: Option<String>,
    pub reached_out: bool,
    pub responded: bool,
    pub referred_by_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Minimal referral edge: just enough to render a link in the UI.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ContactLink {
    pub id: String,
    pub full_name: String,
}

/// Contact enriched with referral linkage and notes.
///
/// The list endpoint carries only the most recent note; the detail
/// endpoint carries the full history (newest first).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetail {
    #[serde(flatten)]
    pub contact: Contact,
    pub referred_by: Option<ContactLink>,
    pub referred_contacts: Vec<ContactLink>,
    pub notes: Vec<Note>,
}

/// Filter predicates for listing contacts. All supplied filters are ANDed;
/// `search` is a case-insensitive substring match ORed over
/// name/firm/role/email.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactFilter {
    pub firm: Option<String>,
    pub role: Option<String>,
    pub reached_out: Option<bool>,
    pub responded: Option<bool>,
    pub search: Option<String>,
}

/// Payload for creating a contact. Only `full_name` is required.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContact {
    pub full_name: Option<String>,
    pub job_title: Option<String>,
    pub firm: Option<String>,
    pub role: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linked_in: Option<String>,
    #[serde(default)]
    pub reached_out: Option<bool>,
    #[serde(default)]
    pub responded: Option<bool>,
    pub referred_by_id: Option<String>,
}

/// Partial update payload. An omitted key leaves the stored field
/// unchanged; an explicit `null` clears a nullable field. The
/// double-`Option` distinguishes the two.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPatch {
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub job_title: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub firm: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub role: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub linked_in: Option<Option<String>>,
    pub reached_out: Option<bool>,
    pub responded: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub referred_by_id: Option<Option<String>>,
}

impl ContactPatch {
    /// Apply the patch to an existing row, returning the merged contact.
    /// Timestamps are left to the caller.
    pub fn apply(self, mut contact: Contact) -> Contact {
        if let Some(full_name) = self.full_name {
            contact.full_name = full_name;
        }
        if let Some(job_title) = self.job_title {
            contact.job_title = job_title;
        }
        if let Some(firm) = self.firm {
            contact.firm = firm;
        }
        if let Some(role) = self.role {
            contact.role = role;
        }
        if let Some(email) = self.email {
            contact.email = email;
        }
        if let Some(phone) = self.phone {
            contact.phone = phone;
        }
        if let Some(linked_in) = self.linked_in {
            contact.linked_in = linked_in;
        }
        if let Some(reached_out) = self.reached_out {
            contact.reached_out = reached_out;
        }
        if let Some(responded) = self.responded {
            contact.responded = responded;
        }
        if let Some(referred_by_id) = self.referred_by_id {
            contact.referred_by_id = referred_by_id;
        }
        contact
    }
}

/// Deserialize a present-but-possibly-null key as `Some(Option<T>)`.
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}
