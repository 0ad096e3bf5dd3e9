//! Note model: timestamped free-text annotations on a contact.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A note attached to exactly one contact, owned by the same user.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub user_id: String,
    pub contact_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
