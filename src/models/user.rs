//! User model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User account row.
///
/// Either `password_hash` (email/password accounts) or `google_id`
/// (Google Sign-In accounts) is set; a user who signed up with a password
/// and later logs in with Google ends up with both.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub email: String,
    /// Argon2id PHC string; None for OAuth-only accounts
    pub password_hash: Option<String>,
    /// Google subject claim, unique per Google account
    pub google_id: Option<String>,
    pub name: String,
    pub picture: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Public profile projection returned by the API (never exposes the hash).
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            picture: user.picture,
        }
    }
}
