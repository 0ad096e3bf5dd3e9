// SPDX-License-Identifier: MIT

//! User account operations.

use chrono::Utc;
use uuid::Uuid;

use crate::db::Database;
use crate::error::AppError;
use crate::models::User;

/// Fields needed to create a user account.
pub struct NewUser {
    pub email: String,
    pub password_hash: Option<String>,
    pub google_id: Option<String>,
    pub name: String,
    pub picture: Option<String>,
}

impl Database {
    /// Get a user by id.
    pub async fn get_user(&self, id: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(user)
    }

    /// Look up a user by email; email is the stable merge key between
    /// password accounts and Google accounts.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(self.pool())
            .await?;
        Ok(user)
    }

    /// Look up a user by their Google subject claim.
    pub async fn find_user_by_google_id(&self, google_id: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE google_id = ?")
            .bind(google_id)
            .fetch_optional(self.pool())
            .await?;
        Ok(user)
    }

    /// Create a user account.
    pub async fn create_user(&self, new_user: NewUser) -> Result<User, AppError> {
        let user = User {
            id: Uuid::new_v4().to_string(),
            email: new_user.email,
            password_hash: new_user.password_hash,
            google_id: new_user.google_id,
            name: new_user.name,
            picture: new_user.picture,
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO users (id, email, password_hash, google_id, name, picture, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.google_id)
        .bind(&user.name)
        .bind(&user.picture)
        .bind(user.created_at)
        .execute(self.pool())
        .await?;

        Ok(user)
    }

    /// Attach a Google identity to an existing account (matched by email)
    /// and refresh the display name and picture. Returns the updated row.
    pub async fn link_google_identity(
        &self,
        user_id: &str,
        google_id: &str,
        name: &str,
        picture: Option<&str>,
    ) -> Result<User, AppError> {
        sqlx::query("UPDATE users SET google_id = ?, name = ?, picture = ? WHERE id = ?")
            .bind(google_id)
            .bind(name)
            .bind(picture)
            .bind(user_id)
            .execute(self.pool())
            .await?;

        self.get_user(user_id)
            .await?
            .ok_or_else(|| AppError::Database("User vanished during Google link".to_string()))
    }

    /// Refresh name/picture from a fresh Google login.
    pub async fn refresh_google_profile(
        &self,
        user_id: &str,
        name: &str,
        picture: Option<&str>,
    ) -> Result<User, AppError> {
        sqlx::query("UPDATE users SET name = ?, picture = ? WHERE id = ?")
            .bind(name)
            .bind(picture)
            .bind(user_id)
            .execute(self.pool())
            .await?;

        self.get_user(user_id)
            .await?
            .ok_or_else(|| AppError::Database("User vanished during profile refresh".to_string()))
    }
}
