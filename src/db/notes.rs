// SPDX-License-Identifier: MIT

//! Note repository: annotations scoped to a contact and its owner.

use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use crate::db::Database;
use crate::error::AppError;
use crate::models::Note;

impl Database {
    /// All notes for a contact, newest first. Contact ownership is
    /// checked by the caller.
    pub async fn notes_for_contact(
        &self,
        user_id: &str,
        contact_id: &str,
    ) -> Result<Vec<Note>, AppError> {
        let notes = sqlx::query_as::<_, Note>(
            "SELECT * FROM notes WHERE contact_id = ? AND user_id = ?
             ORDER BY created_at DESC",
        )
        .bind(contact_id)
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;
        Ok(notes)
    }

    /// The single most recent note per contact, keyed by contact id.
    pub async fn latest_notes_by_contact(
        &self,
        user_id: &str,
    ) -> Result<HashMap<String, Note>, AppError> {
        let notes = sqlx::query_as::<_, Note>(
            "SELECT * FROM notes WHERE user_id = ? ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;

        let mut latest = HashMap::new();
        for note in notes {
            latest.entry(note.contact_id.clone()).or_insert(note);
        }
        Ok(latest)
    }

    /// All notes for a user grouped by contact, newest first within each
    /// group (export path).
    pub async fn notes_grouped_by_contact(
        &self,
        user_id: &str,
    ) -> Result<HashMap<String, Vec<Note>>, AppError> {
        let notes = sqlx::query_as::<_, Note>(
            "SELECT * FROM notes WHERE user_id = ? ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;

        let mut grouped: HashMap<String, Vec<Note>> = HashMap::new();
        for note in notes {
            grouped.entry(note.contact_id.clone()).or_default().push(note);
        }
        Ok(grouped)
    }

    /// Get a note by id, scoped to the owner.
    pub async fn get_note(&self, user_id: &str, note_id: &str) -> Result<Option<Note>, AppError> {
        let note = sqlx::query_as::<_, Note>("SELECT * FROM notes WHERE id = ? AND user_id = ?")
            .bind(note_id)
            .bind(user_id)
            .fetch_optional(self.pool())
            .await?;
        Ok(note)
    }

    /// Insert a note against a contact the caller has already verified
    /// belongs to this user.
    pub async fn create_note(
        &self,
        user_id: &str,
        contact_id: &str,
        content: &str,
    ) -> Result<Note, AppError> {
        let note = Note {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            contact_id: contact_id.to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO notes (id, user_id, contact_id, content, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&note.id)
        .bind(&note.user_id)
        .bind(&note.contact_id)
        .bind(&note.content)
        .bind(note.created_at)
        .execute(self.pool())
        .await?;

        Ok(note)
    }

    /// Replace a note's content.
    pub async fn update_note_content(
        &self,
        user_id: &str,
        note_id: &str,
        content: &str,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE notes SET content = ? WHERE id = ? AND user_id = ?")
            .bind(content)
            .bind(note_id)
            .bind(user_id)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    /// Delete a note, returning whether a row was removed.
    pub async fn delete_note(&self, user_id: &str, note_id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM notes WHERE id = ? AND user_id = ?")
            .bind(note_id)
            .bind(user_id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
