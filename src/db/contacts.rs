// SPDX-License-Identifier: MIT

//! Contact repository: ownership-scoped CRUD with referral enrichment.
//!
//! Every query filters by the owning user's id in addition to any entity
//! id; a contact belonging to another user is indistinguishable from one
//! that does not exist. Referral linkage is resolved by keyed lookup over
//! the user's own contact set, never by pointer traversal.

use std::collections::HashMap;

use chrono::Utc;
use sqlx::QueryBuilder;
use uuid::Uuid;

use crate::db::Database;
use crate::error::AppError;
use crate::models::{Contact, ContactDetail, ContactFilter, ContactLink, NewContact};

impl Database {
    /// List a user's contacts matching all supplied filters, newest first.
    ///
    /// Each result is enriched with its referrer, the contacts it
    /// referred, and its single most recent note.
    pub async fn list_contacts(
        &self,
        user_id: &str,
        filter: &ContactFilter,
    ) -> Result<Vec<ContactDetail>, AppError> {
        let mut qb: QueryBuilder<sqlx::Sqlite> =
            QueryBuilder::new("SELECT * FROM contacts WHERE user_id = ");
        qb.push_bind(user_id);

        if let Some(firm) = &filter.firm {
            qb.push(" AND firm = ").push_bind(firm.clone());
        }
        if let Some(role) = &filter.role {
            qb.push(" AND role = ").push_bind(role.clone());
        }
        if let Some(reached_out) = filter.reached_out {
            qb.push(" AND reached_out = ").push_bind(reached_out);
        }
        if let Some(responded) = filter.responded {
            qb.push(" AND responded = ").push_bind(responded);
        }
        if let Some(search) = &filter.search {
            let pattern = format!("%{}%", search);
            qb.push(" AND (full_name LIKE ").push_bind(pattern.clone());
            qb.push(" OR firm LIKE ").push_bind(pattern.clone());
            qb.push(" OR role LIKE ").push_bind(pattern.clone());
            qb.push(" OR email LIKE ").push_bind(pattern);
            qb.push(")");
        }
        qb.push(" ORDER BY created_at DESC");

        let contacts: Vec<Contact> = qb
            .build_query_as()
            .fetch_all(self.pool())
            .await?;

        // Referral edges are resolved against the user's full contact set,
        // not the filtered one: a referrer may itself be filtered out.
        let (names_by_id, referred_by_referrer) = self.referral_maps(user_id).await?;
        let mut latest_notes = self.latest_notes_by_contact(user_id).await?;

        let details = contacts
            .into_iter()
            .map(|contact| {
                let referred_by = contact
                    .referred_by_id
                    .as_deref()
                    .and_then(|id| names_by_id.get(id).cloned());
                let referred_contacts = referred_by_referrer
                    .get(&contact.id)
                    .cloned()
                    .unwrap_or_default();
                let notes = latest_notes.remove(&contact.id).into_iter().collect();

                ContactDetail {
                    contact,
                    referred_by,
                    referred_contacts,
                    notes,
                }
            })
            .collect();

        Ok(details)
    }

    /// Get a single contact row, scoped to the owner.
    pub async fn get_contact(
        &self,
        user_id: &str,
        contact_id: &str,
    ) -> Result<Option<Contact>, AppError> {
        let contact =
            sqlx::query_as::<_, Contact>("SELECT * FROM contacts WHERE id = ? AND user_id = ?")
                .bind(contact_id)
                .bind(user_id)
                .fetch_optional(self.pool())
                .await?;
        Ok(contact)
    }

    /// Get a contact with full referral linkage and complete note history.
    pub async fn get_contact_detail(
        &self,
        user_id: &str,
        contact_id: &str,
    ) -> Result<Option<ContactDetail>, AppError> {
        let Some(contact) = self.get_contact(user_id, contact_id).await? else {
            return Ok(None);
        };

        let referred_by = match contact.referred_by_id.as_deref() {
            Some(referrer_id) => self.contact_link(user_id, referrer_id).await?,
            None => None,
        };

        let referred_contacts = sqlx::query_as::<_, ContactLink>(
            "SELECT id, full_name FROM contacts
             WHERE user_id = ? AND referred_by_id = ?
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .bind(&contact.id)
        .fetch_all(self.pool())
        .await?;

        let notes = self.notes_for_contact(user_id, &contact.id).await?;

        Ok(Some(ContactDetail {
            contact,
            referred_by,
            referred_contacts,
            notes,
        }))
    }

    /// Insert a new contact. Caller validates the payload and the
    /// referrer's ownership first.
    pub async fn create_contact(
        &self,
        user_id: &str,
        full_name: String,
        payload: NewContact,
    ) -> Result<Contact, AppError> {
        let now = Utc::now();
        let contact = Contact {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            full_name,
            job_title: payload.job_title,
            firm: payload.firm,
            role: payload.role,
            email: payload.email,
            phone: payload.phone,
            linked_in: payload.linked_in,
            reached_out: payload.reached_out.unwrap_or(false),
            responded: payload.responded.unwrap_or(false),
            referred_by_id: payload.referred_by_id,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            "INSERT INTO contacts
             (id, user_id, full_name, job_title, firm, role, email, phone, linked_in,
              reached_out, responded, referred_by_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&contact.id)
        .bind(&contact.user_id)
        .bind(&contact.full_name)
        .bind(&contact.job_title)
        .bind(&contact.firm)
        .bind(&contact.role)
        .bind(&contact.email)
        .bind(&contact.phone)
        .bind(&contact.linked_in)
        .bind(contact.reached_out)
        .bind(contact.responded)
        .bind(&contact.referred_by_id)
        .bind(contact.created_at)
        .bind(contact.updated_at)
        .execute(self.pool())
        .await?;

        Ok(contact)
    }

    /// Write back a merged contact row. The row is written whole; the
    /// caller has already applied the patch and revalidated any changed
    /// referrer.
    pub async fn update_contact(&self, contact: &Contact) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE contacts SET
               full_name = ?, job_title = ?, firm = ?, role = ?, email = ?,
               phone = ?, linked_in = ?, reached_out = ?, responded = ?,
               referred_by_id = ?, updated_at = ?
             WHERE id = ? AND user_id = ?",
        )
        .bind(&contact.full_name)
        .bind(&contact.job_title)
        .bind(&contact.firm)
        .bind(&contact.role)
        .bind(&contact.email)
        .bind(&contact.phone)
        .bind(&contact.linked_in)
        .bind(contact.reached_out)
        .bind(contact.responded)
        .bind(&contact.referred_by_id)
        .bind(contact.updated_at)
        .bind(&contact.id)
        .bind(&contact.user_id)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Delete a contact, returning whether a row was removed.
    ///
    /// The schema cascades the contact's notes and nulls out referral
    /// edges that pointed at it.
    pub async fn delete_contact(&self, user_id: &str, contact_id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = ? AND user_id = ?")
            .bind(contact_id)
            .bind(user_id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Probe for an import duplicate: same full name and same firm
    /// (exact, case-sensitive, treating two NULL firms as equal).
    pub async fn find_duplicate_contact(
        &self,
        user_id: &str,
        full_name: &str,
        firm: Option<&str>,
    ) -> Result<Option<Contact>, AppError> {
        let contact = sqlx::query_as::<_, Contact>(
            "SELECT * FROM contacts WHERE user_id = ? AND full_name = ? AND firm IS ?",
        )
        .bind(user_id)
        .bind(full_name)
        .bind(firm)
        .fetch_optional(self.pool())
        .await?;
        Ok(contact)
    }

    /// All contacts for a user, oldest first (export and dashboard order).
    pub async fn contacts_oldest_first(&self, user_id: &str) -> Result<Vec<Contact>, AppError> {
        let contacts = sqlx::query_as::<_, Contact>(
            "SELECT * FROM contacts WHERE user_id = ? ORDER BY created_at ASC",
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;
        Ok(contacts)
    }

    async fn contact_link(
        &self,
        user_id: &str,
        contact_id: &str,
    ) -> Result<Option<ContactLink>, AppError> {
        let link = sqlx::query_as::<_, ContactLink>(
            "SELECT id, full_name FROM contacts WHERE id = ? AND user_id = ?",
        )
        .bind(contact_id)
        .bind(user_id)
        .fetch_optional(self.pool())
        .await?;
        Ok(link)
    }

    /// Build keyed lookup maps over the user's whole contact set:
    /// id -> link, and referrer id -> contacts referred.
    async fn referral_maps(
        &self,
        user_id: &str,
    ) -> Result<(HashMap<String, ContactLink>, HashMap<String, Vec<ContactLink>>), AppError> {
        #[derive(sqlx::FromRow)]
        struct Edge {
            id: String,
            full_name: String,
            referred_by_id: Option<String>,
        }

        let edges = sqlx::query_as::<_, Edge>(
            "SELECT id, full_name, referred_by_id FROM contacts
             WHERE user_id = ? ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;

        let mut names_by_id = HashMap::new();
        let mut referred_by_referrer: HashMap<String, Vec<ContactLink>> = HashMap::new();

        for edge in edges {
            let link = ContactLink {
                id: edge.id.clone(),
                full_name: edge.full_name,
            };
            if let Some(referrer_id) = edge.referred_by_id {
                referred_by_referrer
                    .entry(referrer_id)
                    .or_default()
                    .push(link.clone());
            }
            names_by_id.insert(edge.id, link);
        }

        Ok((names_by_id, referred_by_referrer))
    }
}
