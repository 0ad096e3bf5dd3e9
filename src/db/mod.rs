// SPDX-License-Identifier: MIT

//! Database layer (SQLite via sqlx).
//!
//! [`Database`] is an explicitly constructed handle with a
//! connect/close lifecycle, injected into handlers through `AppState`.
//! The typed operations live in the submodules:
//! - users: account lookup, creation, Google identity merge
//! - contacts: CRUD with ownership scoping and referral enrichment
//! - notes: per-contact annotations

pub mod contacts;
pub mod notes;
pub mod users;

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::error::AppError;

/// Default maximum number of connections in the pool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Default connection acquire timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// SQLite database handle.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to the database and run pending migrations.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::Database(format!("Invalid database URL: {}", e)))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(DEFAULT_MAX_CONNECTIONS)
            .acquire_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
            .connect_with(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect: {}", e)))?;

        let db = Self { pool };
        db.migrate().await?;

        tracing::info!(url = database_url, "Connected to database");
        Ok(db)
    }

    /// Connect to a fresh in-memory database (tests).
    ///
    /// The pool is pinned to a single connection: an in-memory SQLite
    /// database lives and dies with its connection.
    pub async fn connect_in_memory() -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| AppError::Database(format!("Invalid database URL: {}", e)))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect: {}", e)))?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Migration failed: {}", e)))
    }

    /// Access the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the pool, draining in-flight connections.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
