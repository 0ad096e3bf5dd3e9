// SPDX-License-Identifier: MIT

//! Reachbook: a personal CRM for professional networking.
//!
//! This crate provides the backend API for tracking networking contacts,
//! outreach status, referral chains, and free-text notes, with email/
//! password and Google Sign-In authentication.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Database;
use services::GoogleTokenVerifier;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub google_verifier: GoogleTokenVerifier,
}
