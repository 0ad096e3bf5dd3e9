// SPDX-License-Identifier: MIT

//! Reachbook API Server
//!
//! Personal CRM backend: contacts, outreach tracking, referral chains,
//! notes, dashboard stats, and bulk import/export.

use reachbook::{config::Config, db::Database, services::GoogleTokenVerifier, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Reachbook API");

    // Connect to the database and run migrations
    let db = Database::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    let google_verifier = GoogleTokenVerifier::new(&config.google_client_id)
        .expect("Failed to initialize Google token verifier");

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        google_verifier,
    });

    // Build router
    let app = reachbook::routes::create_router(state.clone());

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Drain the pool before exit
    state.db.close().await;
    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
    }
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("reachbook=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
