// SPDX-License-Identifier: MIT

//! Dashboard statistics route.

use axum::{extract::State, routing::get, Extension, Json, Router};
use std::sync::Arc;

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::DashboardStats;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/dashboard/stats", get(get_stats))
}

/// Compute dashboard stats over the user's full contact set.
///
/// Nothing is pre-aggregated; this recomputes from the contact rows on
/// every request.
async fn get_stats(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DashboardStats>> {
    let contacts = state.db.contacts_oldest_first(&user.user_id).await?;
    Ok(Json(DashboardStats::compute(&contacts)))
}
