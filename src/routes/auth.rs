// SPDX-License-Identifier: MIT

//! Authentication routes: register, login, Google Sign-In, profile.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::db::users::NewUser;
use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, AuthUser};
use crate::models::PublicUser;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/google", post(google_login))
}

pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/auth/me", get(get_me))
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub user: PublicUser,
}

/// Register a new email/password account.
async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError::BadRequest(
            "Email and password are required".to_string(),
        ));
    }

    if state
        .db
        .find_user_by_email(&payload.email)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest("User already exists".to_string()));
    }

    let password_hash = crate::services::password::hash_password(&payload.password)?;

    let user = state
        .db
        .create_user(NewUser {
            email: payload.email,
            password_hash: Some(password_hash),
            google_id: None,
            name: payload.name,
            picture: None,
        })
        .await?;

    tracing::info!(user_id = %user.id, "User registered");

    let token = create_jwt(&user.id, &state.config.jwt_signing_key)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User created successfully".to_string(),
            token,
            user: user.into(),
        }),
    ))
}

/// Log in with email and password.
///
/// Unknown email, wrong password, and password-less (Google-only)
/// accounts all produce the same 401 response.
async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let user = state
        .db
        .find_user_by_email(&payload.email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let hash = user
        .password_hash
        .as_deref()
        .ok_or(AppError::InvalidCredentials)?;

    if !crate::services::password::verify_password(&payload.password, hash)? {
        return Err(AppError::InvalidCredentials);
    }

    let token = create_jwt(&user.id, &state.config.jwt_signing_key)?;

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        token,
        user: user.into(),
    }))
}

#[derive(Deserialize)]
pub struct GoogleAuthRequest {
    pub credential: String,
}

#[derive(Serialize)]
pub struct GoogleAuthResponse {
    pub success: bool,
    pub token: String,
    pub user: PublicUser,
}

/// Exchange a Google ID token for a session token.
///
/// The account is resolved in order: existing Google identity, existing
/// email account (which gets the Google identity attached), fresh signup.
async fn google_login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<GoogleAuthRequest>,
) -> Result<Json<GoogleAuthResponse>> {
    if payload.credential.is_empty() {
        return Err(AppError::BadRequest("No credential provided".to_string()));
    }

    let profile = state
        .google_verifier
        .verify_credential(&payload.credential)
        .await?;

    let user = match state.db.find_user_by_google_id(&profile.google_id).await? {
        Some(existing) => {
            state
                .db
                .refresh_google_profile(&existing.id, &profile.name, profile.picture.as_deref())
                .await?
        }
        None => match state.db.find_user_by_email(&profile.email).await? {
            Some(existing) => {
                tracing::info!(user_id = %existing.id, "Linking Google identity to existing account");
                state
                    .db
                    .link_google_identity(
                        &existing.id,
                        &profile.google_id,
                        &profile.name,
                        profile.picture.as_deref(),
                    )
                    .await?
            }
            None => {
                let user = state
                    .db
                    .create_user(NewUser {
                        email: profile.email,
                        password_hash: None,
                        google_id: Some(profile.google_id),
                        name: profile.name,
                        picture: profile.picture,
                    })
                    .await?;
                tracing::info!(user_id = %user.id, "User created via Google Sign-In");
                user
            }
        },
    };

    let token = create_jwt(&user.id, &state.config.jwt_signing_key)?;

    Ok(Json(GoogleAuthResponse {
        success: true,
        token,
        user: user.into(),
    }))
}

#[derive(Serialize)]
pub struct MeResponse {
    pub user: PublicUser,
}

/// Get current user profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<MeResponse>> {
    let profile = state
        .db
        .get_user(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(MeResponse {
        user: profile.into(),
    }))
}
