// SPDX-License-Identifier: MIT

//! Registration, sign-in and sign-out.

use crate::error::AppError;
use crate::middleware::auth::verify_token;
use crate::routes::profile::UserResponse;
use crate::AppState;
use axum::http::HeaderMap;
use axum::{extract::State, routing::post, Json, Router};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 80))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Session response: the bearer token plus the hydrated profile.
/// `user` is None when a session exists but the profile row is missing;
/// the client routes those principals back to registration.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub expires_at: String,
    pub user: Option<UserResponse>,
}

#[derive(Serialize)]
struct LogoutResponse {
    success: bool,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let (session, profile) = state
        .sessions
        .sign_up(&payload.email, &payload.password, &payload.name)
        .await?;

    Ok(Json(SessionResponse {
        token: session.token,
        expires_at: crate::time_utils::format_utc_rfc3339(session.expires_at),
        user: Some(UserResponse::from(profile)),
    }))
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let (session, profile) = state
        .sessions
        .sign_in(&payload.email, &payload.password)
        .await?;

    Ok(Json(SessionResponse {
        token: session.token,
        expires_at: crate::time_utils::format_utc_rfc3339(session.expires_at),
        user: profile.map(UserResponse::from),
    }))
}

/// Sign out. Always succeeds: the tracked session is cleared even when the
/// request carries no usable token.
async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Json<LogoutResponse> {
    if let Ok(user) = verify_token(&jar, &headers, &state.config.jwt_signing_key) {
        state.sessions.sign_out(&user.user_id);
    }
    Json(LogoutResponse { success: true })
}
