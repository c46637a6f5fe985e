// SPDX-License-Identifier: MIT

//! Profile routes: the signed-in principal's own profile, partial updates
//! and the one-way onboarding transition.

use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::models::profile::Units;
use crate::models::Profile;
use crate::services::session::{OnboardingUpdate, ProfileUpdate};
use crate::AppState;
use axum::{
    extract::{Extension, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

/// Profile as presented to the client.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    pub avatar_url: Option<String>,
    pub units: Option<Units>,
    pub preferred_focus: Option<String>,
    pub wearable_connected: bool,
    pub onboarding_complete: bool,
}

impl From<Profile> for UserResponse {
    fn from(profile: Profile) -> Self {
        // Fall back to the email's local part when the name is blank
        let name = if profile.full_name.trim().is_empty() {
            profile
                .email
                .split('@')
                .next()
                .unwrap_or_default()
                .to_string()
        } else {
            profile.full_name
        };

        Self {
            id: profile.id,
            email: profile.email,
            name,
            avatar_url: profile.avatar_url,
            units: profile.units,
            preferred_focus: profile.preferred_focus,
            wearable_connected: profile.wearable_connected,
            onboarding_complete: profile.onboarding_complete,
        }
    }
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me).patch(update_me))
        .route("/api/me/onboarding", post(complete_onboarding))
}

async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserResponse>, AppError> {
    let profile = state
        .db
        .get_profile(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", user.user_id)))?;

    Ok(Json(UserResponse::from(profile)))
}

async fn update_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<ProfileUpdate>,
) -> Result<Json<UserResponse>, AppError> {
    let profile = state.sessions.update_profile(&user.user_id, payload).await?;
    Ok(Json(UserResponse::from(profile)))
}

async fn complete_onboarding(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<OnboardingUpdate>,
) -> Result<Json<UserResponse>, AppError> {
    let profile = state
        .sessions
        .complete_onboarding(&user.user_id, payload)
        .await?;
    Ok(Json(UserResponse::from(profile)))
}
