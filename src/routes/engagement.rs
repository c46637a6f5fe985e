// SPDX-License-Identifier: MIT

//! Reminders, notifications and achievements.

use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::models::{Achievement, Notification, Reminder};
use crate::time_utils::now_secs;
use crate::AppState;
use axum::{
    extract::{Extension, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

const NOTIFICATION_LIMIT: u32 = 10;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateReminder {
    #[validate(length(min = 1, max = 120))]
    pub title: String,
    #[validate(length(min = 1, max = 120))]
    pub schedule: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateNotification {
    #[validate(length(min = 1, max = 120))]
    pub title: String,
    #[validate(length(min = 1, max = 500))]
    pub message: String,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/reminders", get(list_reminders).post(create_reminder))
        .route(
            "/api/notifications",
            get(list_notifications).post(create_notification),
        )
        .route("/api/achievements", get(list_achievements))
}

async fn list_reminders(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Reminder>>, AppError> {
    Ok(Json(state.db.reminders_for_user(&user.user_id).await?))
}

async fn create_reminder(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateReminder>,
) -> Result<Json<Reminder>, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let reminder = Reminder {
        id: Uuid::new_v4().to_string(),
        user_id: user.user_id,
        title: payload.title,
        schedule: payload.schedule,
        created_at: now_secs(),
    };
    state.db.insert_reminder(&reminder).await?;
    Ok(Json(reminder))
}

async fn list_notifications(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Notification>>, AppError> {
    Ok(Json(
        state
            .db
            .notifications_for_user(&user.user_id, NOTIFICATION_LIMIT)
            .await?,
    ))
}

async fn create_notification(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateNotification>,
) -> Result<Json<Notification>, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let notification = Notification {
        id: Uuid::new_v4().to_string(),
        user_id: user.user_id,
        title: payload.title,
        message: payload.message,
        status: "new".to_string(),
        created_at: now_secs(),
    };
    state.db.insert_notification(&notification).await?;
    Ok(Json(notification))
}

async fn list_achievements(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Achievement>>, AppError> {
    Ok(Json(state.db.achievements_for_user(&user.user_id).await?))
}
