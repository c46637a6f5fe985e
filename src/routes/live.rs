// SPDX-License-Identifier: MIT

//! Live workout routes.

use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::services::live_workout::{record_completion, LiveSession};
use crate::services::WorkoutTemplate;
use crate::AppState;
use axum::{
    extract::{Extension, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct StopResponse {
    pub completed: bool,
    pub duration_minutes: Option<u32>,
    pub calories: Option<f64>,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/live/start", post(start))
        .route("/api/live", get(status))
        .route("/api/live/stop", post(stop))
}

async fn start(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(template): Json<WorkoutTemplate>,
) -> Json<LiveSession> {
    let session = state.live_workouts.start(&user.user_id, template);
    state.live_workouts.spawn_ticker(&user.user_id);
    Json(session)
}

async fn status(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Json<Option<LiveSession>> {
    Json(state.live_workouts.status(&user.user_id))
}

/// Stop the live session and persist it. A stop with nothing live is not
/// an error; the response just says nothing completed.
async fn stop(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<StopResponse>, AppError> {
    let Some(completed) = state.live_workouts.stop(&user.user_id) else {
        return Ok(Json(StopResponse {
            completed: false,
            duration_minutes: None,
            calories: None,
        }));
    };

    record_completion(&state.db, &user.user_id, &completed).await?;

    Ok(Json(StopResponse {
        completed: true,
        duration_minutes: Some(completed.duration_minutes()),
        calories: Some(completed.calories()),
    }))
}
