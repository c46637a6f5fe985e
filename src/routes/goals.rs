// SPDX-License-Identifier: MIT

//! Goal routes. Mutating endpoints return the refreshed goal list so the
//! dashboard never renders a stale collection.

use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::models::{Goal, GoalKind};
use crate::time_utils::now_secs;
use crate::AppState;
use axum::{
    extract::{Extension, Path, State},
    routing::{delete, get, patch},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateGoal {
    #[validate(length(min = 1, max = 120))]
    pub title: String,
    pub kind: GoalKind,
    #[validate(range(min = 0.1))]
    pub target: f64,
    #[validate(length(min = 1, max = 16))]
    pub unit: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ProgressUpdate {
    /// Fraction in [0, 1], never a percentage
    #[validate(range(min = 0.0, max = 1.0))]
    pub progress: f64,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/goals", get(list_goals).post(create_goal))
        .route("/api/goals/{id}", delete(delete_goal))
        .route("/api/goals/{id}/progress", patch(update_progress))
}

async fn list_goals(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Goal>>, AppError> {
    Ok(Json(state.db.goals_for_user(&user.user_id).await?))
}

async fn create_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateGoal>,
) -> Result<Json<Vec<Goal>>, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let goal = Goal {
        id: Uuid::new_v4().to_string(),
        user_id: user.user_id.clone(),
        title: payload.title,
        kind: payload.kind,
        target: payload.target,
        unit: payload.unit,
        progress: 0.0,
        created_at: now_secs(),
    };
    state.db.insert_goal(&goal).await?;

    Ok(Json(state.db.goals_for_user(&user.user_id).await?))
}

async fn delete_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(goal_id): Path<String>,
) -> Result<Json<Vec<Goal>>, AppError> {
    state.db.delete_goal(&user.user_id, &goal_id).await?;
    Ok(Json(state.db.goals_for_user(&user.user_id).await?))
}

async fn update_progress(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(goal_id): Path<String>,
    Json(payload): Json<ProgressUpdate>,
) -> Result<Json<Vec<Goal>>, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    state
        .db
        .update_goal_progress(&user.user_id, &goal_id, payload.progress)
        .await?;

    Ok(Json(state.db.goals_for_user(&user.user_id).await?))
}
