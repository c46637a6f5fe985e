// SPDX-License-Identifier: MIT

//! Append-only log routes: workouts, activities, meals, hydration and
//! body weight. Each list endpoint returns the most recent rows up to a
//! fixed cap the dashboard renders.

use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::models::{ActivitySession, HydrationEntry, MealLog, WeightEntry, WorkoutSession};
use crate::time_utils::{local_date, now_secs, truncate_to_secs};
use crate::AppState;
use axum::{
    extract::{Extension, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// Recent-row caps per log type.
const WORKOUT_LIMIT: u32 = 12;
const ACTIVITY_LIMIT: u32 = 10;
const MEAL_LIMIT: u32 = 10;
const HYDRATION_LIMIT: u32 = 15;
const WEIGHT_LIMIT: u32 = 14;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateWorkout {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[serde(rename = "type")]
    pub workout_type: String,
    pub intensity: String,
    #[validate(range(min = 1, max = 1440))]
    pub duration_minutes: u32,
    #[validate(range(min = 0.0))]
    pub calories: f64,
    pub started_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateMeal {
    #[validate(length(min = 1, max = 120))]
    pub label: String,
    #[validate(range(min = 0.0))]
    pub calories: f64,
    #[validate(range(min = 0.0))]
    pub protein: f64,
    #[validate(range(min = 0.0))]
    pub carbs: f64,
    #[validate(range(min = 0.0))]
    pub fats: f64,
    pub logged_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateHydration {
    #[validate(range(min = 0.1))]
    pub amount_oz: f64,
    pub label: Option<String>,
    pub logged_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateActivity {
    #[validate(length(min = 1, max = 120))]
    pub title: String,
    #[validate(range(min = 0.0))]
    pub distance_km: Option<f64>,
    #[validate(range(min = 1, max = 1440))]
    pub duration_minutes: u32,
    pub pace: Option<String>,
    pub route_quality: Option<String>,
    pub recorded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateWeight {
    #[validate(range(min = 1.0, max = 1500.0))]
    pub weight: f64,
    pub recorded_on: Option<NaiveDate>,
    /// Client UTC offset in minutes, east positive. Only consulted when
    /// `recorded_on` is absent.
    #[serde(default)]
    pub tz_offset_minutes: i32,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/workouts", get(list_workouts).post(add_workout))
        .route("/api/activities", get(list_activities).post(add_activity))
        .route("/api/meals", get(list_meals).post(add_meal))
        .route("/api/hydration", get(list_hydration).post(add_hydration))
        .route("/api/weight", get(list_weight).post(add_weight))
}

fn check<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

// Event timestamps are stored at whole-second precision so range filters
// compare cleanly.
fn event_time(provided: Option<DateTime<Utc>>) -> DateTime<Utc> {
    provided.map(truncate_to_secs).unwrap_or_else(now_secs)
}

async fn list_workouts(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<WorkoutSession>>, AppError> {
    Ok(Json(
        state.db.recent_workouts(&user.user_id, WORKOUT_LIMIT).await?,
    ))
}

async fn add_workout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateWorkout>,
) -> Result<Json<WorkoutSession>, AppError> {
    check(&payload)?;

    let row = WorkoutSession {
        id: Uuid::new_v4().to_string(),
        user_id: user.user_id,
        name: payload.name,
        workout_type: payload.workout_type,
        intensity: payload.intensity,
        duration_minutes: payload.duration_minutes,
        calories: payload.calories,
        started_at: event_time(payload.started_at),
    };
    state.db.add_workout(&row).await?;
    Ok(Json(row))
}

async fn list_activities(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<ActivitySession>>, AppError> {
    Ok(Json(
        state.db.recent_activity(&user.user_id, ACTIVITY_LIMIT).await?,
    ))
}

async fn add_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateActivity>,
) -> Result<Json<ActivitySession>, AppError> {
    check(&payload)?;

    let row = ActivitySession {
        id: Uuid::new_v4().to_string(),
        user_id: user.user_id,
        title: payload.title,
        distance_km: payload.distance_km,
        duration_minutes: payload.duration_minutes,
        pace: payload.pace,
        route_quality: payload.route_quality,
        recorded_at: event_time(payload.recorded_at),
    };
    state.db.add_activity(&row).await?;
    Ok(Json(row))
}

async fn list_meals(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<MealLog>>, AppError> {
    Ok(Json(state.db.recent_meals(&user.user_id, MEAL_LIMIT).await?))
}

async fn add_meal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateMeal>,
) -> Result<Json<MealLog>, AppError> {
    check(&payload)?;

    let row = MealLog {
        id: Uuid::new_v4().to_string(),
        user_id: user.user_id,
        label: payload.label,
        calories: payload.calories,
        protein: payload.protein,
        carbs: payload.carbs,
        fats: payload.fats,
        logged_at: event_time(payload.logged_at),
    };
    state.db.add_meal(&row).await?;
    Ok(Json(row))
}

async fn list_hydration(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<HydrationEntry>>, AppError> {
    Ok(Json(
        state
            .db
            .recent_hydration(&user.user_id, HYDRATION_LIMIT)
            .await?,
    ))
}

async fn add_hydration(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateHydration>,
) -> Result<Json<HydrationEntry>, AppError> {
    check(&payload)?;

    let row = HydrationEntry {
        id: Uuid::new_v4().to_string(),
        user_id: user.user_id,
        label: payload.label.unwrap_or_else(|| "Quick add".to_string()),
        amount_oz: payload.amount_oz,
        logged_at: event_time(payload.logged_at),
    };
    state.db.add_hydration(&row).await?;
    Ok(Json(row))
}

/// Weight history is returned oldest-first so the client can chart the
/// trend directly.
async fn list_weight(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<WeightEntry>>, AppError> {
    Ok(Json(
        state.db.weight_history(&user.user_id, WEIGHT_LIMIT).await?,
    ))
}

async fn add_weight(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateWeight>,
) -> Result<Json<WeightEntry>, AppError> {
    check(&payload)?;

    let recorded_on = match payload.recorded_on {
        Some(date) => date,
        None => local_today(Utc::now(), payload.tz_offset_minutes)?,
    };

    let row = WeightEntry {
        id: Uuid::new_v4().to_string(),
        user_id: user.user_id,
        weight: payload.weight,
        recorded_on,
    };
    state.db.add_weight(&row).await?;
    Ok(Json(row))
}

/// Local calendar date for a weight entry logged "today". An evening log
/// west of UTC must not land on tomorrow's date.
fn local_today(now: DateTime<Utc>, tz_offset_minutes: i32) -> Result<NaiveDate, AppError> {
    let tz = crate::routes::summary::client_offset(tz_offset_minutes)?;
    Ok(local_date(now, tz))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_local_today_follows_client_offset() {
        // 02:00 UTC on Mar 11 is still Mar 10 at UTC-8
        let now = Utc.with_ymd_and_hms(2024, 3, 11, 2, 0, 0).unwrap();

        assert_eq!(
            local_today(now, -8 * 60).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
        );
        assert_eq!(
            local_today(now, 0).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()
        );
    }

    #[test]
    fn test_local_today_rejects_out_of_range_offset() {
        let now = Utc.with_ymd_and_hms(2024, 3, 11, 2, 0, 0).unwrap();
        assert!(local_today(now, 15 * 60).is_err());
    }
}
