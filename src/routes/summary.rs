// SPDX-License-Identifier: MIT

//! Dashboard summary routes.

use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::models::summary::{DailySummary, StepBucket};
use crate::AppState;
use axum::{
    extract::{Extension, Query, State},
    routing::get,
    Json, Router,
};
use chrono::{FixedOffset, NaiveDate, Utc};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    /// Calendar date (YYYY-MM-DD); defaults to today in the client's zone
    pub date: Option<NaiveDate>,
    /// Client UTC offset in minutes, east positive. Defaults to UTC.
    #[serde(default)]
    pub tz_offset_minutes: i32,
}

/// Resolve the client's UTC offset, rejecting out-of-range values.
pub(crate) fn client_offset(tz_offset_minutes: i32) -> Result<FixedOffset, AppError> {
    if tz_offset_minutes.abs() > 14 * 60 {
        return Err(AppError::BadRequest(
            "tz_offset_minutes out of range".to_string(),
        ));
    }
    FixedOffset::east_opt(tz_offset_minutes * 60)
        .ok_or_else(|| AppError::BadRequest("tz_offset_minutes out of range".to_string()))
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/summary/daily", get(daily))
        .route("/api/summary/weekly-steps", get(weekly_steps))
}

async fn daily(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<DailySummary>, AppError> {
    let tz = client_offset(query.tz_offset_minutes)?;
    let date = query
        .date
        .unwrap_or_else(|| Utc::now().with_timezone(&tz).date_naive());

    let summary = state.aggregator.daily_summary(&user.user_id, date, tz).await?;
    Ok(Json(summary))
}

async fn weekly_steps(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<Vec<StepBucket>>, AppError> {
    let tz = client_offset(query.tz_offset_minutes)?;
    let end = query
        .date
        .unwrap_or_else(|| Utc::now().with_timezone(&tz).date_naive());

    let buckets = state.aggregator.weekly_steps(&user.user_id, end, tz).await?;
    Ok(Json(buckets))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_offset_bounds() {
        assert!(client_offset(0).is_ok());
        assert!(client_offset(-8 * 60).is_ok());
        assert!(client_offset(14 * 60).is_ok());
        assert!(client_offset(15 * 60).is_err());
        assert!(client_offset(-15 * 60).is_err());
    }
}
