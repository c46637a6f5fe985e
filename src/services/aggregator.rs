// SPDX-License-Identifier: MIT

//! Daily aggregation service.
//!
//! Fetches the raw event rows for a window and reduces them with the pure
//! functions in `models::summary`. Nothing computed here is persisted or
//! cached; every call recomputes from fresh rows.

use std::future::Future;

use chrono::{Duration, FixedOffset, NaiveDate};

use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::models::summary::{build_daily_summary, build_weekly_steps};
use crate::models::{
    ActivitySession, DailySummary, HydrationEntry, MealLog, StepBucket, WorkoutSession,
};
use crate::time_utils::{end_of_day, start_of_day};

type DayRows = (
    Vec<WorkoutSession>,
    Vec<MealLog>,
    Vec<HydrationEntry>,
    Vec<ActivitySession>,
    Option<f64>,
);

/// Fan-in for the five concurrent reads backing one day's summary.
/// The first failure wins and is wrapped as an aggregation error; no
/// partial tuple ever escapes, even when the other four reads succeed.
async fn join_day_rows<W, M, H, A, G>(
    workouts: W,
    meals: M,
    hydration: H,
    activity: A,
    hydration_target: G,
) -> Result<DayRows>
where
    W: Future<Output = Result<Vec<WorkoutSession>>>,
    M: Future<Output = Result<Vec<MealLog>>>,
    H: Future<Output = Result<Vec<HydrationEntry>>>,
    A: Future<Output = Result<Vec<ActivitySession>>>,
    G: Future<Output = Result<Option<f64>>>,
{
    tokio::try_join!(workouts, meals, hydration, activity, hydration_target)
        .map_err(AppError::aggregation)
}

/// Computes derived summaries for one principal at a time.
#[derive(Clone)]
pub struct Aggregator {
    db: FirestoreDb,
}

impl Aggregator {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// One day's summary for a principal.
    ///
    /// Issues the four range-filtered reads plus the hydration goal lookup
    /// concurrently; the summary is built only once all five resolve. If
    /// any read fails, the whole call fails with an aggregation error
    /// wrapping the first error observed. No partial summary is returned.
    pub async fn daily_summary(
        &self,
        user_id: &str,
        date: NaiveDate,
        tz: FixedOffset,
    ) -> Result<DailySummary> {
        let start = start_of_day(date, tz);
        let end = end_of_day(date, tz);

        let (workouts, meals, hydration, activity, hydration_target) = join_day_rows(
            self.db.workouts_in_range(user_id, start, end),
            self.db.meals_in_range(user_id, start, end),
            self.db.hydration_in_range(user_id, start, end),
            self.db.activity_in_range(user_id, start, end),
            self.db.hydration_goal_target(user_id),
        )
        .await?;

        tracing::debug!(
            user_id = %user_id,
            date = %date,
            workouts = workouts.len(),
            meals = meals.len(),
            hydration = hydration.len(),
            activity = activity.len(),
            "Daily summary rows fetched"
        );

        Ok(build_daily_summary(
            date,
            &workouts,
            &meals,
            &hydration,
            &activity,
            hydration_target,
        ))
    }

    /// Seven calendar-day step buckets ending at `end_date` (inclusive),
    /// ascending.
    pub async fn weekly_steps(
        &self,
        user_id: &str,
        end_date: NaiveDate,
        tz: FixedOffset,
    ) -> Result<Vec<StepBucket>> {
        let window_start = start_of_day(end_date - Duration::days(6), tz);
        let window_end = end_of_day(end_date, tz);

        let sessions = self
            .db
            .activity_in_range(user_id, window_start, window_end)
            .await?;

        Ok(build_weekly_steps(end_date, &sessions, tz))
    }
}
