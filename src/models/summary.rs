// SPDX-License-Identifier: MIT

//! Derived summary models.
//!
//! Nothing here is persisted. Summaries are pure functions of the event
//! rows (plus the hydration goal target) fetched for the window, so they
//! are recomputed on every request and unit-testable without a backend.

use chrono::{Duration, FixedOffset, NaiveDate};
use serde::Serialize;

use crate::models::event::{ActivitySession, HydrationEntry, MealLog, WorkoutSession};
use crate::time_utils::local_date;

/// Fixed daily calorie intake target.
pub const CALORIE_TARGET: f64 = 2200.0;
/// Default hydration target (oz) when the user has no hydration goal.
pub const DEFAULT_HYDRATION_TARGET_OZ: f64 = 90.0;
/// Synthesized step count per kilometer of recorded distance.
pub const STEPS_PER_KM: f64 = 1312.0;

/// Fixed macro targets in grams: (label, target).
const MACRO_TARGETS: [(&str, f64); 3] = [("Protein", 130.0), ("Carbs", 260.0), ("Fats", 70.0)];

/// Progress toward one tracked nutritional dimension.
#[derive(Debug, Clone, Serialize)]
pub struct MacroProgress {
    pub label: String,
    /// Grams consumed today (unrounded sum)
    pub value: f64,
    /// Fixed daily target in grams
    pub target: f64,
    pub unit: String,
    /// Fraction in [0, 1]
    pub progress: f64,
}

/// Hydration consumed vs. target for the day.
#[derive(Debug, Clone, Serialize)]
pub struct HydrationSummary {
    pub consumed_oz: f64,
    pub target_oz: f64,
    /// Fraction in [0, 1]
    pub progress: f64,
}

/// One day's derived metrics.
#[derive(Debug, Clone, Serialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    /// Steps synthesized from recorded activity distance
    pub steps: u64,
    /// Calories consumed (meal sum)
    pub calories: f64,
    pub target_calories: f64,
    /// Minutes of logged workouts
    pub active_minutes: u32,
    /// Calories burned in workouts
    pub energy_burned: f64,
    pub hydration: HydrationSummary,
    pub macros: Vec<MacroProgress>,
}

/// One day-slot in the 7-day step aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepBucket {
    pub date: NaiveDate,
    /// Short weekday label ("Mon")
    pub day: String,
    pub steps: u64,
}

/// Steps for a single recorded distance, rounded to the nearest integer.
/// Rounding happens per row, before summing.
fn steps_for_distance(distance_km: f64) -> u64 {
    (distance_km.max(0.0) * STEPS_PER_KM).round() as u64
}

fn fraction(value: f64, target: f64) -> f64 {
    if target <= 0.0 {
        return 0.0;
    }
    (value / target).clamp(0.0, 1.0)
}

/// Reduce one day's event rows to a `DailySummary`.
///
/// The caller is responsible for fetching rows scoped to the day; this
/// function only sums what it is given.
pub fn build_daily_summary(
    date: NaiveDate,
    workouts: &[WorkoutSession],
    meals: &[MealLog],
    hydration: &[HydrationEntry],
    activity: &[ActivitySession],
    hydration_target: Option<f64>,
) -> DailySummary {
    let energy_burned: f64 = workouts.iter().map(|w| w.calories).sum();
    let active_minutes: u32 = workouts.iter().map(|w| w.duration_minutes).sum();
    let calories: f64 = meals.iter().map(|m| m.calories).sum();

    let macros = MACRO_TARGETS
        .iter()
        .map(|(label, target)| {
            let value: f64 = meals
                .iter()
                .map(|m| match *label {
                    "Protein" => m.protein,
                    "Carbs" => m.carbs,
                    _ => m.fats,
                })
                .sum();
            MacroProgress {
                label: (*label).to_string(),
                value,
                target: *target,
                unit: "g".to_string(),
                progress: fraction(value, *target),
            }
        })
        .collect();

    let consumed_oz: f64 = hydration.iter().map(|h| h.amount_oz).sum();
    let target_oz = hydration_target.unwrap_or(DEFAULT_HYDRATION_TARGET_OZ);

    let steps: u64 = activity
        .iter()
        .filter_map(|a| a.distance_km)
        .map(steps_for_distance)
        .sum();

    DailySummary {
        date,
        steps,
        calories,
        target_calories: CALORIE_TARGET,
        active_minutes,
        energy_burned,
        hydration: HydrationSummary {
            consumed_oz,
            target_oz,
            progress: fraction(consumed_oz, target_oz),
        },
        macros,
    }
}

/// Fold activity sessions into exactly 7 calendar-day buckets ending at
/// `end` (inclusive), ascending by date.
///
/// Every day is pre-seeded with zero, rows are assigned by local calendar
/// date in `tz`, and rows outside the window are ignored.
pub fn build_weekly_steps(
    end: NaiveDate,
    sessions: &[ActivitySession],
    tz: FixedOffset,
) -> Vec<StepBucket> {
    let start = end - Duration::days(6);

    let mut buckets: Vec<StepBucket> = (0..7)
        .map(|i| {
            let date = start + Duration::days(i);
            StepBucket {
                date,
                day: date.format("%a").to_string(),
                steps: 0,
            }
        })
        .collect();

    for session in sessions {
        let Some(distance) = session.distance_km else {
            continue;
        };
        let day = local_date(session.recorded_at, tz);
        if day < start || day > end {
            continue;
        }
        let idx = (day - start).num_days() as usize;
        buckets[idx].steps += steps_for_distance(distance);
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn utc_tz() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn activity(distance_km: Option<f64>, recorded_at: &str) -> ActivitySession {
        ActivitySession {
            id: "a-1".to_string(),
            user_id: "u-1".to_string(),
            title: "Morning walk".to_string(),
            distance_km,
            duration_minutes: 30,
            pace: None,
            route_quality: None,
            recorded_at: recorded_at.parse().unwrap(),
        }
    }

    fn meal(calories: f64, protein: f64, carbs: f64, fats: f64) -> MealLog {
        MealLog {
            id: "m-1".to_string(),
            user_id: "u-1".to_string(),
            label: "Meal".to_string(),
            calories,
            protein,
            carbs,
            fats,
            logged_at: Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap(),
        }
    }

    fn workout(duration_minutes: u32, calories: f64) -> WorkoutSession {
        WorkoutSession {
            id: "w-1".to_string(),
            user_id: "u-1".to_string(),
            name: "Intervals".to_string(),
            workout_type: "Cardio".to_string(),
            intensity: "High".to_string(),
            duration_minutes,
            calories,
            started_at: Utc.with_ymd_and_hms(2024, 3, 10, 7, 0, 0).unwrap(),
        }
    }

    fn hydration_entry(amount_oz: f64) -> HydrationEntry {
        HydrationEntry {
            id: "h-1".to_string(),
            user_id: "u-1".to_string(),
            label: "Quick add".to_string(),
            amount_oz,
            logged_at: Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_weekly_steps_always_seven_ascending_buckets() {
        let end = date(2024, 3, 10);
        let buckets = build_weekly_steps(end, &[], utc_tz());

        assert_eq!(buckets.len(), 7);
        assert_eq!(buckets[0].date, date(2024, 3, 4));
        assert_eq!(buckets[6].date, end);
        for pair in buckets.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
    }

    #[test]
    fn test_weekly_steps_empty_window_is_all_zero() {
        let buckets = build_weekly_steps(date(2024, 3, 10), &[], utc_tz());
        assert!(buckets.iter().all(|b| b.steps == 0));
    }

    #[test]
    fn test_weekly_steps_rounds_per_row_before_summing() {
        let rows = vec![
            activity(Some(5.0), "2024-03-10T08:00:00Z"),
            activity(Some(1.0), "2024-03-10T18:00:00Z"),
        ];
        let buckets = build_weekly_steps(date(2024, 3, 10), &rows, utc_tz());

        // round(5.0 * 1312) + round(1.0 * 1312) = 6560 + 1312
        assert_eq!(buckets[6].steps, 7872);
    }

    #[test]
    fn test_weekly_steps_buckets_by_local_calendar_date() {
        // 02:00 UTC on Mar 10 is Mar 9 at UTC-8
        let tz = FixedOffset::west_opt(8 * 3600).unwrap();
        let rows = vec![activity(Some(1.0), "2024-03-10T02:00:00Z")];
        let buckets = build_weekly_steps(date(2024, 3, 10), &rows, tz);

        assert_eq!(buckets[5].date, date(2024, 3, 9));
        assert_eq!(buckets[5].steps, 1312);
        assert_eq!(buckets[6].steps, 0);
    }

    #[test]
    fn test_weekly_steps_ignores_rows_outside_window() {
        let rows = vec![activity(Some(3.0), "2024-02-01T08:00:00Z")];
        let buckets = build_weekly_steps(date(2024, 3, 10), &rows, utc_tz());
        assert!(buckets.iter().all(|b| b.steps == 0));
    }

    #[test]
    fn test_weekly_steps_bucket_order_independent_of_row_order() {
        let rows_fwd = vec![
            activity(Some(2.0), "2024-03-08T08:00:00Z"),
            activity(Some(1.0), "2024-03-10T08:00:00Z"),
        ];
        let rows_rev: Vec<_> = rows_fwd.iter().rev().cloned().collect();

        let a = build_weekly_steps(date(2024, 3, 10), &rows_fwd, utc_tz());
        let b = build_weekly_steps(date(2024, 3, 10), &rows_rev, utc_tz());
        assert_eq!(a, b);
    }

    #[test]
    fn test_daily_summary_sums_and_fractions() {
        let summary = build_daily_summary(
            date(2024, 3, 10),
            &[workout(30, 250.0), workout(20, 150.0)],
            &[meal(600.0, 40.0, 80.0, 20.0), meal(500.0, 25.0, 50.0, 15.0)],
            &[hydration_entry(16.0), hydration_entry(8.0)],
            &[activity(Some(2.0), "2024-03-10T08:00:00Z")],
            Some(80.0),
        );

        assert_eq!(summary.active_minutes, 50);
        assert_eq!(summary.energy_burned, 400.0);
        assert_eq!(summary.calories, 1100.0);
        assert_eq!(summary.steps, 2624);
        assert_eq!(summary.hydration.consumed_oz, 24.0);
        assert_eq!(summary.hydration.target_oz, 80.0);
        assert!((summary.hydration.progress - 0.3).abs() < 1e-9);

        let protein = &summary.macros[0];
        assert_eq!(protein.label, "Protein");
        assert_eq!(protein.value, 65.0);
        assert_eq!(protein.target, 130.0);
        assert!((protein.progress - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_daily_summary_empty_day() {
        let summary = build_daily_summary(date(2024, 3, 10), &[], &[], &[], &[], None);

        assert_eq!(summary.steps, 0);
        assert_eq!(summary.calories, 0.0);
        assert_eq!(summary.active_minutes, 0);
        assert_eq!(summary.hydration.target_oz, DEFAULT_HYDRATION_TARGET_OZ);
        assert_eq!(summary.hydration.progress, 0.0);
        assert_eq!(summary.macros.len(), 3);
    }

    #[test]
    fn test_daily_summary_progress_caps_at_one() {
        let summary = build_daily_summary(
            date(2024, 3, 10),
            &[],
            &[meal(100.0, 500.0, 0.0, 0.0)],
            &[hydration_entry(200.0)],
            &[],
            Some(90.0),
        );

        assert_eq!(summary.macros[0].progress, 1.0);
        assert_eq!(summary.hydration.progress, 1.0);
        // Raw sums stay unclamped
        assert_eq!(summary.macros[0].value, 500.0);
        assert_eq!(summary.hydration.consumed_oz, 200.0);
    }

    #[test]
    fn test_daily_summary_is_idempotent_for_unchanged_rows() {
        let workouts = [workout(30, 250.0)];
        let meals = [meal(600.0, 40.0, 80.0, 20.0)];
        let water = [hydration_entry(16.0)];
        let moves = [activity(Some(1.5), "2024-03-10T08:00:00Z")];

        let a = build_daily_summary(date(2024, 3, 10), &workouts, &meals, &water, &moves, Some(90.0));
        let b = build_daily_summary(date(2024, 3, 10), &workouts, &meals, &water, &moves, Some(90.0));

        assert_eq!(serde_json::to_value(&a).unwrap(), serde_json::to_value(&b).unwrap());
    }
}
