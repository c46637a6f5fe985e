// SPDX-License-Identifier: MIT

//! Event row models.
//!
//! Each row is an immutable, append-only fact owned by one principal.
//! Rows are never updated or deleted after creation (goals, which are
//! mutable, live in `goal.rs`).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A logged workout session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutSession {
    /// Row ID (uuid, also used as document ID)
    pub id: String,
    /// Owning principal
    pub user_id: String,
    /// Workout name/title
    pub name: String,
    /// Workout type (Strength, Cardio, Mobility, ...)
    pub workout_type: String,
    /// Intensity label (Low, Moderate, High)
    pub intensity: String,
    /// Duration in minutes
    pub duration_minutes: u32,
    /// Calories burned
    pub calories: f64,
    /// When the workout started
    pub started_at: DateTime<Utc>,
}

/// A logged meal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealLog {
    pub id: String,
    pub user_id: String,
    /// Meal label ("Breakfast bowl", ...)
    pub label: String,
    pub calories: f64,
    /// Protein in grams
    pub protein: f64,
    /// Carbohydrates in grams
    pub carbs: f64,
    /// Fats in grams
    pub fats: f64,
    pub logged_at: DateTime<Utc>,
}

/// A hydration entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HydrationEntry {
    pub id: String,
    pub user_id: String,
    pub label: String,
    /// Amount in fluid ounces
    pub amount_oz: f64,
    pub logged_at: DateTime<Utc>,
}

/// A recorded outdoor/indoor activity session (walk, run, ride).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivitySession {
    pub id: String,
    pub user_id: String,
    pub title: String,
    /// Distance in kilometers (None for stationary activity)
    pub distance_km: Option<f64>,
    pub duration_minutes: u32,
    /// Pace label ("5:30/km")
    pub pace: Option<String>,
    /// Route quality label ("Scenic", "Simulated", ...)
    pub route_quality: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

/// A body-weight entry, one per calendar date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightEntry {
    pub id: String,
    pub user_id: String,
    pub weight: f64,
    pub recorded_on: NaiveDate,
}
