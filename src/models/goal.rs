// SPDX-License-Identifier: MIT

//! Goal model. Unlike event rows, goals are mutable (progress only) and
//! deletable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a goal tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalKind {
    Steps,
    Workouts,
    Weight,
    Hydration,
    Calories,
}

/// A user goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    /// Row ID (uuid, also used as document ID)
    pub id: String,
    /// Owning principal
    pub user_id: String,
    pub title: String,
    pub kind: GoalKind,
    /// Numeric target in `unit`
    pub target: f64,
    /// Unit string ("oz", "steps", "lbs", ...)
    pub unit: String,
    /// Progress as a fraction in [0, 1]. Never pre-multiplied by 100;
    /// presentation multiplies for display only.
    pub progress: f64,
    pub created_at: DateTime<Utc>,
}
