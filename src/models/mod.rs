// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod engagement;
pub mod event;
pub mod goal;
pub mod profile;
pub mod summary;

pub use engagement::{Achievement, Notification, Reminder};
pub use event::{ActivitySession, HydrationEntry, MealLog, WeightEntry, WorkoutSession};
pub use goal::{Goal, GoalKind};
pub use profile::{AccessState, Credentials, Profile, Units};
pub use summary::{DailySummary, StepBucket};
