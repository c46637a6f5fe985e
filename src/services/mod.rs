// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod aggregator;
pub mod live_workout;
pub mod session;

pub use aggregator::Aggregator;
pub use live_workout::{CompletedWorkout, LiveWorkoutStore, WorkoutTemplate};
pub use session::{AuthEvent, Session, SessionHub, SessionService, SubscriptionId};
