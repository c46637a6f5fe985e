// SPDX-License-Identifier: MIT

//! Live workout sessions.
//!
//! Process-wide registry of at most one live session per principal. A
//! 1-second ticker advances elapsed time and resamples a synthetic heart
//! rate; stopping (or sign-out) aborts the ticker deterministically, so no
//! tick fires after cancellation. Completion is persisted as a workout
//! session row plus a synthesized activity session row.

use std::sync::Arc;

use dashmap::DashMap;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::db::FirestoreDb;
use crate::error::Result;
use crate::models::{ActivitySession, WorkoutSession};
use crate::services::session::{AuthEvent, SessionHub, SubscriptionId};
use crate::time_utils::now_secs;

/// Resting baseline for the synthetic heart rate.
const HEART_RATE_BASE: u32 = 90;
/// Maximum jitter above baseline; the synthetic range is [90, 120].
const HEART_RATE_JITTER: u32 = 30;
/// Estimated calorie burn per minute when the template has no figure.
const CALORIES_PER_MINUTE: f64 = 7.0;
/// Simulated cardio distance per minute, in kilometers.
const CARDIO_KM_PER_MINUTE: f64 = 0.15;

/// Workout template a live session is started from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutTemplate {
    pub name: String,
    #[serde(rename = "type")]
    pub workout_type: String,
    pub intensity: String,
    /// Calories for the full workout; estimated from duration when absent
    pub calories: Option<f64>,
}

/// Snapshot of a live session.
#[derive(Debug, Clone, Serialize)]
pub struct LiveSession {
    pub template: WorkoutTemplate,
    pub elapsed_seconds: u64,
    pub heart_rate: u32,
}

/// A finished live session, ready to persist. The synthetic heart rate
/// is display-only and dies with the live session.
#[derive(Debug, Clone)]
pub struct CompletedWorkout {
    pub template: WorkoutTemplate,
    pub elapsed_seconds: u64,
}

impl CompletedWorkout {
    /// Elapsed time in minutes, rounded, never below one.
    pub fn duration_minutes(&self) -> u32 {
        ((self.elapsed_seconds as f64 / 60.0).round() as u32).max(1)
    }

    /// Template calories, or the per-minute estimate.
    pub fn calories(&self) -> f64 {
        self.template
            .calories
            .unwrap_or_else(|| (f64::from(self.duration_minutes()) * CALORIES_PER_MINUTE).round())
    }

    fn is_cardio(&self) -> bool {
        self.template.workout_type == "Cardio"
    }
}

struct Entry {
    session: LiveSession,
    ticker: Option<JoinHandle<()>>,
}

/// Registry of live sessions keyed by principal.
#[derive(Default)]
pub struct LiveWorkoutStore {
    sessions: DashMap<String, Entry>,
}

impl LiveWorkoutStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a live session from a template. Replaces (and cancels the
    /// ticker of) any session already live for this principal, so at most
    /// one runs at a time.
    pub fn start(&self, user_id: &str, template: WorkoutTemplate) -> LiveSession {
        let session = LiveSession {
            template,
            elapsed_seconds: 0,
            heart_rate: HEART_RATE_BASE,
        };

        if let Some(previous) = self.sessions.insert(
            user_id.to_string(),
            Entry {
                session: session.clone(),
                ticker: None,
            },
        ) {
            if let Some(ticker) = previous.ticker {
                ticker.abort();
            }
        }

        tracing::info!(user_id = %user_id, "Live workout started");
        session
    }

    /// Spawn the 1-second ticker for a principal's live session. The task
    /// exits on its own once the session is gone.
    pub fn spawn_ticker(self: &Arc<Self>, user_id: &str) {
        let store = Arc::clone(self);
        let uid = user_id.to_string();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(std::time::Duration::from_secs(1));
            // The first interval tick completes immediately; consume it so
            // elapsed time starts advancing one second from now.
            interval.tick().await;
            loop {
                interval.tick().await;
                if store.tick(&uid).is_none() {
                    break;
                }
            }
        });

        if let Some(mut entry) = self.sessions.get_mut(user_id) {
            if let Some(old) = entry.ticker.replace(handle) {
                old.abort();
            }
        } else {
            // Session stopped between start and spawn
            handle.abort();
        }
    }

    /// Advance the live session by one second and resample the synthetic
    /// heart rate. No-op (returns None) if nothing is live.
    pub fn tick(&self, user_id: &str) -> Option<LiveSession> {
        let mut entry = self.sessions.get_mut(user_id)?;
        entry.session.elapsed_seconds += 1;
        entry.session.heart_rate =
            HEART_RATE_BASE + rand::thread_rng().gen_range(0..=HEART_RATE_JITTER);
        Some(entry.session.clone())
    }

    /// Current live session, if any.
    pub fn status(&self, user_id: &str) -> Option<LiveSession> {
        self.sessions.get(user_id).map(|e| e.session.clone())
    }

    /// Stop the live session: cancel the ticker, clear the registry entry
    /// and hand back the completed workout for persistence.
    pub fn stop(&self, user_id: &str) -> Option<CompletedWorkout> {
        let (_, entry) = self.sessions.remove(user_id)?;
        if let Some(ticker) = entry.ticker {
            ticker.abort();
        }

        tracing::info!(
            user_id = %user_id,
            elapsed_seconds = entry.session.elapsed_seconds,
            "Live workout stopped"
        );

        Some(CompletedWorkout {
            template: entry.session.template,
            elapsed_seconds: entry.session.elapsed_seconds,
        })
    }

    /// Drop a live session without persisting anything (sign-out teardown).
    pub fn discard(&self, user_id: &str) {
        if let Some((_, entry)) = self.sessions.remove(user_id) {
            if let Some(ticker) = entry.ticker {
                ticker.abort();
            }
            tracing::debug!(user_id = %user_id, "Live workout discarded");
        }
    }
}

/// Subscribe the registry to auth changes so a principal's live session is
/// dropped the moment they sign out.
pub fn register_signout_teardown(
    hub: &SessionHub,
    store: Arc<LiveWorkoutStore>,
) -> SubscriptionId {
    hub.subscribe(move |event| {
        if let AuthEvent::SignedOut { user_id } = event {
            store.discard(user_id);
        }
    })
}

/// Persist a completed live workout: one workout session row plus a
/// synthesized activity session row.
pub async fn record_completion(
    db: &FirestoreDb,
    user_id: &str,
    completed: &CompletedWorkout,
) -> Result<()> {
    let duration_minutes = completed.duration_minutes();
    let now = now_secs();

    db.add_workout(&WorkoutSession {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        name: completed.template.name.clone(),
        workout_type: completed.template.workout_type.clone(),
        intensity: completed.template.intensity.clone(),
        duration_minutes,
        calories: completed.calories(),
        started_at: now,
    })
    .await?;

    let cardio = completed.is_cardio();
    db.add_activity(&ActivitySession {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        title: completed.template.name.clone(),
        distance_km: cardio.then(|| f64::from(duration_minutes) * CARDIO_KM_PER_MINUTE),
        duration_minutes,
        pace: cardio.then(|| "5:30/km".to_string()),
        route_quality: Some("Simulated".to_string()),
        recorded_at: now,
    })
    .await?;

    Ok(())
}
