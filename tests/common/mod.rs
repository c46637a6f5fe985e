// SPDX-License-Identifier: MIT

use pulseboard::config::Config;
use pulseboard::db::FirestoreDb;
use pulseboard::routes::create_router;
use pulseboard::services::{live_workout, Aggregator, LiveWorkoutStore, SessionHub, SessionService};
use pulseboard::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Build shared state over the given database.
#[allow(dead_code)]
pub fn test_state(db: FirestoreDb) -> Arc<AppState> {
    let config = Config::test_default();
    let hub = Arc::new(SessionHub::new());
    let live_workouts = Arc::new(LiveWorkoutStore::new());
    live_workout::register_signout_teardown(&hub, Arc::clone(&live_workouts));

    let sessions = SessionService::new(
        db.clone(),
        hub,
        config.jwt_signing_key.clone(),
        config.bcrypt_cost,
    );
    let aggregator = Aggregator::new(db.clone());

    Arc::new(AppState {
        config,
        db,
        sessions,
        aggregator,
        live_workouts,
    })
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let state = test_state(test_db_offline());
    (create_router(state.clone()), state)
}

/// Create a test app backed by the Firestore emulator.
#[allow(dead_code)]
pub async fn create_emulator_app() -> (axum::Router, Arc<AppState>) {
    let state = test_state(test_db().await);
    (create_router(state.clone()), state)
}
