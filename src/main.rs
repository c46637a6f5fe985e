// SPDX-License-Identifier: MIT

//! Pulseboard API Server
//!
//! Personal fitness dashboard backend: sessions, activity and nutrition
//! logs, daily aggregation and live workout tracking.

use pulseboard::{
    config::Config,
    db::FirestoreDb,
    services::{live_workout, Aggregator, LiveWorkoutStore, SessionHub, SessionService},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Pulseboard API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    // Session hub pushes auth changes; the live workout registry listens
    // so sign-out tears down any running session.
    let hub = Arc::new(SessionHub::new());
    let live_workouts = Arc::new(LiveWorkoutStore::new());
    let _teardown =
        live_workout::register_signout_teardown(&hub, Arc::clone(&live_workouts));

    let sessions = SessionService::new(
        db.clone(),
        Arc::clone(&hub),
        config.jwt_signing_key.clone(),
        config.bcrypt_cost,
    );
    let aggregator = Aggregator::new(db.clone());

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        sessions,
        aggregator,
        live_workouts,
    });

    // Build router
    let app = pulseboard::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pulseboard=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
