// SPDX-License-Identifier: MIT

//! Pulseboard: backend API for a personal fitness dashboard
//!
//! This crate provides session and profile management, append-only
//! workout/nutrition/hydration logs, daily and weekly aggregation, and
//! live workout sessions with a 1-second ticker.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use std::sync::Arc;

use config::Config;
use db::FirestoreDb;
use services::{Aggregator, LiveWorkoutStore, SessionService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub sessions: SessionService,
    pub aggregator: Aggregator,
    pub live_workouts: Arc<LiveWorkoutStore>,
}
