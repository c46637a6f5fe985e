//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    pub const PROFILES: &str = "profiles";
    pub const CREDENTIALS: &str = "credentials";
    pub const WORKOUT_SESSIONS: &str = "workout_sessions";
    pub const ACTIVITY_SESSIONS: &str = "activity_sessions";
    pub const MEAL_LOGS: &str = "meal_logs";
    pub const HYDRATION_LOGS: &str = "hydration_logs";
    pub const WEIGHT_ENTRIES: &str = "weight_entries";
    pub const GOALS: &str = "goals";
    pub const REMINDERS: &str = "reminders";
    pub const NOTIFICATIONS: &str = "notifications";
    pub const ACHIEVEMENTS: &str = "achievements";
}
