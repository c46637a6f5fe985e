// SPDX-License-Identifier: MIT

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Profiles and sign-in credentials
//! - Event rows (workouts, meals, hydration, activity, weight)
//! - Goals (the only mutable/deletable rows)
//! - Reminders, notifications and achievements
//!
//! Event rows are append-only: this wrapper exposes no update or delete
//! for them. A missing document is `None`/empty, never an error.

use chrono::{DateTime, Utc};
use firestore::FirestoreQueryDirection;

use crate::db::collections;
use crate::error::AppError;
use crate::time_utils::format_utc_rfc3339;
use crate::models::{
    Achievement, ActivitySession, Credentials, Goal, HydrationEntry, MealLog, Notification,
    Profile, Reminder, WeightEntry, WorkoutSession,
};

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    /// Upsert one document keyed by `doc_id`, mapping failures to write
    /// rejections.
    async fn put<T>(&self, collection: &'static str, doc_id: &str, object: &T) -> Result<(), AppError>
    where
        T: serde::Serialize + for<'de> serde::Deserialize<'de> + Send + Sync,
    {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collection)
            .document_id(doc_id)
            .object(object)
            .execute()
            .await
            .map_err(|e| AppError::Persistence(e.to_string()))?;
        Ok(())
    }

    /// Fetch one document by ID; missing documents are `None`.
    async fn get_by_id<T>(&self, collection: &'static str, doc_id: &str) -> Result<Option<T>, AppError>
    where
        T: serde::de::DeserializeOwned + Send,
    {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collection)
            .obj()
            .one(doc_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Range-filtered read: all rows for `user_id` with `ts_field` inside
    /// `[start, end]`, ascending.
    ///
    /// Timestamps are stored as whole-second RFC3339 strings with a `Z`
    /// suffix, so lexicographic comparison matches chronological order.
    async fn rows_in_range<T>(
        &self,
        collection: &'static str,
        ts_field: &'static str,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<T>, AppError>
    where
        T: serde::de::DeserializeOwned + Send,
    {
        let uid = user_id.to_string();
        let start = format_utc_rfc3339(start);
        let end = format_utc_rfc3339(end);
        self.get_client()?
            .fluent()
            .select()
            .from(collection)
            .filter(move |q| {
                q.for_all([
                    q.field("user_id").eq(uid.clone()),
                    q.field(ts_field).greater_than_or_equal(start.clone()),
                    q.field(ts_field).less_than_or_equal(end.clone()),
                ])
            })
            .order_by([(ts_field, FirestoreQueryDirection::Ascending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Most recent rows for a user, ordered by `ts_field`.
    async fn recent_rows<T>(
        &self,
        collection: &'static str,
        ts_field: &'static str,
        direction: FirestoreQueryDirection,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<T>, AppError>
    where
        T: serde::de::DeserializeOwned + Send,
    {
        let uid = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collection)
            .filter(move |q| q.for_all([q.field("user_id").eq(uid.clone())]))
            .order_by([(ts_field, direction)])
            .limit(limit)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Profile Operations ──────────────────────────────────────

    /// Get a profile by principal ID.
    pub async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, AppError> {
        self.get_by_id(collections::PROFILES, user_id).await
    }

    /// Create or replace a profile.
    pub async fn upsert_profile(&self, profile: &Profile) -> Result<(), AppError> {
        self.put(collections::PROFILES, &profile.id, profile).await
    }

    // ─── Credential Operations ───────────────────────────────────

    /// Look up sign-in credentials by email.
    pub async fn get_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Credentials>, AppError> {
        let email = email.to_string();
        let matches: Vec<Credentials> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::CREDENTIALS)
            .filter(move |q| q.for_all([q.field("email").eq(email.clone())]))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(matches.into_iter().next())
    }

    /// Store credentials for a principal.
    pub async fn set_credentials(&self, credentials: &Credentials) -> Result<(), AppError> {
        self.put(collections::CREDENTIALS, &credentials.user_id, credentials)
            .await
    }

    // ─── Event Row Operations (append-only) ──────────────────────

    /// Append a workout session row.
    pub async fn add_workout(&self, row: &WorkoutSession) -> Result<(), AppError> {
        self.put(collections::WORKOUT_SESSIONS, &row.id, row).await
    }

    /// Append a meal log row.
    pub async fn add_meal(&self, row: &MealLog) -> Result<(), AppError> {
        self.put(collections::MEAL_LOGS, &row.id, row).await
    }

    /// Append a hydration entry row.
    pub async fn add_hydration(&self, row: &HydrationEntry) -> Result<(), AppError> {
        self.put(collections::HYDRATION_LOGS, &row.id, row).await
    }

    /// Append an activity session row.
    pub async fn add_activity(&self, row: &ActivitySession) -> Result<(), AppError> {
        self.put(collections::ACTIVITY_SESSIONS, &row.id, row).await
    }

    /// Append a weight entry row.
    pub async fn add_weight(&self, row: &WeightEntry) -> Result<(), AppError> {
        self.put(collections::WEIGHT_ENTRIES, &row.id, row).await
    }

    /// Workouts with `started_at` inside `[start, end]`.
    pub async fn workouts_in_range(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<WorkoutSession>, AppError> {
        self.rows_in_range(
            collections::WORKOUT_SESSIONS,
            "started_at",
            user_id,
            start,
            end,
        )
        .await
    }

    /// Meals with `logged_at` inside `[start, end]`.
    pub async fn meals_in_range(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<MealLog>, AppError> {
        self.rows_in_range(collections::MEAL_LOGS, "logged_at", user_id, start, end)
            .await
    }

    /// Hydration entries with `logged_at` inside `[start, end]`.
    pub async fn hydration_in_range(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<HydrationEntry>, AppError> {
        self.rows_in_range(
            collections::HYDRATION_LOGS,
            "logged_at",
            user_id,
            start,
            end,
        )
        .await
    }

    /// Activity sessions with `recorded_at` inside `[start, end]`.
    pub async fn activity_in_range(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ActivitySession>, AppError> {
        self.rows_in_range(
            collections::ACTIVITY_SESSIONS,
            "recorded_at",
            user_id,
            start,
            end,
        )
        .await
    }

    /// Most recent workouts, newest first.
    pub async fn recent_workouts(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<WorkoutSession>, AppError> {
        self.recent_rows(
            collections::WORKOUT_SESSIONS,
            "started_at",
            FirestoreQueryDirection::Descending,
            user_id,
            limit,
        )
        .await
    }

    /// Most recent activity sessions, newest first.
    pub async fn recent_activity(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<ActivitySession>, AppError> {
        self.recent_rows(
            collections::ACTIVITY_SESSIONS,
            "recorded_at",
            FirestoreQueryDirection::Descending,
            user_id,
            limit,
        )
        .await
    }

    /// Most recent meal logs, newest first.
    pub async fn recent_meals(&self, user_id: &str, limit: u32) -> Result<Vec<MealLog>, AppError> {
        self.recent_rows(
            collections::MEAL_LOGS,
            "logged_at",
            FirestoreQueryDirection::Descending,
            user_id,
            limit,
        )
        .await
    }

    /// Most recent hydration entries, newest first.
    pub async fn recent_hydration(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<HydrationEntry>, AppError> {
        self.recent_rows(
            collections::HYDRATION_LOGS,
            "logged_at",
            FirestoreQueryDirection::Descending,
            user_id,
            limit,
        )
        .await
    }

    /// Weight history, oldest first (for charting).
    pub async fn weight_history(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<WeightEntry>, AppError> {
        self.recent_rows(
            collections::WEIGHT_ENTRIES,
            "recorded_on",
            FirestoreQueryDirection::Ascending,
            user_id,
            limit,
        )
        .await
    }

    // ─── Goal Operations ─────────────────────────────────────────

    /// All goals for a user, oldest first.
    pub async fn goals_for_user(&self, user_id: &str) -> Result<Vec<Goal>, AppError> {
        self.recent_rows(
            collections::GOALS,
            "created_at",
            FirestoreQueryDirection::Ascending,
            user_id,
            100,
        )
        .await
    }

    /// Create a goal.
    pub async fn insert_goal(&self, goal: &Goal) -> Result<(), AppError> {
        self.put(collections::GOALS, &goal.id, goal).await
    }

    /// Update a goal's progress fraction. Progress is the only field that
    /// may change after creation.
    pub async fn update_goal_progress(
        &self,
        user_id: &str,
        goal_id: &str,
        progress: f64,
    ) -> Result<Goal, AppError> {
        let mut goal: Goal = self
            .get_by_id(collections::GOALS, goal_id)
            .await?
            .filter(|g: &Goal| g.user_id == user_id)
            .ok_or_else(|| AppError::NotFound(format!("Goal {} not found", goal_id)))?;

        goal.progress = progress;
        self.put(collections::GOALS, goal_id, &goal).await?;
        Ok(goal)
    }

    /// Delete a goal owned by `user_id`.
    pub async fn delete_goal(&self, user_id: &str, goal_id: &str) -> Result<(), AppError> {
        // Ownership check before the delete
        let _: Goal = self
            .get_by_id(collections::GOALS, goal_id)
            .await?
            .filter(|g: &Goal| g.user_id == user_id)
            .ok_or_else(|| AppError::NotFound(format!("Goal {} not found", goal_id)))?;

        self.get_client()?
            .fluent()
            .delete()
            .from(collections::GOALS)
            .document_id(goal_id)
            .execute()
            .await
            .map_err(|e| AppError::Persistence(e.to_string()))?;
        Ok(())
    }

    /// Target of the user's hydration goal, if one exists.
    pub async fn hydration_goal_target(&self, user_id: &str) -> Result<Option<f64>, AppError> {
        let uid = user_id.to_string();
        let goals: Vec<Goal> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::GOALS)
            .filter(move |q| {
                q.for_all([
                    q.field("user_id").eq(uid.clone()),
                    q.field("kind").eq("hydration"),
                ])
            })
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(goals.into_iter().next().map(|g| g.target))
    }

    // ─── Reminders / Notifications / Achievements ────────────────

    /// All reminders, oldest first.
    pub async fn reminders_for_user(&self, user_id: &str) -> Result<Vec<Reminder>, AppError> {
        self.recent_rows(
            collections::REMINDERS,
            "created_at",
            FirestoreQueryDirection::Ascending,
            user_id,
            100,
        )
        .await
    }

    /// Create a reminder.
    pub async fn insert_reminder(&self, reminder: &Reminder) -> Result<(), AppError> {
        self.put(collections::REMINDERS, &reminder.id, reminder)
            .await
    }

    /// Most recent notifications, newest first.
    pub async fn notifications_for_user(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<Notification>, AppError> {
        self.recent_rows(
            collections::NOTIFICATIONS,
            "created_at",
            FirestoreQueryDirection::Descending,
            user_id,
            limit,
        )
        .await
    }

    /// Create a notification.
    pub async fn insert_notification(&self, notification: &Notification) -> Result<(), AppError> {
        self.put(collections::NOTIFICATIONS, &notification.id, notification)
            .await
    }

    /// Achievements, most recently unlocked first.
    pub async fn achievements_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<Achievement>, AppError> {
        self.recent_rows(
            collections::ACHIEVEMENTS,
            "unlocked_at",
            FirestoreQueryDirection::Descending,
            user_id,
            100,
        )
        .await
    }
}
