//! Reminder, notification and achievement models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recurring reminder ("Drink water", "Every 2 hours").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    pub id: String,
    pub user_id: String,
    pub title: String,
    /// Free-form schedule label
    pub schedule: String,
    pub created_at: DateTime<Utc>,
}

/// An in-app notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub message: String,
    /// "new" on creation; the client marks it read
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// An unlocked (or pending) achievement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub user_id: String,
    pub label: String,
    pub status: String,
    pub unlocked_at: DateTime<Utc>,
}
