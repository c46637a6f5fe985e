//! Profile and credential models for storage and API.

use serde::{Deserialize, Serialize};

/// Unit preference for a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    Imperial,
    Metric,
}

/// User profile stored in Firestore.
///
/// A profile exists if and only if the principal completed registration.
/// `onboarding_complete` transitions false to true exactly once and never
/// reverts; nothing in this codebase writes `false` over `true`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Principal ID (also used as document ID)
    pub id: String,
    /// Email address (denormalized from credentials for display)
    pub email: String,
    /// Display name
    pub full_name: String,
    /// Avatar image URL
    pub avatar_url: Option<String>,
    /// Unit preference, set during onboarding
    pub units: Option<Units>,
    /// Single "preferred focus" tag, set during onboarding
    pub preferred_focus: Option<String>,
    /// Whether a wearable is connected
    #[serde(default)]
    pub wearable_connected: bool,
    /// Whether onboarding has been completed
    #[serde(default)]
    pub onboarding_complete: bool,
    /// When the profile was created (ISO 8601)
    pub created_at: String,
}

/// Sign-in credentials stored separately from the profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Principal ID (also used as document ID)
    pub user_id: String,
    /// Email used for sign-in lookup
    pub email: String,
    /// bcrypt hash of the password
    pub password_hash: String,
    /// When the credentials were created (ISO 8601)
    pub created_at: String,
}

/// Where a principal may be routed, derived from session + profile state.
///
/// `Anonymous -> OnboardingPending -> Ready`, with no path back from
/// `Ready` to `OnboardingPending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessState {
    /// No session, or a session with no profile row: sign-in/registration only.
    Anonymous,
    /// Session and profile exist but onboarding is incomplete.
    OnboardingPending,
    /// Fully onboarded; all protected views reachable.
    Ready,
}

/// Classify a principal's access from the latest known auth state.
pub fn access_state(authenticated: bool, profile: Option<&Profile>) -> AccessState {
    if !authenticated {
        return AccessState::Anonymous;
    }
    match profile {
        None => AccessState::Anonymous,
        Some(p) if !p.onboarding_complete => AccessState::OnboardingPending,
        Some(_) => AccessState::Ready,
    }
}
