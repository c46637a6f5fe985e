// SPDX-License-Identifier: MIT

//! Session and profile management.
//!
//! `SessionHub` owns the latest known auth state per principal and pushes
//! sign-in/sign-out events to registered observers (no polling).
//! `SessionService` performs the credential exchange, profile hydration,
//! onboarding transition and partial profile updates.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::middleware::auth::create_jwt;
use crate::models::profile::Units;
use crate::models::{Credentials, Profile};
use crate::time_utils::format_utc_rfc3339;

/// Session token lifetime.
const SESSION_TTL_DAYS: i64 = 30;

/// An authenticated session for one principal.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: String,
    /// Opaque credential handed to the client (JWT)
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Auth state change pushed to subscribers.
#[derive(Debug, Clone)]
pub enum AuthEvent {
    SignedIn { session: Session },
    SignedOut { user_id: String },
}

/// Handle returned by [`SessionHub::subscribe`]; pass back to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn Fn(&AuthEvent) + Send + Sync>;

/// Process-wide auth state with explicit init and teardown.
///
/// Sessions are tracked on sign-in, cleared unconditionally on sign-out,
/// and every change is pushed to subscribers registered through
/// [`subscribe`](Self::subscribe). Subscribers must unsubscribe explicitly;
/// there are no ambient listeners.
#[derive(Default)]
pub struct SessionHub {
    sessions: DashMap<String, Session>,
    subscribers: DashMap<u64, Subscriber>,
    next_subscriber_id: AtomicU64,
}

impl SessionHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest known session for a principal, if signed in.
    pub fn current_session(&self, user_id: &str) -> Option<Session> {
        self.sessions
            .get(user_id)
            .filter(|s| s.expires_at > Utc::now())
            .map(|s| s.clone())
    }

    /// Register an observer for auth state changes.
    pub fn subscribe<F>(&self, f: F) -> SubscriptionId
    where
        F: Fn(&AuthEvent) + Send + Sync + 'static,
    {
        let id = self.next_subscriber_id.fetch_add(1, Ordering::Relaxed);
        self.subscribers.insert(id, Box::new(f));
        SubscriptionId(id)
    }

    /// Remove an observer. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.remove(&id.0).is_some()
    }

    /// Track a fresh session and notify subscribers.
    pub fn track(&self, session: Session) {
        self.sessions
            .insert(session.user_id.clone(), session.clone());
        self.publish(&AuthEvent::SignedIn { session });
    }

    /// Clear a principal's session unconditionally and notify subscribers.
    /// Safe to call when no session is tracked.
    pub fn clear(&self, user_id: &str) {
        self.sessions.remove(user_id);
        self.publish(&AuthEvent::SignedOut {
            user_id: user_id.to_string(),
        });
    }

    fn publish(&self, event: &AuthEvent) {
        for subscriber in self.subscribers.iter() {
            subscriber.value()(event);
        }
    }
}

/// Fields a client may change on its profile. `onboarding_complete` is
/// deliberately absent: it only ever transitions through
/// [`SessionService::complete_onboarding`] and never reverts.
#[derive(Debug, Default, Clone, serde::Deserialize)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub units: Option<Units>,
    pub preferred_focus: Option<String>,
    pub wearable_connected: Option<bool>,
}

/// Onboarding preferences collected once per principal.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct OnboardingUpdate {
    pub preferred_focus: String,
    pub units: Units,
    #[serde(default)]
    pub wearable_connected: bool,
}

/// Credential exchange and profile lifecycle.
#[derive(Clone)]
pub struct SessionService {
    db: FirestoreDb,
    hub: Arc<SessionHub>,
    jwt_signing_key: Vec<u8>,
    bcrypt_cost: u32,
}

impl SessionService {
    pub fn new(
        db: FirestoreDb,
        hub: Arc<SessionHub>,
        jwt_signing_key: Vec<u8>,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            db,
            hub,
            jwt_signing_key,
            bcrypt_cost,
        }
    }

    pub fn hub(&self) -> &Arc<SessionHub> {
        &self.hub
    }

    fn mint_session(&self, user_id: &str) -> Result<Session> {
        let token = create_jwt(user_id, &self.jwt_signing_key)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;
        Ok(Session {
            user_id: user_id.to_string(),
            token,
            expires_at: Utc::now() + Duration::days(SESSION_TTL_DAYS),
        })
    }

    /// Register a new principal: credentials plus a profile row with
    /// `onboarding_complete = false`, then a hydrated session.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<(Session, Profile)> {
        if self.db.get_credentials_by_email(email).await?.is_some() {
            return Err(AppError::BadRequest(
                "An account with this email already exists".to_string(),
            ));
        }

        let password_hash = bcrypt::hash(password, self.bcrypt_cost)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))?;

        let user_id = Uuid::new_v4().to_string();
        let now = format_utc_rfc3339(Utc::now());

        self.db
            .set_credentials(&Credentials {
                user_id: user_id.clone(),
                email: email.to_string(),
                password_hash,
                created_at: now.clone(),
            })
            .await?;

        let profile = Profile {
            id: user_id.clone(),
            email: email.to_string(),
            full_name: name.to_string(),
            avatar_url: None,
            units: None,
            preferred_focus: None,
            wearable_connected: false,
            onboarding_complete: false,
            created_at: now,
        };
        self.db.upsert_profile(&profile).await?;

        let session = self.mint_session(&user_id)?;
        self.hub.track(session.clone());

        tracing::info!(user_id = %user_id, "New account registered");
        Ok((session, profile))
    }

    /// Exchange credentials for a session and hydrate the profile.
    ///
    /// The profile may legitimately be absent (registration interrupted
    /// before the profile write); callers route such principals back to
    /// registration.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(Session, Option<Profile>)> {
        let credentials = self
            .db
            .get_credentials_by_email(email)
            .await?
            .ok_or_else(|| AppError::Auth("Invalid email or password".to_string()))?;

        let verified = bcrypt::verify(password, &credentials.password_hash)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Password verify failed: {}", e)))?;
        if !verified {
            return Err(AppError::Auth("Invalid email or password".to_string()));
        }

        let session = self.mint_session(&credentials.user_id)?;
        self.hub.track(session.clone());

        let profile = self.db.get_profile(&credentials.user_id).await?;

        tracing::info!(user_id = %credentials.user_id, "Signed in");
        Ok((session, profile))
    }

    /// Clear the tracked session unconditionally, regardless of any
    /// backend outcome.
    pub fn sign_out(&self, user_id: &str) {
        self.hub.clear(user_id);
        tracing::info!(user_id = %user_id, "Signed out");
    }

    /// Complete onboarding: set preferences and flip
    /// `onboarding_complete` to true. The flag never reverts; repeat calls
    /// leave an already-complete profile untouched.
    ///
    /// Fails with `NotAuthenticated` when no profile row exists (the
    /// original client silently ignored this case; promoted to an explicit
    /// error here).
    pub async fn complete_onboarding(
        &self,
        user_id: &str,
        update: OnboardingUpdate,
    ) -> Result<Profile> {
        let mut profile = self
            .db
            .get_profile(user_id)
            .await?
            .ok_or(AppError::NotAuthenticated)?;

        if profile.onboarding_complete {
            return Ok(profile);
        }

        profile.preferred_focus = Some(update.preferred_focus);
        profile.units = Some(update.units);
        profile.wearable_connected = update.wearable_connected;
        profile.onboarding_complete = true;

        self.db.upsert_profile(&profile).await?;
        tracing::info!(user_id = %user_id, "Onboarding complete");
        Ok(profile)
    }

    /// Apply a partial profile update and return the refreshed profile.
    pub async fn update_profile(&self, user_id: &str, update: ProfileUpdate) -> Result<Profile> {
        let mut profile = self
            .db
            .get_profile(user_id)
            .await?
            .ok_or(AppError::NotAuthenticated)?;

        if let Some(full_name) = update.full_name {
            profile.full_name = full_name;
        }
        if let Some(avatar_url) = update.avatar_url {
            profile.avatar_url = Some(avatar_url);
        }
        if let Some(units) = update.units {
            profile.units = Some(units);
        }
        if let Some(preferred_focus) = update.preferred_focus {
            profile.preferred_focus = Some(preferred_focus);
        }
        if let Some(wearable_connected) = update.wearable_connected {
            profile.wearable_connected = wearable_connected;
        }

        self.db.upsert_profile(&profile).await?;
        Ok(profile)
    }
}
