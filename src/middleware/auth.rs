// SPDX-License-Identifier: MIT

//! JWT authentication and onboarding-gate middleware.

use crate::error::AppError;
use crate::models::profile::{access_state, AccessState};
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Session cookie name.
pub const SESSION_COOKIE: &str = "pulseboard_token";

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (principal ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Authenticated principal extracted from JWT.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}

/// Extract and verify the session token from a cookie or bearer header.
pub fn verify_token(
    jar: &CookieJar,
    headers: &axum::http::HeaderMap,
    signing_key: &[u8],
) -> Result<AuthUser, AppError> {
    let token = if let Some(cookie) = jar.get(SESSION_COOKIE) {
        cookie.value().to_string()
    } else {
        let auth_header = headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        match auth_header {
            Some(h) if h.starts_with("Bearer ") => h[7..].to_string(),
            _ => return Err(AppError::NotAuthenticated),
        }
    };

    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);

    let token_data =
        decode::<Claims>(&token, &key, &validation).map_err(|_| AppError::InvalidToken)?;

    Ok(AuthUser {
        user_id: token_data.claims.sub,
    })
}

/// Middleware that requires valid JWT authentication.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_user = verify_token(&jar, request.headers(), &state.config.jwt_signing_key)?;
    request.extensions_mut().insert(auth_user);
    Ok(next.run(request).await)
}

/// Middleware gating data routes on the access state machine.
///
/// Must be layered inside `require_auth`. A valid session with no profile
/// row is still anonymous (routed back to registration); a session with
/// onboarding pending may only reach the onboarding endpoint.
pub async fn require_onboarded(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or(AppError::NotAuthenticated)?;

    let profile = state.db.get_profile(&user.user_id).await?;

    match access_state(true, profile.as_ref()) {
        AccessState::Ready => Ok(next.run(request).await),
        AccessState::OnboardingPending => Err(AppError::OnboardingRequired),
        AccessState::Anonymous => Err(AppError::NotAuthenticated),
    }
}

/// Create a JWT for a user session.
pub fn create_jwt(user_id: &str, signing_key: &[u8]) -> anyhow::Result<String> {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        iat: now,
        exp: now + 30 * 24 * 60 * 60, // 30 days
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}
