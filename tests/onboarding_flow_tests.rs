// SPDX-License-Identifier: MIT

//! End-to-end onboarding flow against the Firestore emulator.
//!
//! Registration yields a session whose data access is still gated; only
//! after the onboarding call do data routes open up.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;

mod common;

async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.com", prefix, uuid::Uuid::new_v4())
}

#[tokio::test]
async fn test_registration_gates_data_until_onboarded() {
    require_emulator!();
    let (app, _) = common::create_emulator_app().await;

    let (status, session) = send(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({
            "email": unique_email("gate"),
            "password": "long-enough-password",
            "name": "Gate Tester"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = session["token"].as_str().unwrap().to_string();
    assert_eq!(session["user"]["onboarding_complete"], json!(false));

    // Data routes are closed while onboarding is pending
    let (status, body) = send(&app, "GET", "/api/workouts", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], json!("onboarding_required"));

    // The profile itself stays reachable
    let (status, _) = send(&app, "GET", "/api/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    // Complete onboarding
    let (status, user) = send(
        &app,
        "POST",
        "/api/me/onboarding",
        Some(&token),
        Some(json!({
            "preferred_focus": "cardio",
            "units": "imperial",
            "wearable_connected": true
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["onboarding_complete"], json!(true));
    assert_eq!(user["preferred_focus"], json!("cardio"));

    // Data routes open up
    let (status, _) = send(&app, "GET", "/api/workouts", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_onboarding_never_reverts() {
    require_emulator!();
    let (app, _) = common::create_emulator_app().await;

    let (_, session) = send(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({
            "email": unique_email("revert"),
            "password": "long-enough-password",
            "name": "Revert Tester"
        })),
    )
    .await;
    let token = session["token"].as_str().unwrap().to_string();

    let onboard = json!({
        "preferred_focus": "strength",
        "units": "metric"
    });
    let (status, _) = send(&app, "POST", "/api/me/onboarding", Some(&token), Some(onboard)).await;
    assert_eq!(status, StatusCode::OK);

    // A second call leaves the completed profile untouched
    let (status, user) = send(
        &app,
        "POST",
        "/api/me/onboarding",
        Some(&token),
        Some(json!({
            "preferred_focus": "mobility",
            "units": "imperial"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["onboarding_complete"], json!(true));
    assert_eq!(user["preferred_focus"], json!("strength"));

    // Profile updates cannot touch the flag either
    let (status, user) = send(
        &app,
        "PATCH",
        "/api/me",
        Some(&token),
        Some(json!({ "full_name": "Renamed", "onboarding_complete": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["name"], json!("Renamed"));
    assert_eq!(user["onboarding_complete"], json!(true));
}

#[tokio::test]
async fn test_duplicate_registration_rejected() {
    require_emulator!();
    let (app, _) = common::create_emulator_app().await;

    let email = unique_email("dup");
    let payload = json!({
        "email": email,
        "password": "long-enough-password",
        "name": "First"
    });

    let (status, _) = send(&app, "POST", "/auth/register", None, Some(payload.clone())).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "POST", "/auth/register", None, Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("bad_request"));
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    require_emulator!();
    let (app, _) = common::create_emulator_app().await;

    let email = unique_email("badpw");
    send(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({
            "email": email,
            "password": "long-enough-password",
            "name": "PW Tester"
        })),
    )
    .await;

    let (status, body) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": email, "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], json!("auth_failed"));
}
