// SPDX-License-Identifier: MIT

//! Request payload validation tests (no backend required — rejection
//! happens before any database call).

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;

mod common;

async fn post_json(app: axum::Router, uri: &str, body: serde_json::Value) -> StatusCode {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
    .status()
}

#[tokio::test]
async fn test_register_rejects_invalid_email() {
    let (app, _) = common::create_test_app();

    let status = post_json(
        app,
        "/auth/register",
        json!({
            "email": "not-an-email",
            "password": "long-enough-password",
            "name": "Test User"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_rejects_short_password() {
    let (app, _) = common::create_test_app();

    let status = post_json(
        app,
        "/auth/register",
        json!({
            "email": "someone@example.com",
            "password": "short",
            "name": "Test User"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_rejects_blank_name() {
    let (app, _) = common::create_test_app();

    let status = post_json(
        app,
        "/auth/register",
        json!({
            "email": "someone@example.com",
            "password": "long-enough-password",
            "name": ""
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_rejects_malformed_payload() {
    let (app, _) = common::create_test_app();

    // Missing password field entirely
    let status = post_json(app, "/auth/login", json!({ "email": "a@b.com" })).await;

    // Serde rejects the payload before the handler runs
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
