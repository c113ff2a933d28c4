//! Integration tests for registration, login and the admin bootstrap.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::http::StatusCode;
use serde_json::json;

use legal_intake_integration_tests::{
    create_admin_and_login, register_and_login, send, test_app,
};

const GOOD_PASSWORD: &str = "Abcdef1!";

#[tokio::test]
async fn register_then_me_returns_profile_without_hash() {
    let (app, _pool) = test_app().await;

    let token = register_and_login(&app, "client@example.com", GOOD_PASSWORD).await;

    let (status, body) = send(&app, "GET", "/auth/me", None, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "client@example.com");
    assert_eq!(body["role"], "client");
    assert_eq!(body["full_name"], "Test Client");
    assert!(body.get("password_hash").is_none());
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn each_password_rule_rejected_individually() {
    let (app, _pool) = test_app().await;

    let cases = [
        ("Ab1!", "characters"),
        ("abcdef1!", "uppercase"),
        ("ABCDEF1!", "lowercase"),
        ("Abcdefg!", "digit"),
        ("Abcdefg1", "special"),
    ];

    for (password, expected_hint) in cases {
        let (status, body) = send(
            &app,
            "POST",
            "/auth/register",
            Some(json!({ "email": "pw@example.com", "password": password })),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "password {password:?}");
        let message = body["error"].as_str().unwrap();
        assert!(
            message.contains(expected_hint),
            "expected {expected_hint:?} in {message:?}"
        );
    }
}

#[tokio::test]
async fn duplicate_email_conflicts() {
    let (app, _pool) = test_app().await;

    let _ = register_and_login(&app, "dup@example.com", GOOD_PASSWORD).await;

    let (status, body) = send(
        &app,
        "POST",
        "/auth/register",
        Some(json!({ "email": "dup@example.com", "password": GOOD_PASSWORD })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("already exists"));
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let (app, _pool) = test_app().await;

    let _ = register_and_login(&app, "known@example.com", GOOD_PASSWORD).await;

    let (wrong_pw_status, wrong_pw_body) = send(
        &app,
        "POST",
        "/auth/login",
        Some(json!({ "email": "known@example.com", "password": "Wrong1!xx" })),
        None,
    )
    .await;
    let (unknown_status, unknown_body) = send(
        &app,
        "POST",
        "/auth/login",
        Some(json!({ "email": "nobody@example.com", "password": GOOD_PASSWORD })),
        None,
    )
    .await;

    assert_eq!(wrong_pw_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_pw_body, unknown_body);
}

#[tokio::test]
async fn token_response_shape() {
    let (app, _pool) = test_app().await;

    let _ = register_and_login(&app, "shape@example.com", GOOD_PASSWORD).await;

    let (status, body) = send(
        &app,
        "POST",
        "/auth/login",
        Some(json!({ "email": "shape@example.com", "password": GOOD_PASSWORD })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "bearer");
    assert!(!body["access_token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn me_requires_valid_token() {
    let (app, _pool) = test_app().await;

    let (no_token, _) = send(&app, "GET", "/auth/me", None, None).await;
    assert_eq!(no_token, StatusCode::UNAUTHORIZED);

    let (bad_token, _) = send(&app, "GET", "/auth/me", None, Some("not-a-token")).await;
    assert_eq!(bad_token, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_bootstrap_works_exactly_once() {
    let (app, _pool) = test_app().await;

    let token = create_admin_and_login(&app, "admin@example.com", GOOD_PASSWORD).await;

    let (status, body) = send(&app, "GET", "/auth/me", None, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "admin");

    // A second bootstrap is refused even with a different email.
    let (second, body) = send(
        &app,
        "POST",
        "/auth/create-admin",
        Some(json!({ "email": "other-admin@example.com", "password": GOOD_PASSWORD })),
        None,
    )
    .await;
    assert_eq!(second, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("Admin"));
}
