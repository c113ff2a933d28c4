//! Shared helpers for integration tests.
//!
//! Each test builds the full application router against its own
//! in-memory `SQLite` database and drives it in-process with
//! `tower::ServiceExt::oneshot`. Nothing here touches the network
//! except the local captcha stub server.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p legal-intake-integration-tests
//! ```

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::missing_panics_doc)]

use axum::{
    Json, Router,
    body::Body,
    http::{Request, StatusCode, header},
    routing::post,
};
use secrecy::SecretString;
use serde_json::{Value, json};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tower::ServiceExt;

use legal_intake_server::config::{AuthConfig, EmailConfig, ServerConfig};
use legal_intake_server::db::MIGRATOR;
use legal_intake_server::{AppState, app};

/// Signing secret used across all test configurations.
const TEST_SECRET: &str = "kQ8v!zR3mT7@pL1xW9cF5nB2hJ6dY4sG";

/// Base configuration for tests. Captcha and email are off unless the
/// test overrides them.
#[must_use]
pub fn test_config() -> ServerConfig {
    ServerConfig {
        database_url: SecretString::from("sqlite::memory:"),
        host: "127.0.0.1".parse().expect("valid address"),
        port: 0,
        app_name: "legal-intake-test".to_owned(),
        debug: false,
        allowed_origins: Vec::new(),
        auth: AuthConfig {
            secret: SecretString::from(TEST_SECRET),
            algorithm: jsonwebtoken::Algorithm::HS256,
            token_lifetime_minutes: 30,
        },
        email: None,
        captcha_secret: None,
        captcha_siteverify_url: None,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// Email configuration pointing at a port nothing listens on, for
/// exercising notification failure paths.
#[must_use]
pub fn unreachable_email_config() -> EmailConfig {
    EmailConfig {
        smtp_host: "127.0.0.1".to_owned(),
        smtp_port: 1,
        smtp_username: "test".to_owned(),
        smtp_password: SecretString::from("test-password"),
        from_address: "noreply@test.invalid".to_owned(),
        staff_mailbox: "office@test.invalid".to_owned(),
    }
}

/// Fresh in-memory database with migrations applied.
///
/// A single connection keeps the in-memory database alive and shared
/// for the lifetime of the pool.
pub async fn test_pool() -> SqlitePool {
    let options = "sqlite::memory:"
        .parse::<SqliteConnectOptions>()
        .expect("valid connection string")
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .min_connections(1)
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("in-memory database");

    MIGRATOR.run(&pool).await.expect("migrations apply");

    pool
}

/// Full application router plus a handle to its database.
pub async fn test_app() -> (Router, SqlitePool) {
    test_app_with_config(test_config()).await
}

/// Full application router built from a custom configuration.
pub async fn test_app_with_config(config: ServerConfig) -> (Router, SqlitePool) {
    let pool = test_pool().await;
    let state = AppState::new(config, pool.clone()).expect("state builds");
    (app(state), pool)
}

/// Send one request and return (status, parsed JSON body).
///
/// Bodies that aren't JSON (e.g. empty 405 responses) come back as
/// `Value::Null`.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&value).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.expect("request handled");
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body read");
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, value)
}

/// Register a client account and return its bearer token.
pub async fn register_and_login(app: &Router, email: &str, password: &str) -> String {
    let (status, _) = send(
        app,
        "POST",
        "/auth/register",
        Some(json!({ "email": email, "password": password, "full_name": "Test Client" })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "registration should succeed");

    login(app, email, password).await
}

/// Bootstrap the admin account and return its bearer token.
pub async fn create_admin_and_login(app: &Router, email: &str, password: &str) -> String {
    let (status, _) = send(
        app,
        "POST",
        "/auth/create-admin",
        Some(json!({ "email": email, "password": password, "full_name": "Test Admin" })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "admin bootstrap should succeed");

    login(app, email, password).await
}

/// Exchange credentials for a bearer token.
pub async fn login(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/auth/login",
        Some(json!({ "email": email, "password": password })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login should succeed");

    body["access_token"]
        .as_str()
        .expect("token present")
        .to_owned()
}

/// Start a local stand-in for the Turnstile siteverify endpoint that
/// always answers with the given verdict. Returns its URL.
pub async fn spawn_captcha_stub(success: bool) -> String {
    let stub = Router::new().route(
        "/siteverify",
        post(move || async move { Json(json!({ "success": success })) }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub address");

    tokio::spawn(async move {
        let _ = axum::serve(listener, stub).await;
    });

    format!("http://{addr}/siteverify")
}

/// A well-formed ticket submission body.
#[must_use]
pub fn ticket_body(captcha_token: &str) -> Value {
    json!({
        "client_name": "Dana Levi",
        "client_email": "dana@example.com",
        "client_phone": "050-1234567",
        "event_summary": "Car accident on Route 2, need representation",
        "urgency_level": "High",
        "captcha_token": captcha_token,
    })
}
