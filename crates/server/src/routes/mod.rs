//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Service info
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (verifies database)
//!
//! # Auth
//! POST /auth/register          - Register a client account
//! POST /auth/login             - Exchange credentials for a bearer token
//! GET  /auth/me                - Current account profile
//! POST /auth/create-admin      - One-time admin bootstrap
//!
//! # Tickets
//! POST   /tickets/             - Public intake submission (captcha-gated)
//! GET    /tickets/admin        - List tickets (admin)
//! GET    /tickets/admin/{id}   - Ticket detail (admin)
//! PUT    /tickets/admin/{id}   - Partial update (admin)
//! DELETE /tickets/admin/{id}   - Delete ticket (admin)
//!
//! # Chat
//! POST /chat/messages          - Send a message
//! GET  /chat/messages          - List visible messages
//! PUT  /chat/messages/{id}/read - Mark a message read
//! GET  /chat/users             - Client roster (admin)
//!
//! # Blog
//! GET    /blog/articles            - Published articles
//! GET    /blog/articles/{slug}     - Published article by slug
//! GET    /blog/categories          - Published categories
//! GET    /blog/admin/articles      - All articles (admin)
//! POST   /blog/admin/articles      - Create article (admin)
//! GET    /blog/admin/articles/{id} - Article detail (admin)
//! PUT    /blog/admin/articles/{id} - Partial update (admin)
//! DELETE /blog/admin/articles/{id} - Delete article (admin)
//! ```

pub mod auth;
pub mod blog;
pub mod chat;
pub mod tickets;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post, put},
};
use serde_json::{Value, json};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/me", get(auth::me))
        .route("/create-admin", post(auth::create_admin))
}

/// Create the ticket routes router.
pub fn ticket_routes() -> Router<AppState> {
    Router::new()
        .route("/admin", get(tickets::list))
        .route(
            "/admin/{id}",
            get(tickets::show).put(tickets::update).delete(tickets::remove),
        )
}

/// Create the chat routes router.
pub fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/messages", post(chat::send).get(chat::list))
        .route("/messages/{id}/read", put(chat::mark_read))
        .route("/users", get(chat::roster))
}

/// Create the blog routes router.
pub fn blog_routes() -> Router<AppState> {
    Router::new()
        .route("/articles", get(blog::list_published))
        .route("/articles/{slug}", get(blog::show_published))
        .route("/categories", get(blog::categories))
        .route(
            "/admin/articles",
            get(blog::list_all).post(blog::create),
        )
        .route(
            "/admin/articles/{id}",
            get(blog::show).put(blog::update).delete(blog::remove),
        )
}

/// Create all routes for the intake backend.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/auth", auth_routes())
        // Nested "/" only matches the bare prefix, so the documented
        // trailing-slash intake path is registered at the top level.
        .route("/tickets/", post(tickets::submit))
        .nest("/tickets", ticket_routes())
        .nest("/chat", chat_routes())
        .nest("/blog", blog_routes())
}

/// Service info endpoint.
async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "name": state.config().app_name,
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
    }))
}

/// Liveness health check endpoint.
///
/// Returns ok if the server is running. Does not check dependencies.
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> axum::http::StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => axum::http::StatusCode::OK,
        Err(_) => axum::http::StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Resolve `limit`/`offset` query parameters to non-negative values.
///
/// A negative `LIMIT` would tell `SQLite` to return every row, so both
/// values are clamped at zero.
pub(crate) fn page(limit: Option<i64>, offset: Option<i64>, default_limit: i64) -> (i64, i64) {
    (
        limit.unwrap_or(default_limit).max(0),
        offset.unwrap_or(0).max(0),
    )
}
