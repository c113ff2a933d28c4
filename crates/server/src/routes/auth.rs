//! Authentication routes.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use legal_intake_core::{Email, Role, UserId};

use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::models::User;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Request to register a new account.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
}

/// Request to log in.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Issued bearer token.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

/// Account profile. The password hash never appears here.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub email: Email,
    pub full_name: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Register a new client account.
///
/// POST /auth/register
///
/// A welcome email goes out best effort; registration succeeds even when
/// it cannot be delivered.
#[instrument(skip(state, request), fields(email = %request.email))]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<UserResponse>> {
    let user = AuthService::new(state.pool())
        .register_client(
            &request.email,
            &request.password,
            request.full_name.as_deref(),
        )
        .await?;

    if let Some(email) = state.email() {
        let name = user.full_name.as_deref().unwrap_or(user.email.as_str());
        if let Err(e) = email.send_welcome(user.email.as_str(), name).await {
            tracing::warn!(user_id = %user.id, error = %e, "failed to send welcome email");
        }
    }

    Ok(Json(user.into()))
}

/// Exchange credentials for a bearer token.
///
/// POST /auth/login
#[instrument(skip(state, request), fields(email = %request.email))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>> {
    let user = AuthService::new(state.pool())
        .login(&request.email, &request.password)
        .await?;

    let access_token = state
        .tokens()
        .issue(user.email.as_str(), user.role)
        .map_err(|e| crate::error::AppError::Internal(e.to_string()))?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer",
    }))
}

/// Current account profile.
///
/// GET /auth/me
pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(user.into())
}

/// One-time admin bootstrap.
///
/// POST /auth/create-admin
///
/// Unauthenticated by design so a fresh deployment can create its first
/// admin; refused with a conflict once any admin exists.
#[instrument(skip(state, request), fields(email = %request.email))]
pub async fn create_admin(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<UserResponse>> {
    let user = AuthService::new(state.pool())
        .register_admin(
            &request.email,
            &request.password,
            request.full_name.as_deref(),
        )
        .await?;

    Ok(Json(user.into()))
}
