//! Authentication extractors.
//!
//! Bearer-token extractors for route handlers. Every failure mode on the
//! way to a `User` (missing header, bad token, unknown account) collapses
//! into the same 401 so responses reveal nothing about why.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use legal_intake_core::Email;

use crate::db::users::UserRepository;
use crate::error::AppError;
use crate::models::User;
use crate::state::AppState;

/// Extractor that requires a valid bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     CurrentUser(user): CurrentUser,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthenticated)?;

        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or(AppError::Unauthenticated)?;

        let claims = state
            .tokens()
            .verify(token)
            .map_err(|_| AppError::Unauthenticated)?;

        let email = Email::parse(&claims.sub).map_err(|_| AppError::Unauthenticated)?;

        let user = UserRepository::new(state.pool())
            .get_by_email(&email)
            .await
            .map_err(|_| AppError::Unauthenticated)?
            .ok_or(AppError::Unauthenticated)?;

        Ok(Self(user))
    }
}

/// Extractor that requires an authenticated admin.
///
/// Rejects with 401 when unauthenticated and 403 when the caller is a
/// valid non-admin account.
pub struct AdminUser(pub User);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;

        if !user.role.is_admin() {
            return Err(AppError::Forbidden);
        }

        Ok(Self(user))
    }
}
