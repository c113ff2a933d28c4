//! User identity record.

use chrono::{DateTime, Utc};
use legal_intake_core::{Email, Role, UserId};

/// A registered user of the portal.
///
/// The password hash never leaves the server; route handlers convert this
/// into a response type that omits it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}
