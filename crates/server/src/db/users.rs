//! User repository for database operations.

use chrono::Utc;
use sqlx::SqlitePool;

use legal_intake_core::{Email, Role, UserId};

use super::{RepositoryError, conflict_or_database};
use crate::models::User;

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a user by their email address (exact, case-sensitive match).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, full_name, role, created_at
             FROM users WHERE email = ?1",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, full_name, role, created_at
             FROM users WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Create a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        email: &Email,
        password_hash: &str,
        full_name: Option<&str>,
        role: Role,
    ) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (email, password_hash, full_name, role, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, email, password_hash, full_name, role, created_at",
        )
        .bind(email)
        .bind(password_hash)
        .bind(full_name)
        .bind(role)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_or_database(e, "email already registered"))?;

        Ok(user)
    }

    /// Whether any admin account exists.
    ///
    /// Used by the self-limiting admin bootstrap endpoint.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn admin_exists(&self) -> Result<bool, RepositoryError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = ?1")
                .bind(Role::Admin)
                .fetch_one(self.pool)
                .await?;

        Ok(count > 0)
    }
}
