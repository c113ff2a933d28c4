//! Authentication service.
//!
//! Password registration and login for portal accounts.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::SqlitePool;

use legal_intake_core::{Email, Role};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Characters counted as "special" for password strength.
const SPECIAL_CHARS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

/// Authentication service.
///
/// Handles user registration, admin bootstrap, and login.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new client account with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn register_client(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> Result<User, AuthError> {
        self.register(email, password, full_name, Role::Client).await
    }

    /// Bootstrap the first admin account.
    ///
    /// Succeeds at most once per deployment: refused outright as soon as
    /// any admin row exists.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AdminAlreadyExists` if an admin is already present.
    /// Otherwise the same errors as [`Self::register_client`].
    pub async fn register_admin(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> Result<User, AuthError> {
        if self.users.admin_exists().await? {
            return Err(AuthError::AdminAlreadyExists);
        }

        self.register(email, password, full_name, Role::Admin).await
    }

    async fn register(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
        role: Role,
    ) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(&email, &password_hash, full_name, role)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Login with email and password.
    ///
    /// Unknown email and wrong password produce the same error so the
    /// response does not reveal which accounts exist.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let user = self
            .users
            .get_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &user.password_hash)?;

        Ok(user)
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    if !password.chars().any(char::is_uppercase) {
        return Err(AuthError::WeakPassword(
            "password must contain at least one uppercase letter".to_owned(),
        ));
    }
    if !password.chars().any(char::is_lowercase) {
        return Err(AuthError::WeakPassword(
            "password must contain at least one lowercase letter".to_owned(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(AuthError::WeakPassword(
            "password must contain at least one digit".to_owned(),
        ));
    }
    if !password.chars().any(|c| SPECIAL_CHARS.contains(c)) {
        return Err(AuthError::WeakPassword(
            "password must contain at least one special character".to_owned(),
        ));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
