//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::ServerConfig;
use crate::services::captcha::CaptchaVerifier;
use crate::services::email::EmailService;
use crate::services::token::TokenService;

/// Error constructing application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to build captcha verifier: {0}")]
    Captcha(#[from] reqwest::Error),
    #[error("failed to build email service: {0}")]
    Email(#[from] lettre::transport::smtp::Error),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: SqlitePool,
    tokens: TokenService,
    captcha: CaptchaVerifier,
    email: Option<EmailService>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the captcha HTTP client or the SMTP transport
    /// cannot be constructed.
    pub fn new(config: ServerConfig, pool: SqlitePool) -> Result<Self, StateError> {
        let tokens = TokenService::new(&config.auth);
        let captcha = CaptchaVerifier::new(
            config.captcha_secret.clone(),
            config.captcha_siteverify_url.clone(),
        )?;
        let email = match &config.email {
            Some(email_config) => Some(EmailService::new(email_config)?),
            None => {
                tracing::warn!("SMTP not configured, email notifications disabled");
                None
            }
        };

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                tokens,
                captcha,
                email,
            }),
        })
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    /// Get a reference to the token service.
    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.inner.tokens
    }

    /// Get a reference to the captcha verifier.
    #[must_use]
    pub fn captcha(&self) -> &CaptchaVerifier {
        &self.inner.captcha
    }

    /// Get the email service, if SMTP is configured.
    #[must_use]
    pub fn email(&self) -> Option<&EmailService> {
        self.inner.email.as_ref()
    }
}
