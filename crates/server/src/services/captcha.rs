//! Cloudflare Turnstile captcha verification.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

/// Default Turnstile siteverify endpoint.
pub const DEFAULT_SITEVERIFY_URL: &str =
    "https://challenges.cloudflare.com/turnstile/v0/siteverify";

/// How long to wait for the siteverify endpoint.
const VERIFY_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors from captcha verification.
#[derive(Debug, Error)]
pub enum CaptchaError {
    /// The token was rejected or the verification service failed.
    #[error("captcha verification failed")]
    Failed,
}

/// Response body of the siteverify endpoint. Error codes are ignored;
/// only the boolean verdict matters here.
#[derive(Debug, Deserialize)]
struct SiteverifyResponse {
    success: bool,
}

/// Verifies Turnstile tokens against the siteverify endpoint.
///
/// When no secret is configured, verification is skipped with a warning
/// so local development works without a Turnstile account.
#[derive(Clone)]
pub struct CaptchaVerifier {
    secret: Option<SecretString>,
    endpoint: String,
    http: reqwest::Client,
}

impl CaptchaVerifier {
    /// Build a verifier.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` if the HTTP client cannot be constructed.
    pub fn new(
        secret: Option<SecretString>,
        endpoint: Option<String>,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(VERIFY_TIMEOUT).build()?;

        Ok(Self {
            secret,
            endpoint: endpoint.unwrap_or_else(|| DEFAULT_SITEVERIFY_URL.to_owned()),
            http,
        })
    }

    /// Verify a captcha token.
    ///
    /// # Errors
    ///
    /// Returns `CaptchaError::Failed` if the token is rejected or the
    /// verification service is unreachable.
    pub async fn verify(&self, token: &str) -> Result<(), CaptchaError> {
        let Some(secret) = &self.secret else {
            tracing::warn!("captcha secret not configured, skipping verification");
            return Ok(());
        };

        let response = self
            .http
            .post(&self.endpoint)
            .form(&[
                ("secret", secret.expose_secret()),
                ("response", token),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "captcha verification request failed");
                CaptchaError::Failed
            })?;

        let verdict: SiteverifyResponse = response.json().await.map_err(|e| {
            tracing::warn!(error = %e, "captcha verification response unreadable");
            CaptchaError::Failed
        })?;

        if verdict.success {
            Ok(())
        } else {
            Err(CaptchaError::Failed)
        }
    }
}
