//! Bearer token issuing and verification.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use legal_intake_core::Role;

use crate::config::AuthConfig;

/// Claims carried inside an access token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Account email address.
    pub sub: String,
    /// Account role at issue time.
    pub role: Role,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
}

/// Errors from token operations.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Failed to sign a new token.
    #[error("failed to sign token: {0}")]
    Sign(#[source] jsonwebtoken::errors::Error),

    /// Token is malformed, expired, or has a bad signature.
    #[error("invalid token")]
    Invalid,
}

/// Stateless signer/verifier for access tokens.
///
/// Keys are derived once from the configured secret; only HMAC
/// algorithms are supported.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    lifetime: Duration,
}

impl TokenService {
    /// Build a token service from the auth configuration.
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: config.algorithm,
            lifetime: Duration::minutes(config.token_lifetime_minutes),
        }
    }

    /// Issue a signed token for an account.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Sign` if encoding fails.
    pub fn issue(&self, email: &str, role: Role) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: email.to_owned(),
            role,
            exp: (now + self.lifetime).timestamp(),
            iat: now.timestamp(),
        };

        jsonwebtoken::encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(TokenError::Sign)
    }

    /// Verify a token and return its claims.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Invalid` for any malformed, expired, or
    /// wrongly-signed token; the caller gets no further detail.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let validation = Validation::new(self.algorithm);
        jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| TokenError::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn test_service(lifetime_minutes: i64) -> TokenService {
        TokenService::new(&AuthConfig {
            secret: SecretString::from("test-secret-with-enough-length-for-hmac"),
            algorithm: Algorithm::HS256,
            token_lifetime_minutes: lifetime_minutes,
        })
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let service = test_service(30);
        let token = service.issue("user@example.com", Role::Client).expect("issue");

        let claims = service.verify(&token).expect("verify");
        assert_eq!(claims.sub, "user@example.com");
        assert_eq!(claims.role, Role::Client);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = test_service(-10);
        let token = service.issue("user@example.com", Role::Admin).expect("issue");

        assert!(matches!(service.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = test_service(30);
        let token = issuer.issue("user@example.com", Role::Client).expect("issue");

        let verifier = TokenService::new(&AuthConfig {
            secret: SecretString::from("a-completely-different-signing-secret!!"),
            algorithm: Algorithm::HS256,
            token_lifetime_minutes: 30,
        });
        assert!(matches!(verifier.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let service = test_service(30);
        assert!(matches!(
            service.verify("not.a.token"),
            Err(TokenError::Invalid)
        ));
    }
}
