//! HS256 bearer tokens.
//!
//! Tokens are compact JWTs whose subject is the customer's username. Only
//! `HS256` is accepted and `exp` is required.

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::TokenConfig;

/// Token could not be issued or verified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token is not a well-formed JWT")]
    Malformed,
    #[error("token algorithm is not HS256")]
    UnsupportedHeader,
    #[error("token signature mismatch")]
    BadSignature,
    #[error("token claims are invalid")]
    InvalidClaims,
    #[error("token has expired")]
    Expired,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Utf8(_) => Self::Malformed,
            ErrorKind::InvalidSignature => Self::BadSignature,
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                Self::UnsupportedHeader
            }
            _ => Self::InvalidClaims,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Issues and verifies bearer tokens with a shared secret.
#[derive(Clone)]
pub struct TokenProvider {
    secret: SecretString,
    ttl_secs: u64,
}

impl TokenProvider {
    #[must_use]
    pub fn new(config: &TokenConfig) -> Self {
        Self {
            secret: config.secret.clone(),
            ttl_secs: config.ttl_secs,
        }
    }

    /// Token lifetime in seconds.
    #[must_use]
    pub const fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    /// Issue a token for `subject` that expires after the configured TTL.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::InvalidClaims` if the expiry overflows or the
    /// claims cannot be encoded.
    pub fn create_token(&self, subject: &str) -> Result<String, TokenError> {
        let iat = Utc::now().timestamp();
        let ttl = i64::try_from(self.ttl_secs).map_err(|_| TokenError::InvalidClaims)?;
        let claims = Claims {
            sub: subject.to_owned(),
            iat,
            exp: iat.checked_add(ttl).ok_or(TokenError::InvalidClaims)?,
        };
        self.sign(&claims)
    }

    /// Verify `token` and return its subject.
    ///
    /// # Errors
    ///
    /// Returns a `TokenError` describing why the token was rejected.
    pub fn decode(&self, token: &str) -> Result<String, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = jsonwebtoken::decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.expose_secret().as_bytes()),
            &validation,
        )?;

        if data.claims.sub.is_empty() {
            return Err(TokenError::InvalidClaims);
        }
        Ok(data.claims.sub)
    }

    fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(self.secret.expose_secret().as_bytes()),
        )
        .map_err(|_| TokenError::InvalidClaims)
    }
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenProvider")
            .field("secret", &"[REDACTED]")
            .field("ttl_secs", &self.ttl_secs)
            .finish()
    }
}
