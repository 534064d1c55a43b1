//! Authentication error types.

use thiserror::Error;

use super::token::TokenError;
use crate::db::RepositoryError;

/// Errors that can occur while authenticating a request or a login.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No `Authorization` header on the request.
    #[error("missing bearer token")]
    MissingToken,

    /// `Authorization` header present but not `Bearer <token>`.
    #[error("malformed authorization header")]
    MalformedHeader,

    /// Token failed verification.
    #[error("invalid token: {0}")]
    InvalidToken(#[from] TokenError),

    /// Token subject does not name an existing customer.
    #[error("customer not found")]
    CustomerNotFound,

    /// Unknown username or wrong password on login.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
