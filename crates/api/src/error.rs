//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`; the body is always `{"error": "<message>"}`.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::{AuthError, CartError, CatalogError, CustomerError};

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Customer account operation failed.
    #[error("Customer error: {0}")]
    Customer(#[from] CustomerError),

    /// Cart operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Catalog read failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Request body, query string or path could not be decoded.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database(_)
            | Self::Auth(AuthError::Repository(_))
            | Self::Customer(CustomerError::PasswordHash(_) | CustomerError::Repository(_))
            | Self::Cart(CartError::Repository(_))
            | Self::Catalog(CatalogError::Repository(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(_) | Self::Customer(CustomerError::NotFound) => StatusCode::UNAUTHORIZED,
            Self::Customer(CustomerError::DuplicateName | CustomerError::DuplicateEmail)
            | Self::Cart(CartError::AlreadyInCart(_)) => StatusCode::CONFLICT,
            Self::Cart(CartError::ProductNotFound(_)) | Self::Catalog(CatalogError::Product(_)) => {
                StatusCode::NOT_FOUND
            }
            Self::Customer(_) | Self::Cart(_) | Self::Catalog(_) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }

    /// Message safe to show to the client.
    fn client_message(&self) -> String {
        if self.status().is_server_error() {
            return "Internal server error".to_string();
        }

        match self {
            Self::Auth(AuthError::InvalidToken(_) | AuthError::CustomerNotFound)
            | Self::Customer(CustomerError::NotFound) => "Invalid or expired token".to_string(),
            Self::Auth(err) => err.to_string(),
            Self::Customer(err) => err.to_string(),
            Self::Cart(err) => err.to_string(),
            Self::Catalog(err) => err.to_string(),
            Self::BadRequest(message) => message.clone(),
            Self::Database(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        (status, Json(json!({ "error": self.client_message() }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context for the authenticated customer.
///
/// Associates errors captured later in the request with the customer.
pub fn set_sentry_user(customer_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(customer_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}
