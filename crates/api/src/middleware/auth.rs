//! Bearer-token authentication.
//!
//! [`require_customer`] resolves the principal once per request and stores
//! it in the request extensions; handlers read it back with the
//! [`CurrentCustomer`] extractor.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::db::CustomerRepository;
use crate::error::{AppError, set_sentry_user};
use crate::models::AuthorizedCustomer;
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

/// Returns the token of an `Authorization: Bearer <token>` header.
///
/// The scheme is matched case-insensitively.
///
/// # Errors
///
/// Returns `AuthError::MissingToken` without an `Authorization` header and
/// `AuthError::MalformedHeader` for any other scheme or an empty token.
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::MalformedHeader)?;

    match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => {
            let token = token.trim();
            if token.is_empty() || token.contains(' ') {
                Err(AuthError::MalformedHeader)
            } else {
                Ok(token)
            }
        }
        _ => Err(AuthError::MalformedHeader),
    }
}

/// Middleware that rejects requests without a valid bearer token.
///
/// # Errors
///
/// Responds 401 when the token is missing, malformed, invalid or names a
/// customer that no longer exists.
pub async fn require_customer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer(request.headers())?.to_owned();

    let principal = AuthService::new(CustomerRepository::new(state.pool()), state.tokens())
        .resolve_principal(&token)
        .await?;

    tracing::Span::current().record("customer_id", principal.id().as_i64());
    set_sentry_user(&principal.id(), Some(principal.email().as_str()));

    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}

/// The authenticated customer of the current request.
///
/// Only available on routes behind [`require_customer`].
///
/// # Example
///
/// ```rust,ignore
/// async fn me(CurrentCustomer(customer): CurrentCustomer) -> String {
///     customer.name().to_string()
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentCustomer(pub AuthorizedCustomer);

impl<S> FromRequestParts<S> for CurrentCustomer
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthorizedCustomer>()
            .cloned()
            .map(Self)
            .ok_or(AppError::Auth(AuthError::MissingToken))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn with_authorization(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extract_bearer() {
        let headers = with_authorization("Bearer abc.def.ghi");
        assert_eq!(extract_bearer(&headers).unwrap(), "abc.def.ghi");

        let headers = with_authorization("bearer abc");
        assert_eq!(extract_bearer(&headers).unwrap(), "abc");
    }

    #[test]
    fn test_extract_bearer_missing() {
        assert!(matches!(
            extract_bearer(&HeaderMap::new()),
            Err(AuthError::MissingToken)
        ));
    }

    #[test]
    fn test_extract_bearer_malformed() {
        for value in ["Basic dXNlcjpwYXNz", "Bearer", "Bearer ", "Bearer a b", "abc"] {
            assert!(
                matches!(
                    extract_bearer(&with_authorization(value)),
                    Err(AuthError::MalformedHeader)
                ),
                "{value}"
            );
        }
    }
}
