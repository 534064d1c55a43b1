//! Authentication service.
//!
//! Password login issues a bearer token; every authenticated request turns
//! that token back into an [`AuthorizedCustomer`].

mod error;
mod token;

pub use error::AuthError;
pub use token::{TokenError, TokenProvider};

use tracing::instrument;

use shopping_cart_core::Password;

use crate::db::CustomerStore;
use crate::dto::{LoginRequest, TokenResponse};
use crate::models::AuthorizedCustomer;

/// Authentication service.
///
/// Handles password login and principal resolution.
pub struct AuthService<'a, C> {
    customers: C,
    tokens: &'a TokenProvider,
}

impl<'a, C: CustomerStore> AuthService<'a, C> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(customers: C, tokens: &'a TokenProvider) -> Self {
        Self { customers, tokens }
    }

    /// Login with username and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the username is unknown,
    /// the password is not a valid password, or it does not match.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn login(&self, request: &LoginRequest) -> Result<TokenResponse, AuthError> {
        let password =
            Password::parse(&request.password).map_err(|_| AuthError::InvalidCredentials)?;

        let customer = self
            .customers
            .find_by_name(request.username.trim())
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !customer.is_same_password(&password) {
            return Err(AuthError::InvalidCredentials);
        }

        let access_token = self.tokens.create_token(customer.name.as_str())?;
        tracing::info!(customer_id = %customer.id, "Customer logged in");

        Ok(TokenResponse::bearer(access_token, self.tokens.ttl_secs()))
    }

    /// Resolve the customer a bearer token was issued to.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the token fails verification and
    /// `AuthError::CustomerNotFound` if its subject no longer exists.
    pub async fn resolve_principal(&self, token: &str) -> Result<AuthorizedCustomer, AuthError> {
        let username = self.tokens.decode(token)?;

        let customer = self
            .customers
            .find_by_name(&username)
            .await?
            .ok_or(AuthError::CustomerNotFound)?;

        Ok(AuthorizedCustomer::from(customer))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;
    use shopping_cart_core::{Email, Name};

    use super::*;
    use crate::config::TokenConfig;
    use crate::db::MemoryStore;
    use crate::models::NewCustomer;

    fn tokens() -> TokenProvider {
        TokenProvider::new(&TokenConfig {
            secret: SecretString::from("k7Hq2mVx9Lp4Rt8Wn3Bz6Yc1Fd5Gj0Sa".to_owned()),
            ttl_secs: 60,
        })
    }

    async fn store_with_puppy() -> MemoryStore {
        let store = MemoryStore::new();
        let customer = NewCustomer::new(
            Name::parse("puppy").unwrap(),
            Email::parse("puppy@woowa.com").unwrap(),
            &Password::parse("password123").unwrap(),
        )
        .unwrap();
        store.save(&customer).await.unwrap();
        store
    }

    fn login(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_then_resolve() {
        let tokens = tokens();
        let auth = AuthService::new(store_with_puppy().await, &tokens);

        let response = auth.login(&login("puppy", "password123")).await.unwrap();
        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, 60);

        let principal = auth.resolve_principal(&response.access_token).await.unwrap();
        assert_eq!(principal.name().as_str(), "puppy");
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let tokens = tokens();
        let auth = AuthService::new(store_with_puppy().await, &tokens);

        let attempts = [
            ("puppy", "password124"),
            ("kitty", "password123"),
            ("puppy", "x"),
        ];
        for (username, password) in attempts {
            assert!(matches!(
                auth.login(&login(username, password)).await,
                Err(AuthError::InvalidCredentials)
            ));
        }
    }

    #[tokio::test]
    async fn test_resolve_unknown_subject() {
        let tokens = tokens();
        let auth = AuthService::new(MemoryStore::new(), &tokens);
        let token = tokens.create_token("ghost").unwrap();

        assert!(matches!(
            auth.resolve_principal(&token).await,
            Err(AuthError::CustomerNotFound)
        ));
    }

    #[tokio::test]
    async fn test_resolve_garbage_token() {
        let tokens = tokens();
        let auth = AuthService::new(MemoryStore::new(), &tokens);

        assert!(matches!(
            auth.resolve_principal("not-a-token").await,
            Err(AuthError::InvalidToken(TokenError::Malformed))
        ));
    }
}
