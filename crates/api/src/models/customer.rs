//! Customer domain types.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{DateTime, Utc};

use shopping_cart_core::{CustomerId, Email, Name, Password};

/// Hashing a password failed.
#[derive(Debug, thiserror::Error)]
#[error("password hashing failed")]
pub struct PasswordHashError;

/// An Argon2id password hash in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// Hash a validated password with a fresh random salt.
    ///
    /// # Errors
    ///
    /// Returns `PasswordHashError` if Argon2 fails to produce a hash.
    pub fn hash(password: &Password) -> Result<Self, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.expose().as_bytes(), &salt)
            .map(|hash| Self(hash.to_string()))
            .map_err(|_| PasswordHashError)
    }

    /// Wrap a hash loaded from storage.
    #[must_use]
    pub const fn from_stored(hash: String) -> Self {
        Self(hash)
    }

    /// Returns `true` if `password` hashes to this value.
    ///
    /// A stored value that is not a valid PHC string never matches.
    #[must_use]
    pub fn matches(&self, password: &Password) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.0) else {
            return false;
        };

        Argon2::default()
            .verify_password(password.expose().as_bytes(), &parsed)
            .is_ok()
    }

    /// Returns the PHC string for storage.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("HashedPassword([REDACTED])")
    }
}

/// A registered customer (domain type).
#[derive(Debug, Clone)]
pub struct Customer {
    /// Unique customer ID.
    pub id: CustomerId,
    /// Unique username.
    pub name: Name,
    /// Unique email address.
    pub email: Email,
    /// Stored password hash.
    pub password: HashedPassword,
    /// When the customer signed up.
    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// Returns `true` if `password` is this customer's current password.
    #[must_use]
    pub fn is_same_password(&self, password: &Password) -> bool {
        self.password.matches(password)
    }
}

/// A customer that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub name: Name,
    pub email: Email,
    pub password: HashedPassword,
}

impl NewCustomer {
    /// Build a new customer, hashing the password.
    ///
    /// # Errors
    ///
    /// Returns `PasswordHashError` if the password cannot be hashed.
    pub fn new(name: Name, email: Email, password: &Password) -> Result<Self, PasswordHashError> {
        Ok(Self {
            name,
            email,
            password: HashedPassword::hash(password)?,
        })
    }
}

/// The authenticated principal of a request.
///
/// Resolved once per request by the auth middleware from the bearer token and
/// handed to handlers explicitly. It is never persisted.
#[derive(Debug, Clone)]
pub struct AuthorizedCustomer {
    customer: Customer,
}

impl AuthorizedCustomer {
    /// Returns the customer's ID.
    #[must_use]
    pub const fn id(&self) -> CustomerId {
        self.customer.id
    }

    /// Returns the customer's username.
    #[must_use]
    pub const fn name(&self) -> &Name {
        &self.customer.name
    }

    /// Returns the customer's email.
    #[must_use]
    pub const fn email(&self) -> &Email {
        &self.customer.email
    }

    /// Returns the customer as loaded when the request was authenticated.
    #[must_use]
    pub const fn customer(&self) -> &Customer {
        &self.customer
    }
}

impl From<Customer> for AuthorizedCustomer {
    fn from(customer: Customer) -> Self {
        Self { customer }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn password(raw: &str) -> Password {
        Password::parse(raw).unwrap()
    }

    #[test]
    fn test_hash_and_match() {
        let hashed = HashedPassword::hash(&password("password123")).unwrap();
        assert!(hashed.as_str().starts_with("$argon2"));
        assert!(hashed.matches(&password("password123")));
        assert!(!hashed.matches(&password("password124")));
    }

    #[test]
    fn test_same_password_hashes_differently() {
        let first = HashedPassword::hash(&password("password123")).unwrap();
        let second = HashedPassword::hash(&password("password123")).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_corrupt_stored_hash_never_matches() {
        let stored = HashedPassword::from_stored("not-a-phc-string".to_string());
        assert!(!stored.matches(&password("password123")));
    }

    #[test]
    fn test_debug_is_redacted() {
        let hashed = HashedPassword::hash(&password("password123")).unwrap();
        assert_eq!(format!("{hashed:?}"), "HashedPassword([REDACTED])");
    }

    #[test]
    fn test_authorized_customer_exposes_identity() {
        let new = NewCustomer::new(
            Name::parse("puppy").unwrap(),
            Email::parse("puppy@woowa.com").unwrap(),
            &password("password123"),
        )
        .unwrap();
        let customer = Customer {
            id: CustomerId::new(3),
            name: new.name,
            email: new.email,
            password: new.password,
            created_at: Utc::now(),
        };

        let principal = AuthorizedCustomer::from(customer);
        assert_eq!(principal.id(), CustomerId::new(3));
        assert_eq!(principal.name().as_str(), "puppy");
        assert_eq!(principal.email().as_str(), "puppy@woowa.com");
        assert!(principal.customer().is_same_password(&password("password123")));
    }
}
