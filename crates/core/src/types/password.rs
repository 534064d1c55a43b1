//! Plain-text password type.
//!
//! A [`Password`] only ever lives for the duration of a request: it is
//! validated here, then hashed (or checked against a stored hash) by the
//! server. The value is kept in a [`SecretString`] so it never shows up in
//! `Debug` output or logs.

use core::fmt;

use secrecy::{ExposeSecret, SecretString};

/// Errors that can occur when parsing a [`Password`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PasswordError {
    /// The input is empty or only whitespace.
    #[error("password cannot be blank")]
    Blank,
    /// The input is shorter than the minimum length.
    #[error("password must be at least {min} characters")]
    TooShort {
        /// Minimum allowed length.
        min: usize,
    },
    /// The input is longer than the maximum length.
    #[error("password must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains whitespace.
    #[error("password cannot contain whitespace")]
    ContainsWhitespace,
}

/// A validated plain-text password.
///
/// ## Constraints
///
/// - Not blank
/// - Length: 8-64 characters
/// - No whitespace
///
/// ## Examples
///
/// ```
/// use shopping_cart_core::Password;
///
/// assert!(Password::parse("password123").is_ok());
/// assert!(Password::parse("").is_err());
/// assert!(Password::parse("short").is_err());
/// ```
#[derive(Clone)]
pub struct Password(SecretString);

impl Password {
    /// Minimum password length, in characters.
    pub const MIN_LENGTH: usize = 8;
    /// Maximum password length, in characters.
    pub const MAX_LENGTH: usize = 64;

    /// Parse a `Password` from a string.
    ///
    /// Unlike names and emails, passwords are not trimmed.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is blank, outside the allowed length
    /// range, or contains whitespace.
    pub fn parse(s: &str) -> Result<Self, PasswordError> {
        if s.trim().is_empty() {
            return Err(PasswordError::Blank);
        }

        if s.chars().any(char::is_whitespace) {
            return Err(PasswordError::ContainsWhitespace);
        }

        let len = s.chars().count();
        if len < Self::MIN_LENGTH {
            return Err(PasswordError::TooShort {
                min: Self::MIN_LENGTH,
            });
        }
        if len > Self::MAX_LENGTH {
            return Err(PasswordError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        Ok(Self(SecretString::from(s.to_owned())))
    }

    /// Returns the raw password bytes for hashing or verification.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password([REDACTED])")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let password = Password::parse("password123").unwrap();
        assert_eq!(password.expose(), "password123");
        assert!(Password::parse(&"p".repeat(64)).is_ok());
    }

    #[test]
    fn test_parse_blank() {
        assert_eq!(Password::parse("").unwrap_err(), PasswordError::Blank);
        assert_eq!(Password::parse("        ").unwrap_err(), PasswordError::Blank);
    }

    #[test]
    fn test_parse_length_bounds() {
        assert_eq!(
            Password::parse("1234567").unwrap_err(),
            PasswordError::TooShort { min: 8 }
        );
        assert_eq!(
            Password::parse(&"p".repeat(65)).unwrap_err(),
            PasswordError::TooLong { max: 64 }
        );
    }

    #[test]
    fn test_parse_whitespace() {
        assert_eq!(
            Password::parse("pass word123").unwrap_err(),
            PasswordError::ContainsWhitespace
        );
    }

    #[test]
    fn test_debug_is_redacted() {
        let password = Password::parse("supersecret99").unwrap();
        let debug = format!("{password:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("supersecret99"));
    }
}
