//! Customer username type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Name`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    /// The input is empty or only whitespace.
    #[error("username cannot be blank")]
    Blank,
    /// The input is too long.
    #[error("username must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains whitespace.
    #[error("username cannot contain whitespace")]
    ContainsWhitespace,
}

/// A customer's username.
///
/// Usernames are unique per customer and identify the principal carried by
/// an access token.
///
/// ## Constraints
///
/// - Surrounding whitespace is trimmed before validation
/// - Length: 1-20 characters
/// - No whitespace inside the name
///
/// ## Examples
///
/// ```
/// use shopping_cart_core::Name;
///
/// assert!(Name::parse("puppy").is_ok());
/// assert!(Name::parse("   ").is_err());
/// assert!(Name::parse("two words").is_err());
/// ```
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Name(String);

impl Name {
    /// Maximum length of a username, in characters.
    pub const MAX_LENGTH: usize = 20;

    /// Parse a `Name` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is blank, longer than
    /// [`Name::MAX_LENGTH`] characters, or contains whitespace.
    pub fn parse(s: &str) -> Result<Self, NameError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(NameError::Blank);
        }

        if trimmed.chars().count() > Self::MAX_LENGTH {
            return Err(NameError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if trimmed.chars().any(char::is_whitespace) {
            return Err(NameError::ContainsWhitespace);
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the username as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Name` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Name {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Name {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Name {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Name {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!(Name::parse("puppy").unwrap().as_str(), "puppy");
        assert_eq!(Name::parse("  kitty ").unwrap().as_str(), "kitty");
        assert!(Name::parse(&"a".repeat(20)).is_ok());
    }

    #[test]
    fn test_parse_blank() {
        assert_eq!(Name::parse(""), Err(NameError::Blank));
        assert_eq!(Name::parse(" \t\n"), Err(NameError::Blank));
    }

    #[test]
    fn test_parse_too_long() {
        assert_eq!(
            Name::parse(&"a".repeat(21)),
            Err(NameError::TooLong { max: 20 })
        );
    }

    #[test]
    fn test_parse_inner_whitespace() {
        assert_eq!(
            Name::parse("two words"),
            Err(NameError::ContainsWhitespace)
        );
    }

    #[test]
    fn test_multibyte_length_counts_chars() {
        // 10 Hangul syllables are 30 bytes but only 10 characters.
        assert!(Name::parse(&"가".repeat(10)).is_ok());
    }

    #[test]
    fn test_deserialize_validates() {
        let name: Name = serde_json::from_str("\"puppy\"").unwrap();
        assert_eq!(name.as_str(), "puppy");
        assert!(serde_json::from_str::<Name>("\"  \"").is_err());
    }
}
