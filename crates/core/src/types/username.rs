//! Login name type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Username`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UsernameError {
    /// Fewer than [`Username::MIN_LENGTH`] characters.
    #[error("username must be at least {min} characters")]
    TooShort {
        /// Minimum allowed length.
        min: usize,
    },
    /// More than [`Username::MAX_LENGTH`] characters.
    #[error("username must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// Contains something other than ASCII letters, digits, `_`, `-` or `.`.
    #[error("username may only contain letters, digits, '_', '-' and '.'")]
    InvalidCharacter,
}

/// The name a customer logs in with.
///
/// Usernames are unique and compared exactly; only surrounding whitespace is
/// stripped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Minimum length in characters.
    pub const MIN_LENGTH: usize = 3;
    /// Maximum length in characters.
    pub const MAX_LENGTH: usize = 32;

    /// Parse a `Username`.
    ///
    /// # Errors
    ///
    /// Returns a [`UsernameError`] if the length or character set is wrong.
    pub fn parse(s: &str) -> Result<Self, UsernameError> {
        let s = s.trim();
        if s.len() < Self::MIN_LENGTH {
            return Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
            });
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        {
            return Err(UsernameError::InvalidCharacter);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the username as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Username {
    type Error = UsernameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Username> for String {
    fn from(username: Username) -> Self {
        username.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_typical_names() {
        assert_eq!(Username::parse(" admin ").unwrap().as_str(), "admin");
        assert!(Username::parse("jane.doe_2").is_ok());
        assert!(Username::parse("night-owl").is_ok());
    }

    #[test]
    fn test_length_bounds() {
        assert_eq!(
            Username::parse("ab"),
            Err(UsernameError::TooShort { min: 3 })
        );
        assert_eq!(
            Username::parse(&"x".repeat(33)),
            Err(UsernameError::TooLong { max: 32 })
        );
        assert!(Username::parse(&"x".repeat(32)).is_ok());
    }

    #[test]
    fn test_rejects_symbols() {
        assert_eq!(
            Username::parse("drop table"),
            Err(UsernameError::InvalidCharacter)
        );
        assert_eq!(
            Username::parse("lamp@home"),
            Err(UsernameError::InvalidCharacter)
        );
    }
}
