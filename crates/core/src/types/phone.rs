//! Local mobile phone number type.

use core::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Eleven digits: `01`, an operator digit (0, 1, 2 or 5), then eight digits.
static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^01[0125][0-9]{8}$").unwrap_or_else(|e| panic!("invalid phone pattern: {e}"))
});

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input does not match the local mobile pattern.
    #[error("phone number must be 11 digits starting with 010, 011, 012 or 015")]
    Invalid,
}

/// A local mobile phone number, e.g. `01012345678`.
///
/// ```
/// use freshcart_core::Phone;
///
/// assert!(Phone::parse("01012345678").is_ok());
/// assert!(Phone::parse("01512345678").is_ok());
/// assert!(Phone::parse("01312345678").is_err());
/// assert!(Phone::parse("123").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Parse a `Phone` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`PhoneError::Empty`] for blank input and [`PhoneError::Invalid`]
    /// when the input is not an eleven-digit local mobile number.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PhoneError::Empty);
        }
        if !PHONE_PATTERN.is_match(s) {
            return Err(PhoneError::Invalid);
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
