//! Account password type.

use core::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// One uppercase letter followed by 5 to 10 lowercase letters or digits.
static PASSWORD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z][a-z0-9]{5,10}$").unwrap_or_else(|e| panic!("invalid password pattern: {e}"))
});

/// Errors that can occur when parsing a [`Password`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PasswordError {
    /// The input string is empty.
    #[error("password cannot be empty")]
    Empty,
    /// The input does not satisfy the account password policy.
    #[error("password must start with an uppercase letter and be 6-11 characters")]
    Invalid,
}

/// A password that satisfies the remote account policy.
///
/// The value is never printed: `Debug` is redacted and there is no `Display`.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// Parse a `Password`.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordError::Empty`] for empty input and
    /// [`PasswordError::Invalid`] when the policy pattern does not match.
    pub fn parse(s: &str) -> Result<Self, PasswordError> {
        if s.is_empty() {
            return Err(PasswordError::Empty);
        }
        if !PASSWORD_PATTERN.is_match(s) {
            return Err(PasswordError::Invalid);
        }
        Ok(Self(s.to_owned()))
    }

    /// Expose the raw password for transmission to the API.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
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
    fn test_valid_passwords() {
        assert!(Password::parse("Ahmed123").is_ok());
        assert!(Password::parse("Abcdef").is_ok());
        assert!(Password::parse("Abcdefghij1").is_ok());
    }

    #[test]
    fn test_length_bounds() {
        assert_eq!(Password::parse("Abcde"), Err(PasswordError::Invalid));
        assert_eq!(Password::parse("Abcdefghij12"), Err(PasswordError::Invalid));
    }

    #[test]
    fn test_requires_leading_uppercase() {
        assert_eq!(Password::parse("ahmed123"), Err(PasswordError::Invalid));
        assert_eq!(Password::parse("1hmed123"), Err(PasswordError::Invalid));
    }

    #[test]
    fn test_rejects_symbols_and_inner_uppercase() {
        assert_eq!(Password::parse("Ahmed@123"), Err(PasswordError::Invalid));
        assert_eq!(Password::parse("AhmedABC"), Err(PasswordError::Invalid));
    }

    #[test]
    fn test_debug_is_redacted() {
        let password = Password::parse("Ahmed123").unwrap();
        let debug = format!("{password:?}");
        assert!(!debug.contains("Ahmed123"));
        assert!(debug.contains("REDACTED"));
    }
}
