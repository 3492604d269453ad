//! Field-level validation of submitted forms.
//!
//! Each form has a *draft* type (raw strings as submitted, deserializable from
//! an URL-encoded body) and a validated *input* type. `validate()` either
//! returns the input or a [`FieldErrors`] map holding the first failing rule
//! per field. Validation is synchronous and pure; callers must not contact the
//! remote API when it fails.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{Email, EmailError, Password, Phone, PhoneError};

/// Validation messages keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    /// Create an empty error set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for `field`, keeping the first one reported.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    /// The error recorded for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Whether any field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failing fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over `(field, message)` pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    fn into_result<T>(self, value: impl FnOnce() -> Option<T>) -> Result<T, Self> {
        if self.is_empty() {
            value().ok_or(self)
        } else {
            Err(self)
        }
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

// =============================================================================
// Checkout
// =============================================================================

/// Shipping form as submitted on the checkout page.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ShippingDraft {
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub city: String,
}

/// A validated shipping address, serialized exactly as the order API expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub details: String,
    pub phone: Phone,
    pub city: String,
}

impl ShippingDraft {
    /// Minimum length of the address details line.
    pub const MIN_DETAILS: usize = 5;
    /// Minimum length of the city name.
    pub const MIN_CITY: usize = 2;

    /// Validate the draft.
    ///
    /// Every field is trimmed before its length and pattern checks, so
    /// padding never counts towards a minimum.
    ///
    /// # Errors
    ///
    /// Returns the per-field messages when any rule fails.
    pub fn validate(&self) -> Result<ShippingAddress, FieldErrors> {
        let mut errors = FieldErrors::new();

        let details = self.details.trim();
        if details.is_empty() {
            errors.add("details", "Address details are required");
        } else if char_len(details) < Self::MIN_DETAILS {
            errors.add("details", "Address details must be at least 5 characters");
        }

        let phone = match Phone::parse(&self.phone) {
            Ok(phone) => Some(phone),
            Err(PhoneError::Empty) => {
                errors.add("phone", "Phone number is required");
                None
            }
            Err(PhoneError::Invalid) => {
                errors.add("phone", "Invalid Egyptian phone number");
                None
            }
        };

        let city = self.city.trim();
        if city.is_empty() {
            errors.add("city", "City is required");
        } else if char_len(city) < Self::MIN_CITY {
            errors.add("city", "City must be at least 2 characters");
        }

        errors.into_result(|| {
            phone.map(|phone| ShippingAddress {
                details: details.to_owned(),
                phone,
                city: city.to_owned(),
            })
        })
    }
}

// =============================================================================
// Login
// =============================================================================

/// Login form as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginDraft {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Validated login credentials.
#[derive(Debug, Clone)]
pub struct LoginInput {
    pub email: Email,
    pub password: Password,
}

impl LoginDraft {
    /// Validate the draft.
    ///
    /// # Errors
    ///
    /// Returns the per-field messages when any rule fails.
    pub fn validate(&self) -> Result<LoginInput, FieldErrors> {
        let mut errors = FieldErrors::new();

        let email = parse_email(&self.email, &mut errors, "Email is invalid");
        let password = parse_password(
            &self.password,
            &mut errors,
            "Password must start uppercase and be 6-11 chars",
        );

        errors.into_result(|| Some(LoginInput {
            email: email?,
            password: password?,
        }))
    }
}

// =============================================================================
// Registration
// =============================================================================

/// Registration form as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrationDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, rename = "rePassword")]
    pub re_password: String,
}

/// Validated registration data.
#[derive(Debug, Clone)]
pub struct RegistrationInput {
    pub name: String,
    pub email: Email,
    pub phone: Phone,
    pub password: Password,
}

impl RegistrationDraft {
    /// Minimum display name length.
    pub const MIN_NAME: usize = 3;
    /// Maximum display name length.
    pub const MAX_NAME: usize = 10;

    /// Validate the draft.
    ///
    /// # Errors
    ///
    /// Returns the per-field messages when any rule fails.
    pub fn validate(&self) -> Result<RegistrationInput, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.add("name", "Name is required");
        } else if char_len(name) < Self::MIN_NAME {
            errors.add("name", "Name must be at least 3 characters");
        } else if char_len(name) > Self::MAX_NAME {
            errors.add("name", "Name must be at most 10 characters");
        }

        let email = parse_email(&self.email, &mut errors, "Invalid email address");

        let phone = match Phone::parse(&self.phone) {
            Ok(phone) => Some(phone),
            Err(PhoneError::Empty) => {
                errors.add("phone", "Phone is required");
                None
            }
            Err(PhoneError::Invalid) => {
                errors.add("phone", "Phone number is invalid");
                None
            }
        };

        let password = parse_password(
            &self.password,
            &mut errors,
            "Password must start with uppercase letter and be 6-11 chars",
        );

        if self.re_password.is_empty() {
            errors.add("rePassword", "Please confirm your password");
        } else if self.re_password != self.password {
            errors.add("rePassword", "Passwords must match");
        }

        errors.into_result(|| {
            Some(RegistrationInput {
                name: name.to_owned(),
                email: email?,
                phone: phone?,
                password: password?,
            })
        })
    }
}

fn parse_email(raw: &str, errors: &mut FieldErrors, invalid: &str) -> Option<Email> {
    match Email::parse(raw) {
        Ok(email) => Some(email),
        Err(EmailError::Empty) => {
            errors.add("email", "Email is required");
            None
        }
        Err(EmailError::TooLong { .. } | EmailError::Invalid) => {
            errors.add("email", invalid);
            None
        }
    }
}

fn parse_password(raw: &str, errors: &mut FieldErrors, invalid: &str) -> Option<Password> {
    match Password::parse(raw) {
        Ok(password) => Some(password),
        Err(crate::types::PasswordError::Empty) => {
            errors.add("password", "Password is required");
            None
        }
        Err(crate::types::PasswordError::Invalid) => {
            errors.add("password", invalid);
            None
        }
    }
}
