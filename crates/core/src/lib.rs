//! FreshCart Core - Shared types library.
//!
//! This crate provides the domain vocabulary used by the storefront:
//! - Newtype identifiers for server-issued object ids
//! - Prices in the catalog currency
//! - Validated contact data (email, phone, password)
//! - Form validation for login, registration and checkout
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no sessions. Validation here runs before any network call is made.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, phones and passwords
//! - [`validation`] - Field-level validation of submitted forms

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;
pub mod validation;

pub use types::*;
pub use validation::{
    FieldErrors, LoginDraft, LoginInput, RegistrationDraft, RegistrationInput, ShippingAddress,
    ShippingDraft,
};
