//! Domain models for storefront.

pub mod session;

pub use session::{SessionAuth, keys as session_keys};
