//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Sign-in, registration and sign-out against the remote API
//! - `cart` - Cart store (session mirror of the remote cart)
//! - `checkout` - Shipping form submission and order placement
//! - `notices` - One-shot messages shown on the next page

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod notices;

pub use auth::{AuthError, AuthService};
pub use cart::{CartLocks, CartOutcome, CartStore};
pub use checkout::{CheckoutState, SubmitOutcome};
pub use notices::{Notice, NoticeLevel};
