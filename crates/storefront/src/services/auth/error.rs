//! Authentication error types.

use freshcart_core::FieldErrors;
use thiserror::Error;

use crate::api::ApiError;

/// Errors that can occur during sign-in and registration.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The submitted form failed local validation; nothing was sent.
    #[error("invalid form input ({} field(s))", .0.len())]
    Invalid(FieldErrors),

    /// The API refused the credentials or the request failed.
    #[error("rejected by API: {0}")]
    Rejected(#[from] ApiError),

    /// The session store could not be read or written.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}
