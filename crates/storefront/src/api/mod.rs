//! Client for the remote e-commerce REST API.
//!
//! # Architecture
//!
//! - One method per remote operation on [`EcommerceClient`]
//! - The API is the source of truth: no local sync, no response caching
//! - Privileged requests carry the visitor's token in the `token` header
//!
//! # Example
//!
//! ```rust,ignore
//! use freshcart_storefront::api::EcommerceClient;
//!
//! let client = EcommerceClient::new(&config.api);
//!
//! let page = client.list_products(1).await?;
//! let cart = client.add_to_cart(&token, &page.products[0].id).await?;
//! ```

mod client;
pub mod types;

pub use client::EcommerceClient;
pub use types::*;

use std::fmt::Write as _;

use serde::Deserialize;
use thiserror::Error;

/// Fallback text when neither the server nor the transport gave a reason.
pub const GENERIC_FAILURE: &str = "Something went wrong";

/// Errors that can occur when talking to the e-commerce API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not the JSON shape we expected.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The API answered 404.
    #[error("Not found: {}", .0.summary())]
    NotFound(ErrorBody),

    /// The API answered 401 (missing, invalid or expired token).
    #[error("Unauthorized: {}", .0.summary())]
    Unauthorized(ErrorBody),

    /// Any other non-success status.
    #[error("HTTP {status}: {}", body.summary())]
    Status {
        /// HTTP status code.
        status: u16,
        /// Decoded error payload.
        body: ErrorBody,
    },

    /// An endpoint URL could not be built from the configured base.
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

impl ApiError {
    /// Build the error for a non-success response.
    #[must_use]
    pub fn from_status(status: u16, body: ErrorBody) -> Self {
        match status {
            404 => Self::NotFound(body),
            401 => Self::Unauthorized(body),
            _ => Self::Status { status, body },
        }
    }

    /// HTTP status code, when the server answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound(_) => Some(404),
            Self::Unauthorized(_) => Some(401),
            Self::Status { status, .. } => Some(*status),
            Self::Http(_) | Self::Parse(_) | Self::InvalidEndpoint(_) => None,
        }
    }

    /// Whether the API reported the resource as missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// The decoded error payload, if the server sent one.
    #[must_use]
    pub const fn body(&self) -> Option<&ErrorBody> {
        match self {
            Self::NotFound(body) | Self::Unauthorized(body) | Self::Status { body, .. } => {
                Some(body)
            }
            Self::Http(_) | Self::Parse(_) | Self::InvalidEndpoint(_) => None,
        }
    }

    /// Short reason shown in cart notices.
    ///
    /// The server's `message`, else its `errors.msg`, else the transport
    /// error text, else [`GENERIC_FAILURE`].
    #[must_use]
    pub fn user_message(&self) -> String {
        if let Some(reason) = self.body().and_then(ErrorBody::reason) {
            return reason.to_string();
        }
        match self {
            Self::Http(e) => e.to_string(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }

    /// Multi-line diagnosis shown on the login page.
    ///
    /// `"<message> (Status code: N)"` followed by a `Details:` block listing
    /// each entry of the server's `errors` object.
    #[must_use]
    pub fn detailed_message(&self) -> String {
        let mut out = String::new();
        if let Some(message) = self.body().and_then(|b| b.message.as_deref()) {
            out.push_str(message);
        }
        if let Some(status) = self.status() {
            let _ = write!(out, " (Status code: {status})");
        }
        let details = self.body().map(ErrorBody::details).unwrap_or_default();
        if !details.is_empty() {
            out.push_str("\nDetails:\n");
            for (field, text) in details {
                let _ = writeln!(out, "- {field}: {text}");
            }
        }

        if out.is_empty() {
            return match self {
                Self::Http(e) => e.to_string(),
                _ => format!("{GENERIC_FAILURE}. Please try again."),
            };
        }
        out.trim_start().to_string()
    }

    /// One-line diagnosis shown on the registration page:
    /// `"<message> (Status: N)"`.
    #[must_use]
    pub fn status_message(&self) -> String {
        match (self.status(), self.body()) {
            (Some(status), Some(body)) => {
                let message = body
                    .message
                    .as_deref()
                    .map_or_else(|| format!("{GENERIC_FAILURE}. Please try again."), String::from);
                format!("{message} (Status: {status})")
            }
            _ => match self {
                Self::Http(e) => e.to_string(),
                _ => format!("{GENERIC_FAILURE}. Please try again."),
            },
        }
    }
}

/// Error payload returned by the API on failure.
///
/// Two shapes occur in practice: `{statusMsg, message}` and
/// `{message: "fail", errors: {value, msg, param, location}}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message.
    #[serde(default)]
    pub message: Option<String>,
    /// Coarse status word (`"fail"`, `"error"`).
    #[serde(default, rename = "statusMsg")]
    pub status_msg: Option<String>,
    /// Validation failure details.
    #[serde(default)]
    pub errors: Option<serde_json::Value>,
}

impl ErrorBody {
    /// Longest raw (non-JSON) body kept as a message.
    const MAX_RAW_LEN: usize = 200;

    /// Decode an error body, keeping a plain-text body as the message.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        if let Ok(body) = serde_json::from_str::<Self>(text) {
            return body;
        }
        let trimmed = text.trim();
        Self {
            message: (!trimmed.is_empty())
                .then(|| trimmed.chars().take(Self::MAX_RAW_LEN).collect()),
            ..Self::default()
        }
    }

    /// `message`, else `errors.msg`.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.message
            .as_deref()
            .filter(|m| !m.is_empty())
            .or_else(|| {
                self.errors
                    .as_ref()
                    .and_then(|e| e.get("msg"))
                    .and_then(serde_json::Value::as_str)
            })
    }

    /// Entries of the `errors` object as `(field, text)` pairs.
    ///
    /// Array values are joined with `", "`.
    #[must_use]
    pub fn details(&self) -> Vec<(String, String)> {
        let Some(serde_json::Value::Object(map)) = &self.errors else {
            return Vec::new();
        };
        map.iter()
            .map(|(field, value)| {
                let text = match value {
                    serde_json::Value::String(s) => s.clone(),
                    serde_json::Value::Array(items) => items
                        .iter()
                        .map(|item| match item {
                            serde_json::Value::String(s) => s.clone(),
                            other => other.to_string(),
                        })
                        .collect::<Vec<_>>()
                        .join(", "),
                    other => other.to_string(),
                };
                (field.clone(), text)
            })
            .collect()
    }

    fn summary(&self) -> &str {
        self.reason().unwrap_or("(no message)")
    }
}
