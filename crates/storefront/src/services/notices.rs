//! One-shot visitor notices.
//!
//! A notice is pushed into the session by whatever produced it (a cart
//! mutation, sign-up) and rendered, then discarded, by the next page the
//! visitor sees.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::models::session_keys;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

impl NoticeLevel {
    /// CSS modifier class for the notice banner.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Success => "notice--success",
            Self::Info => "notice--info",
            Self::Error => "notice--error",
        }
    }
}

/// A message shown once to the visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Queue a notice for the next rendered page.
///
/// # Errors
///
/// Returns an error if the session cannot be read or written.
pub async fn push(session: &Session, notice: Notice) -> Result<(), tower_sessions::session::Error> {
    let mut pending: Vec<Notice> = session
        .get(session_keys::NOTICES)
        .await?
        .unwrap_or_default();
    pending.push(notice);
    session.insert(session_keys::NOTICES, pending).await
}

/// Take every pending notice, leaving none behind.
///
/// The session is only written when something was pending.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn drain(session: &Session) -> Result<Vec<Notice>, tower_sessions::session::Error> {
    let Some(pending) = session.get::<Vec<Notice>>(session_keys::NOTICES).await? else {
        return Ok(Vec::new());
    };
    session.remove_value(session_keys::NOTICES).await?;
    Ok(pending)
}
