//! Session-related types.
//!
//! Everything the storefront remembers about a visitor lives in the session.
//! There is no schema versioning: a value that no longer deserializes is
//! treated as absent.

use serde::{Deserialize, Serialize};

use crate::api::{AuthGrant, AuthToken};

/// Session-stored sign-in state.
///
/// `Debug` redacts the token through [`AuthToken`]'s own impl.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionAuth {
    /// Credential attached to privileged API requests.
    pub token: AuthToken,
    /// Display name shown in the navigation bar.
    pub name: String,
    /// Account email address.
    pub email: String,
}

impl From<AuthGrant> for SessionAuth {
    fn from(grant: AuthGrant) -> Self {
        Self {
            token: grant.token,
            name: grant.user.name,
            email: grant.user.email,
        }
    }
}

/// Session keys for visitor state.
pub mod keys {
    /// Key for the sign-in state ([`super::SessionAuth`]).
    pub const AUTH: &str = "auth";

    /// Key for the id of the visitor's server-side cart.
    pub const CART_ID: &str = "cart_id";

    /// Key for the visitor's user id (the cart owner), used for order history.
    pub const USER_ID: &str = "user_id";

    /// Key for the navigation badge count.
    pub const CART_COUNT: &str = "cart_count";

    /// Key for the last cart snapshot reported by the server.
    pub const CART_SNAPSHOT: &str = "cart_snapshot";

    /// Key for pending one-shot notices.
    pub const NOTICES: &str = "notices";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::AuthUser;

    #[test]
    fn test_from_grant() {
        let auth = SessionAuth::from(AuthGrant {
            token: AuthToken::new("tok-secret"),
            user: AuthUser {
                name: "Mona".to_string(),
                email: "mona@example.com".to_string(),
                role: Some("user".to_string()),
            },
        });
        assert_eq!(auth.name, "Mona");
        assert!(!format!("{auth:?}").contains("tok-secret"));
    }
}
