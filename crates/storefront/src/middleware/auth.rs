//! Route guard.
//!
//! Protected pages take a [`RequireAuth`] argument. The check is token
//! presence only: no expiry check, no silent refresh.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::SessionAuth;
use crate::services::auth::current_auth;

/// Where visitors without a token are sent.
pub const LOGIN_PATH: &str = "/login";

/// Extractor that requires a signed-in visitor.
///
/// If the visitor has no token, returns a redirect to the login page.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(auth): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", auth.name)
/// }
/// ```
pub struct RequireAuth(pub SessionAuth);

/// Error returned when a protected page is requested without a token.
#[derive(Debug)]
pub enum AuthRejection {
    /// Redirect to login page.
    RedirectToLogin,
    /// The session layer is missing or the store failed.
    SessionUnavailable,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            Self::SessionUnavailable => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AuthRejection::SessionUnavailable)?;

        let auth = current_auth(session).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to read session");
            AuthRejection::SessionUnavailable
        })?;

        auth.map(Self).ok_or(AuthRejection::RedirectToLogin)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::http::{Request, header};
    use tower_sessions::MemoryStore;

    use super::*;
    use crate::api::AuthToken;
    use crate::models::session_keys;

    fn parts_with(session: Option<Session>) -> Parts {
        let mut request = Request::builder().uri("/cart").body(()).unwrap();
        if let Some(session) = session {
            request.extensions_mut().insert(session);
        }
        request.into_parts().0
    }

    #[tokio::test]
    async fn test_redirects_without_token() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        let mut parts = parts_with(Some(session));

        let rejection = RequireAuth::from_request_parts(&mut parts, &())
            .await
            .err()
            .unwrap();
        let response = rejection.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/login");
    }

    #[tokio::test]
    async fn test_passes_with_token() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        session
            .insert(
                session_keys::AUTH,
                SessionAuth {
                    token: AuthToken::new("tok"),
                    name: "Mona".to_string(),
                    email: "mona@example.com".to_string(),
                },
            )
            .await
            .unwrap();
        let mut parts = parts_with(Some(session));

        let RequireAuth(auth) = RequireAuth::from_request_parts(&mut parts, &())
            .await
            .ok()
            .unwrap();
        assert_eq!(auth.name, "Mona");
    }

    #[tokio::test]
    async fn test_missing_session_layer() {
        let mut parts = parts_with(None);
        let rejection = RequireAuth::from_request_parts(&mut parts, &())
            .await
            .err()
            .unwrap();
        assert!(matches!(rejection, AuthRejection::SessionUnavailable));
    }
}
