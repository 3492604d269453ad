//! Authentication service.
//!
//! Holds the visitor's token in the session. The token is written on
//! successful sign-in or sign-up and removed, with the rest of the session,
//! on sign-out. Expiry is never checked locally: an expired token shows up as
//! a 401 from the API.

mod error;

pub use error::AuthError;

use freshcart_core::{LoginDraft, RegistrationDraft};
use tower_sessions::Session;
use tracing::{info, instrument, warn};

use crate::api::EcommerceClient;
use crate::error::{clear_sentry_user, set_sentry_user};
use crate::models::{SessionAuth, session_keys};
use crate::services::cart;

/// Authentication service.
///
/// Handles sign-in, registration and sign-out for one visitor session.
pub struct AuthService<'a> {
    client: &'a EcommerceClient,
    session: &'a Session,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(client: &'a EcommerceClient, session: &'a Session) -> Self {
        Self { client, session }
    }

    /// The signed-in state, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be read.
    pub async fn current(&self) -> Result<Option<SessionAuth>, tower_sessions::session::Error> {
        current_auth(self.session).await
    }

    /// Validate the login form and exchange it for a token.
    ///
    /// On failure the stored token is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Invalid` without contacting the API when the form
    /// is invalid, `AuthError::Rejected` when the API refuses.
    #[instrument(skip(self, draft))]
    pub async fn sign_in(&self, draft: &LoginDraft) -> Result<SessionAuth, AuthError> {
        let input = draft.validate().map_err(AuthError::Invalid)?;

        let grant = self.client.sign_in(&input).await.inspect_err(|e| {
            warn!(error = %e, "Sign-in rejected");
        })?;

        let auth = SessionAuth::from(grant);
        self.store(&auth).await?;
        info!("Visitor signed in");
        Ok(auth)
    }

    /// Validate the registration form and create the account.
    ///
    /// The returned token is stored right away.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Invalid` without contacting the API when the form
    /// is invalid, `AuthError::Rejected` when the API refuses.
    #[instrument(skip(self, draft))]
    pub async fn register(&self, draft: &RegistrationDraft) -> Result<SessionAuth, AuthError> {
        let input = draft.validate().map_err(AuthError::Invalid)?;

        let grant = self.client.sign_up(&input).await.inspect_err(|e| {
            warn!(error = %e, "Registration rejected");
        })?;

        let auth = SessionAuth::from(grant);
        self.store(&auth).await?;
        info!("Visitor registered");
        Ok(auth)
    }

    /// Destroy the whole visitor session: token, cart id, user id, count
    /// and snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot delete the session.
    #[instrument(skip(self))]
    pub async fn sign_out(&self) -> Result<(), tower_sessions::session::Error> {
        self.session.flush().await?;
        clear_sentry_user();
        Ok(())
    }

    async fn store(&self, auth: &SessionAuth) -> Result<(), tower_sessions::session::Error> {
        // New identity, new session id
        self.session.cycle_id().await?;
        cart::clear_cart_state(self.session).await?;
        self.session.insert(session_keys::AUTH, auth).await?;
        set_sentry_user(&auth.email, Some(&auth.name));
        Ok(())
    }
}

/// Read the signed-in state from a session.
///
/// # Errors
///
/// Returns an error if the session cannot be read.
pub async fn current_auth(
    session: &Session,
) -> Result<Option<SessionAuth>, tower_sessions::session::Error> {
    session.get(session_keys::AUTH).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use freshcart_core::{CartId, UserId};

    use super::*;
    use crate::api::AuthToken;
    use crate::config::ApiConfig;

    async fn setup() -> (MockServer, EcommerceClient, Session) {
        let server = MockServer::start().await;
        let config = ApiConfig::new(&format!("{}/api/v1", server.uri())).unwrap();
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        (server, EcommerceClient::new(&config), session)
    }

    fn login(email: &str, password: &str) -> LoginDraft {
        LoginDraft {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_sign_in_success_stores_token() {
        let (server, client, session) = setup().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/signin"))
            .and(body_json(serde_json::json!({
                "email": "mona@example.com",
                "password": "Secret123"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "message": "success",
                "user": {"name": "Mona", "email": "mona@example.com", "role": "user"},
                "token": "tok-abc"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let auth = AuthService::new(&client, &session);
        auth.sign_in(&login("mona@example.com", "Secret123"))
            .await
            .unwrap();

        let stored = auth.current().await.unwrap().unwrap();
        assert_eq!(stored.token, AuthToken::new("tok-abc"));
        assert_eq!(stored.name, "Mona");
    }

    #[tokio::test]
    async fn test_sign_in_failure_leaves_token_unchanged() {
        let (server, client, session) = setup().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/signin"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "statusMsg": "fail",
                "message": "Incorrect email or password"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let auth = AuthService::new(&client, &session);
        let err = auth
            .sign_in(&login("mona@example.com", "Wrong123"))
            .await
            .unwrap_err();

        let AuthError::Rejected(api) = err else {
            panic!("expected API rejection");
        };
        assert_eq!(
            api.detailed_message(),
            "Incorrect email or password (Status code: 401)"
        );
        assert!(auth.current().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalid_login_form_sends_nothing() {
        let (server, client, session) = setup().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = AuthService::new(&client, &session)
            .sign_in(&login("not-an-email", "lowercase1"))
            .await
            .unwrap_err();
        let AuthError::Invalid(fields) = err else {
            panic!("expected validation failure");
        };
        assert_eq!(fields.get("email"), Some("Email is invalid"));
        assert!(fields.get("password").is_some());
    }

    #[tokio::test]
    async fn test_register_sends_re_password() {
        let (server, client, session) = setup().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/signup"))
            .and(body_json(serde_json::json!({
                "name": "Mona",
                "email": "mona@example.com",
                "password": "Secret123",
                "rePassword": "Secret123",
                "phone": "01012345678"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "message": "success",
                "user": {"name": "Mona", "email": "mona@example.com", "role": "user"},
                "token": "tok-new"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let draft = RegistrationDraft {
            name: "Mona".to_string(),
            email: "mona@example.com".to_string(),
            phone: "01012345678".to_string(),
            password: "Secret123".to_string(),
            re_password: "Secret123".to_string(),
        };
        let auth = AuthService::new(&client, &session);
        auth.register(&draft).await.unwrap();
        assert!(auth.current().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_sign_out_clears_everything() {
        let (_server, client, session) = setup().await;
        session
            .insert(session_keys::CART_COUNT, 3_u32)
            .await
            .unwrap();
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

        let auth = AuthService::new(&client, &session);
        auth.sign_out().await.unwrap();

        assert!(auth.current().await.unwrap().is_none());
        assert!(
            session
                .get::<u32>(session_keys::CART_COUNT)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_sign_in_drops_previous_visitor_cart_state() {
        let (server, client, session) = setup().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/signin"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "message": "success",
                "user": {"name": "Bob", "email": "bob@example.com", "role": "user"},
                "token": "tok-bob"
            })))
            .expect(1)
            .mount(&server)
            .await;
        session
            .insert(session_keys::USER_ID, UserId::new("user-amy"))
            .await
            .unwrap();
        session
            .insert(session_keys::CART_ID, CartId::new("cart-amy"))
            .await
            .unwrap();
        session
            .insert(session_keys::CART_COUNT, 4_u32)
            .await
            .unwrap();

        let auth = AuthService::new(&client, &session);
        auth.sign_in(&login("bob@example.com", "Secret123"))
            .await
            .unwrap();

        assert_eq!(auth.current().await.unwrap().unwrap().name, "Bob");
        assert!(cart::stored_user_id(&session).await.unwrap().is_none());
        assert!(cart::stored_cart_id(&session).await.unwrap().is_none());
        assert_eq!(cart::stored_count(&session).await.unwrap(), 0);
    }
}
