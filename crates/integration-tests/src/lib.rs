//! Integration test harness for the FreshCart storefront.
//!
//! [`TestApp`] builds the real router around an in-memory session store and
//! points the API client at a `wiremock` server. Requests go through
//! `tower::ServiceExt::oneshot`; the session cookie is carried between
//! requests by hand.
//!
//! ```rust,ignore
//! let app = TestApp::spawn().await;
//! app.mock_sign_in().await;
//! let cookie = app.sign_in().await;
//! let page = app.get("/cart", Some(&cookie)).await;
//! assert_eq!(page.status, StatusCode::OK);
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::net::{IpAddr, Ipv4Addr};

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use freshcart_storefront::config::{ApiConfig, StorefrontConfig};
use freshcart_storefront::middleware::create_session_layer;
use freshcart_storefront::state::AppState;
use http_body_util::BodyExt;
use secrecy::SecretString;
use serde_json::json;
use sqlx::SqlitePool;
use tower::ServiceExt;
use tower_sessions::MemoryStore;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub use wiremock;

/// Password accepted by the login form's rules.
pub const PASSWORD: &str = "Secret123";

/// Email used for the test account.
pub const EMAIL: &str = "mona@example.com";

/// A response with its body collected.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// Redirect target, if any.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    /// `name=value` of the session cookie set by this response, if any.
    #[must_use]
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with("freshcart_session="))
            .and_then(|v| v.split(';').next())
            .map(String::from)
    }
}

/// The storefront wired to a mock API.
pub struct TestApp {
    pub router: Router,
    pub api: MockServer,
}

impl TestApp {
    /// Build the application against a fresh mock API.
    pub async fn spawn() -> Self {
        let api = MockServer::start().await;
        let config = StorefrontConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            base_url: "http://localhost".to_string(),
            session_database_url: SecretString::from("sqlite::memory:"),
            api: ApiConfig::new(&format!("{}/api/v1", api.uri())).unwrap(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 0.0,
            sentry_traces_sample_rate: 0.0,
        };

        // Only the readiness probe touches the pool.
        let pool = SqlitePool::connect_lazy("sqlite::memory:").unwrap();
        let session_layer = create_session_layer(MemoryStore::default(), &config);
        let router = freshcart_storefront::app(AppState::new(config, pool), session_layer);

        Self { router, api }
    }

    /// Send a request and collect the response.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        form: Option<&[(&str, &str)]>,
        cookie: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let body = match form {
            Some(fields) => {
                builder = builder.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
                Body::from(encode_form(fields))
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        self.send(Method::GET, uri, None, cookie).await
    }

    pub async fn post(
        &self,
        uri: &str,
        form: &[(&str, &str)],
        cookie: Option<&str>,
    ) -> TestResponse {
        self.send(Method::POST, uri, Some(form), cookie).await
    }

    /// Accept [`EMAIL`] / [`PASSWORD`] at `POST /auth/signin`.
    pub async fn mock_sign_in(&self) {
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/signin"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "success",
                "user": {"name": "Mona", "email": EMAIL, "role": "user"},
                "token": "test-token"
            })))
            .mount(&self.api)
            .await;
    }

    /// Serve `GET /cart` with a one-line cart of `count` items.
    pub async fn mock_cart(&self, count: u32) {
        Mock::given(method("GET"))
            .and(path("/api/v1/cart"))
            .respond_with(ResponseTemplate::new(200).set_body_json(cart_body(count)))
            .mount(&self.api)
            .await;
    }

    /// Sign in through the login form and return the session cookie.
    ///
    /// Expects [`Self::mock_sign_in`] and a cart mock to be mounted.
    pub async fn sign_in(&self) -> String {
        let response = self
            .post("/login", &[("email", EMAIL), ("password", PASSWORD)], None)
            .await;
        assert_eq!(response.status, StatusCode::SEE_OTHER, "{}", response.body);
        response.session_cookie().unwrap()
    }
}

/// A cart response body as the API sends it.
#[must_use]
pub fn cart_body(count: u32) -> serde_json::Value {
    json!({
        "status": "success",
        "numOfCartItems": count,
        "cartId": "cart-1",
        "data": {
            "_id": "cart-1",
            "cartOwner": "user-1",
            "products": [{
                "count": count,
                "_id": "line-1",
                "price": 149,
                "product": {
                    "_id": "prod-1",
                    "title": "Woman Shawl Cotton",
                    "imageCover": "https://cdn.example/shawl.jpeg",
                    "category": {"_id": "cat-1", "name": "Women's Fashion", "slug": "women's-fashion"}
                }
            }],
            "totalCartPrice": 149 * count
        }
    })
}

fn encode_form(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}
