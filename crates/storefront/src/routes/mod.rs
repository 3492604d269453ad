//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                        - Liveness check
//! GET  /health/ready                  - Readiness check (session database)
//!
//! # Catalog (requires auth)
//! GET  /                              - Home page (hero + recent products)
//! GET  /products?page=N               - Product listing
//! GET  /productdetails/{id}/{category} - Product detail + related products
//! GET  /about                         - About page
//!
//! # Cart (requires auth)
//! GET  /cart                          - Cart page
//! POST /cart/add                      - Add one unit
//! POST /cart/update                   - Set quantity (< 1 is ignored)
//! POST /cart/remove                   - Remove a product
//! POST /cart/clear                    - Delete the cart
//!
//! # Checkout (requires auth)
//! GET  /checkout                      - Shipping form + cart summary
//! POST /checkout                      - Place a cash order
//! GET  /allorders                     - Order history
//!
//! # Auth
//! GET  /login, POST /login            - Sign in
//! GET  /register, POST /register      - Create an account
//! POST /logout                        - Destroy the session
//! ```
//!
//! Every other path renders the not-found page.

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod home;
pub mod orders;
pub mod pages;
pub mod products;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use tower_sessions::Session;

use crate::api::Product;
use crate::services::cart::stored_count;
use crate::services::{Notice, auth::current_auth, notices};
use crate::state::AppState;

// =============================================================================
// Shared View Types
// =============================================================================

/// Layout data every page needs: navigation state and pending notices.
///
/// Load it last in a handler, after any operation that may queue a notice.
#[derive(Clone, Debug, Default)]
pub struct PageContext {
    /// Display name of the signed-in visitor.
    pub user_name: Option<String>,
    /// Navigation badge count.
    pub cart_count: u32,
    /// Notices to show once.
    pub notices: Vec<Notice>,
}

impl PageContext {
    /// Read navigation state and drain pending notices.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be read or written.
    pub async fn load(session: &Session) -> Result<Self, tower_sessions::session::Error> {
        let auth = current_auth(session).await?;
        let cart_count = if auth.is_some() {
            stored_count(session).await?
        } else {
            0
        };

        Ok(Self {
            user_name: auth.map(|a| a.name),
            cart_count,
            notices: notices::drain(session).await?,
        })
    }

    #[must_use]
    pub const fn signed_in(&self) -> bool {
        self.user_name.is_some()
    }
}

/// Product card display data for templates.
#[derive(Clone, Debug)]
pub struct ProductCardView {
    pub id: String,
    pub title: String,
    pub short_title: String,
    pub category: String,
    pub price: String,
    pub original_price: Option<String>,
    pub image: String,
    pub rating: f64,
    pub href: String,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            title: product.title.clone(),
            short_title: product.short_title(),
            category: product.category_name().to_string(),
            price: product.effective_price().to_string(),
            original_price: product
                .price_after_discount
                .map(|_| product.price.to_string()),
            image: product.image_cover.clone(),
            rating: product.ratings_average,
            href: product_href(product),
        }
    }
}

/// Link to a product's detail page.
#[must_use]
pub fn product_href(product: &Product) -> String {
    format!(
        "/productdetails/{}/{}",
        urlencoding::encode(product.id.as_str()),
        urlencoding::encode(product.category_name())
    )
}

/// Accept only same-site absolute paths as redirect targets.
#[must_use]
pub fn safe_return_path(candidate: Option<&str>, fallback: &'static str) -> String {
    match candidate {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path.to_string()
        }
        _ => fallback.to_string(),
    }
}

// =============================================================================
// Routers
// =============================================================================

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the health check routes router.
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/products", get(products::index))
        .route("/productdetails/{id}/{category}", get(products::show))
        .nest("/cart", cart_routes())
        .route(
            "/checkout",
            get(checkout::show).post(checkout::submit),
        )
        .route("/allorders", get(orders::index))
        .route("/about", get(pages::about))
        .merge(auth_routes())
        .merge(health_routes())
        .fallback(pages::not_found)
}

// =============================================================================
// Health
// =============================================================================

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies session database connectivity before returning OK.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Session database not ready");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
