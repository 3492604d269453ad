//! E-commerce REST API client implementation.
//!
//! Uses `reqwest` 0.13 for HTTP with JSON bodies. Nothing is cached: every
//! page fetches what it needs, and cart state always comes from the latest
//! server response.

mod conversions;
mod wire;

use std::sync::Arc;

use freshcart_core::{
    CartId, LoginInput, ProductId, RegistrationInput, ShippingAddress, UserId,
};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::api::types::{AuthGrant, AuthToken, Cart, Order, Product, ProductPage};
use crate::api::{ApiError, ErrorBody};
use crate::config::ApiConfig;

use conversions::{convert_auth, convert_cart, convert_order, convert_product, convert_product_page};
use wire::{
    AddToCartRequest, AuthResponse, CartResponse, ClearCartResponse, CreateOrderRequest,
    CreateOrderResponse, OrderDto, ProductDetailResponse, ProductListResponse, SignInRequest,
    SignUpRequest, UpdateQuantityRequest,
};

/// Header carrying the visitor's token on privileged requests.
const TOKEN_HEADER: &str = "token";

/// Longest response body excerpt written to logs.
const LOG_BODY_LIMIT: usize = 500;

// =============================================================================
// EcommerceClient
// =============================================================================

/// Client for the e-commerce REST API.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct EcommerceClient {
    inner: Arc<EcommerceClientInner>,
}

struct EcommerceClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl EcommerceClient {
    /// Create a new API client.
    #[must_use]
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            inner: Arc::new(EcommerceClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
            }),
        }
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Append path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidEndpoint(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request and decode a JSON success body.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            let body = ErrorBody::from_text(&response_text);
            if status.is_server_error() {
                tracing::error!(
                    status = %status,
                    body = %truncate(&response_text),
                    "E-commerce API returned server error"
                );
            } else {
                debug!(
                    status = %status,
                    body = %truncate(&response_text),
                    "E-commerce API returned non-success status"
                );
            }
            return Err(ApiError::from_status(status.as_u16(), body));
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %truncate(&response_text),
                "Failed to parse e-commerce API response"
            );
            ApiError::Parse(e)
        })
    }

    fn get(&self, url: Url) -> reqwest::RequestBuilder {
        self.inner.client.get(url)
    }

    fn authed(
        &self,
        method: reqwest::Method,
        url: Url,
        token: &AuthToken,
    ) -> reqwest::RequestBuilder {
        self.inner
            .client
            .request(method, url)
            .header(TOKEN_HEADER, token.expose())
    }

    // =========================================================================
    // Catalog Methods
    // =========================================================================

    /// Get one page of the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self, page: u32) -> Result<ProductPage, ApiError> {
        let page = page.max(1);
        let mut url = self.endpoint(&["products"])?;
        url.query_pairs_mut().append_pair("page", &page.to_string());

        let data: ProductListResponse = self.execute(self.get(url)).await?;
        Ok(convert_product_page(data, page))
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for unknown ids, or another error if the
    /// API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, ApiError> {
        let url = self.endpoint(&["products", id.as_str()])?;
        let data: ProductDetailResponse = self.execute(self.get(url)).await?;
        Ok(convert_product(data.data))
    }

    // =========================================================================
    // Auth Methods
    // =========================================================================

    /// Create an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the account exists, the input is rejected, or the
    /// request fails.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn sign_up(&self, input: &RegistrationInput) -> Result<AuthGrant, ApiError> {
        let url = self.endpoint(&["auth", "signup"])?;
        let body = SignUpRequest {
            name: &input.name,
            email: input.email.as_str(),
            password: input.password.expose(),
            re_password: input.password.expose(),
            phone: input.phone.as_str(),
        };

        let data: AuthResponse = self
            .execute(self.inner.client.post(url).json(&body))
            .await?;
        debug!(message = ?data.message, "Sign-up accepted");
        Ok(convert_auth(data))
    }

    /// Exchange credentials for a token.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` for wrong credentials, or another
    /// error if the request fails.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn sign_in(&self, input: &LoginInput) -> Result<AuthGrant, ApiError> {
        let url = self.endpoint(&["auth", "signin"])?;
        let body = SignInRequest {
            email: input.email.as_str(),
            password: input.password.expose(),
        };

        let data: AuthResponse = self
            .execute(self.inner.client.post(url).json(&body))
            .await?;
        debug!(message = ?data.message, "Sign-in accepted");
        Ok(convert_auth(data))
    }

    // =========================================================================
    // Cart Methods
    // =========================================================================

    /// Get the visitor's cart.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` when the visitor has no cart yet, or
    /// another error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn get_cart(&self, token: &AuthToken) -> Result<Cart, ApiError> {
        let url = self.endpoint(&["cart"])?;
        let data: CartResponse = self
            .execute(self.authed(reqwest::Method::GET, url, token))
            .await?;
        Ok(convert_cart(data))
    }

    /// Add one unit of a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(product_id = %product_id))]
    pub async fn add_to_cart(
        &self,
        token: &AuthToken,
        product_id: &ProductId,
    ) -> Result<Cart, ApiError> {
        let url = self.endpoint(&["cart"])?;
        let body = AddToCartRequest {
            product_id: product_id.as_str(),
        };
        let data: CartResponse = self
            .execute(self.authed(reqwest::Method::POST, url, token).json(&body))
            .await?;
        Ok(convert_cart(data))
    }

    /// Set the quantity of a product already in the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(product_id = %product_id))]
    pub async fn update_cart_item(
        &self,
        token: &AuthToken,
        product_id: &ProductId,
        count: u32,
    ) -> Result<Cart, ApiError> {
        let url = self.endpoint(&["cart", product_id.as_str()])?;
        let data: CartResponse = self
            .execute(
                self.authed(reqwest::Method::PUT, url, token)
                    .json(&UpdateQuantityRequest { count }),
            )
            .await?;
        Ok(convert_cart(data))
    }

    /// Remove a product from the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(product_id = %product_id))]
    pub async fn remove_cart_item(
        &self,
        token: &AuthToken,
        product_id: &ProductId,
    ) -> Result<Cart, ApiError> {
        let url = self.endpoint(&["cart", product_id.as_str()])?;
        let data: CartResponse = self
            .execute(self.authed(reqwest::Method::DELETE, url, token))
            .await?;
        Ok(convert_cart(data))
    }

    /// Delete the whole cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn clear_cart(&self, token: &AuthToken) -> Result<(), ApiError> {
        let url = self.endpoint(&["cart"])?;
        let data: ClearCartResponse = self
            .execute(self.authed(reqwest::Method::DELETE, url, token))
            .await?;
        debug!(message = ?data.message, "Cart cleared");
        Ok(())
    }

    // =========================================================================
    // Order Methods
    // =========================================================================

    /// Turn a cart into a cash-on-delivery order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token, address), fields(cart_id = %cart_id))]
    pub async fn create_cash_order(
        &self,
        token: &AuthToken,
        cart_id: &CartId,
        address: &ShippingAddress,
    ) -> Result<Order, ApiError> {
        let url = self.endpoint(&["orders", cart_id.as_str()])?;
        let body = CreateOrderRequest {
            shipping_address: address,
        };
        let data: CreateOrderResponse = self
            .execute(self.authed(reqwest::Method::POST, url, token).json(&body))
            .await?;
        Ok(convert_order(data.data))
    }

    /// List a user's orders. The endpoint is public.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn list_user_orders(&self, user_id: &UserId) -> Result<Vec<Order>, ApiError> {
        let url = self.endpoint(&["orders", "user", user_id.as_str()])?;
        let data: Vec<OrderDto> = self.execute(self.get(url)).await?;
        Ok(data.into_iter().map(convert_order).collect())
    }
}

fn truncate(text: &str) -> String {
    text.chars().take(LOG_BODY_LIMIT).collect()
}
