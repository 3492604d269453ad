//! Raw JSON payloads of the e-commerce API.
//!
//! Field names follow the API's camelCase and `_id` conventions. Everything
//! the storefront can live without is `#[serde(default)]` so a sparse
//! response degrades instead of failing to parse.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// Requests
// =============================================================================

#[derive(Debug, Serialize)]
pub struct SignInRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct SignUpRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    #[serde(rename = "rePassword")]
    pub re_password: &'a str,
    pub phone: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest<'a> {
    pub product_id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct UpdateQuantityRequest {
    pub count: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest<'a> {
    pub shipping_address: &'a freshcart_core::ShippingAddress,
}

// =============================================================================
// Catalog
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ProductListResponse {
    #[serde(default)]
    pub metadata: Option<MetadataDto>,
    #[serde(default)]
    pub data: Vec<ProductDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataDto {
    #[serde(default)]
    pub current_page: Option<u32>,
    #[serde(default)]
    pub number_of_pages: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ProductDetailResponse {
    pub data: ProductDto,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub price_after_discount: Option<Decimal>,
    #[serde(default)]
    pub image_cover: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub ratings_average: f64,
    #[serde(default)]
    pub ratings_quantity: u32,
    #[serde(default)]
    pub category: Option<CategoryDto>,
    #[serde(default)]
    pub brand: Option<BrandDto>,
}

#[derive(Debug, Deserialize)]
pub struct CategoryDto {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BrandDto {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
}

// =============================================================================
// Auth
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub token: String,
    pub user: AuthUserDto,
}

#[derive(Debug, Deserialize)]
pub struct AuthUserDto {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
}

// =============================================================================
// Cart
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    #[serde(default)]
    pub num_of_cart_items: Option<u32>,
    pub data: CartDto,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartDto {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub cart_owner: String,
    #[serde(default)]
    pub products: Vec<CartItemDto>,
    #[serde(default)]
    pub total_cart_price: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct CartItemDto {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub price: Decimal,
    pub product: CartItemProductDto,
}

/// Populated product object or a bare product id.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CartItemProductDto {
    Populated(CartProductDto),
    Reference(String),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartProductDto {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image_cover: String,
    #[serde(default)]
    pub category: Option<CategoryDto>,
}

#[derive(Debug, Deserialize)]
pub struct ClearCartResponse {
    #[serde(default)]
    pub message: Option<String>,
}

// =============================================================================
// Orders
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateOrderResponse {
    pub data: OrderDto,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDto {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub cart_items: Vec<CartItemDto>,
    #[serde(default)]
    pub total_order_price: Decimal,
    #[serde(default)]
    pub payment_method_type: Option<freshcart_core::PaymentMethod>,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default)]
    pub is_delivered: bool,
    #[serde(default)]
    pub shipping_address: Option<OrderAddressDto>,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct OrderAddressDto {
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}
