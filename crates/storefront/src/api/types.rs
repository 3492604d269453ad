//! Domain types for the e-commerce API.
//!
//! These types provide a clean, ergonomic API separate from the raw wire
//! payloads. Cart types are `Serialize` so the last snapshot can be mirrored
//! into the visitor's session.

use core::fmt;

use chrono::{DateTime, Utc};
use freshcart_core::{
    CartId, CartItemId, CategoryId, OrderId, OrderStatus, PaymentMethod, Price, ProductId, UserId,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// Catalog Types
// =============================================================================

/// Product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub image: Option<String>,
}

/// Product brand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub name: String,
    pub image: Option<String>,
}

/// A catalog product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    /// List price.
    pub price: Price,
    /// Discounted price, when a sale is running.
    pub price_after_discount: Option<Price>,
    /// Main image URL.
    pub image_cover: String,
    /// Gallery image URLs.
    pub images: Vec<String>,
    /// Average rating (0-5).
    pub ratings_average: f64,
    /// Number of ratings.
    pub ratings_quantity: u32,
    pub category: Option<Category>,
    pub brand: Option<Brand>,
}

impl Product {
    /// The title cut down to its first two words, as shown on grid cards.
    #[must_use]
    pub fn short_title(&self) -> String {
        short_title(&self.title)
    }

    /// The price a buyer pays today.
    #[must_use]
    pub fn effective_price(&self) -> Price {
        self.price_after_discount.unwrap_or(self.price)
    }

    /// Category name, or an empty string if the product is uncategorized.
    #[must_use]
    pub fn category_name(&self) -> &str {
        self.category.as_ref().map_or("", |c| c.name.as_str())
    }

    /// Whether the product belongs to the category with the given name.
    #[must_use]
    pub fn in_category(&self, name: &str) -> bool {
        self.category.as_ref().is_some_and(|c| c.name == name)
    }
}

/// First two whitespace-separated words of `title`.
#[must_use]
pub fn short_title(title: &str) -> String {
    title.split_whitespace().take(2).collect::<Vec<_>>().join(" ")
}

/// Pagination metadata of a product listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// 1-based current page.
    pub current_page: u32,
    /// Total number of pages (at least 1).
    pub number_of_pages: u32,
}

impl Pagination {
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.current_page < self.number_of_pages
    }

    #[must_use]
    pub const fn previous_page(&self) -> u32 {
        self.current_page.saturating_sub(1)
    }

    #[must_use]
    pub const fn next_page(&self) -> u32 {
        self.current_page.saturating_add(1)
    }
}

/// One page of the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub pagination: Pagination,
}

// =============================================================================
// Cart Types
// =============================================================================

/// Populated product data inside a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartProductSummary {
    pub id: ProductId,
    pub title: String,
    pub image_cover: String,
    pub category_name: Option<String>,
}

/// The product a cart line refers to.
///
/// `GET /cart` populates it; mutation responses carry only the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartProduct {
    Populated(CartProductSummary),
    Reference(ProductId),
}

impl CartProduct {
    /// Id of the referenced product.
    #[must_use]
    pub const fn id(&self) -> &ProductId {
        match self {
            Self::Populated(summary) => &summary.id,
            Self::Reference(id) => id,
        }
    }

    /// Populated details, if the server sent them.
    #[must_use]
    pub const fn summary(&self) -> Option<&CartProductSummary> {
        match self {
            Self::Populated(summary) => Some(summary),
            Self::Reference(_) => None,
        }
    }

    /// Display title; falls back to the product id.
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Populated(summary) => &summary.title,
            Self::Reference(id) => id.as_str(),
        }
    }
}

/// A line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub product: CartProduct,
    pub quantity: u32,
    /// Unit price.
    pub price: Price,
}

impl CartItem {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        Price::new(
            self.price.amount * rust_decimal::Decimal::from(self.quantity),
            self.price.currency_code,
        )
    }
}

/// A server-held cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub id: CartId,
    /// The user the cart belongs to.
    pub owner: UserId,
    pub total_price: Price,
    /// The server's `numOfCartItems`.
    pub item_count: u32,
    pub items: Vec<CartItem>,
}

impl Cart {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The last cart state reported by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartSnapshot {
    /// The server reported that no cart exists.
    #[default]
    Empty,
    Active(Cart),
}

impl CartSnapshot {
    /// Item count for the navigation badge.
    #[must_use]
    pub const fn item_count(&self) -> u32 {
        match self {
            Self::Empty => 0,
            Self::Active(cart) => cart.item_count,
        }
    }

    #[must_use]
    pub const fn cart(&self) -> Option<&Cart> {
        match self {
            Self::Empty => None,
            Self::Active(cart) => Some(cart),
        }
    }
}

// =============================================================================
// Order Types
// =============================================================================

/// Shipping address as echoed back on an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAddress {
    pub details: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
}

/// A placed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub items: Vec<CartItem>,
    pub total_price: Price,
    pub payment_method: PaymentMethod,
    pub is_paid: bool,
    pub is_delivered: bool,
    pub shipping_address: Option<OrderAddress>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    #[must_use]
    pub const fn status(&self) -> OrderStatus {
        OrderStatus::from_flags(self.is_paid, self.is_delivered)
    }
}

// =============================================================================
// Auth Types
// =============================================================================

/// Opaque credential issued at sign-in or sign-up.
///
/// `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for the `token` request header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken([REDACTED])")
    }
}

/// Account data returned alongside a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub name: String,
    pub email: String,
    pub role: Option<String>,
}

/// Result of a successful sign-in or sign-up.
#[derive(Debug, Clone)]
pub struct AuthGrant {
    pub token: AuthToken,
    pub user: AuthUser,
}
