//! Cart route handlers.
//!
//! Every mutation is a plain form post that redirects back to a page; the
//! resulting notice and badge count are rendered by that page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::Redirect};
use freshcart_core::ProductId;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::api::{Cart, CartItem, CartSnapshot};
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::routes::{PageContext, safe_return_path};
use crate::services::CartOutcome;
use crate::services::cart::stored_snapshot;
use crate::state::AppState;

const CART_PATH: &str = "/cart";

/// Cart line display data for templates.
#[derive(Clone, Debug)]
pub struct CartItemView {
    pub product_id: String,
    pub title: String,
    pub image: Option<String>,
    pub quantity: u32,
    pub price: String,
    pub line_total: String,
    /// Quantity submitted by the "+" button.
    pub increment: i64,
    /// Quantity submitted by the "-" button; 0 is ignored by the store.
    pub decrement: i64,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        let quantity = i64::from(item.quantity);
        Self {
            product_id: item.product.id().to_string(),
            title: item.product.title().to_string(),
            image: item.product.summary().map(|s| s.image_cover.clone()),
            quantity: item.quantity,
            price: item.price.to_string(),
            line_total: item.line_total().to_string(),
            increment: quantity + 1,
            decrement: quantity - 1,
        }
    }
}

/// Cart display data for templates.
#[derive(Clone, Debug, Default)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total_price: String,
    pub item_count: u32,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items.iter().map(CartItemView::from).collect(),
            total_price: cart.total_price.to_string(),
            item_count: cart.item_count,
        }
    }
}

impl From<&CartSnapshot> for CartView {
    fn from(snapshot: &CartSnapshot) -> Self {
        snapshot.cart().map(Self::from).unwrap_or_default()
    }
}

/// Add-to-cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    /// Page to go back to afterwards.
    pub return_to: Option<String>,
}

/// Quantity form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub quantity: i64,
}

/// Remove form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub page: PageContext,
    pub cart: CartView,
}

/// Display cart page.
///
/// On a failed fetch the last stored snapshot is shown.
#[instrument(skip(state, session, auth))]
pub async fn show(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    session: Session,
) -> Result<CartShowTemplate> {
    let cart = match state.cart(&session, &auth.token).fetch().await? {
        CartOutcome::Done(snapshot) => CartView::from(&snapshot),
        CartOutcome::Skipped | CartOutcome::Failed(_) => {
            CartView::from(&stored_snapshot(&session).await?)
        }
    };

    Ok(CartShowTemplate {
        page: PageContext::load(&session).await?,
        cart,
    })
}

/// Add one unit of a product, then return to the originating page.
#[instrument(skip(state, session, auth))]
pub async fn add(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Redirect> {
    state
        .cart(&session, &auth.token)
        .add(&ProductId::new(form.product_id))
        .await?;
    let target = safe_return_path(form.return_to.as_deref(), CART_PATH);
    Ok(Redirect::to(&target))
}

/// Set a line's quantity.
#[instrument(skip(state, session, auth))]
pub async fn update(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Result<Redirect> {
    state
        .cart(&session, &auth.token)
        .set_quantity(&ProductId::new(form.product_id), form.quantity)
        .await?;
    Ok(Redirect::to(CART_PATH))
}

/// Remove a line.
#[instrument(skip(state, session, auth))]
pub async fn remove(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Redirect> {
    state
        .cart(&session, &auth.token)
        .remove(&ProductId::new(form.product_id))
        .await?;
    Ok(Redirect::to(CART_PATH))
}

/// Delete the whole cart.
#[instrument(skip(state, session, auth))]
pub async fn clear(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    session: Session,
) -> Result<Redirect> {
    state.cart(&session, &auth.token).clear_all().await?;
    Ok(Redirect::to(CART_PATH))
}

#[cfg(test)]
mod tests {
    use freshcart_core::{CartId, CartItemId, Price, UserId};
    use rust_decimal::Decimal;

    use super::*;
    use crate::api::CartProduct;

    #[test]
    fn test_cart_item_view_steps() {
        let item = CartItem {
            id: CartItemId::new("line-1"),
            product: CartProduct::Reference(ProductId::new("prod-1")),
            quantity: 1,
            price: Price::catalog(Decimal::from(25)),
        };
        let view = CartItemView::from(&item);
        assert_eq!(view.increment, 2);
        assert_eq!(view.decrement, 0);
        assert_eq!(view.title, "prod-1");
        assert!(view.image.is_none());
    }

    #[test]
    fn test_cart_view_uses_server_count() {
        let cart = Cart {
            id: CartId::new("cart-1"),
            owner: UserId::new("user-1"),
            total_price: Price::catalog(Decimal::from(75)),
            item_count: 7,
            items: Vec::new(),
        };
        let view = CartView::from(&CartSnapshot::Active(cart));
        assert_eq!(view.item_count, 7);
        assert_eq!(view.total_price, "75 EGP");

        assert_eq!(CartView::from(&CartSnapshot::Empty).item_count, 0);
    }
}
