//! Order history route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tower_sessions::Session;
use tracing::instrument;

use crate::api::{Order, OrderAddress};
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::routes::PageContext;
use crate::services::cart::stored_user_id;
use crate::state::AppState;

const LOAD_FAILED: &str = "Could not load your orders. Please try again.";

/// Order line display data.
#[derive(Clone, Debug)]
pub struct OrderItemView {
    pub title: String,
    pub image: Option<String>,
    pub quantity: u32,
    pub price: String,
}

/// Order display data.
#[derive(Clone, Debug)]
pub struct OrderView {
    pub id: String,
    pub total: String,
    pub payment_method: String,
    pub status: &'static str,
    pub placed_on: Option<String>,
    pub address: Option<String>,
    pub items: Vec<OrderItemView>,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            total: order.total_price.to_string(),
            payment_method: order.payment_method.to_string(),
            status: order.status().label(),
            placed_on: order
                .created_at
                .map(|at| at.format("%B %-d, %Y").to_string()),
            address: order.shipping_address.as_ref().and_then(format_address),
            items: order
                .items
                .iter()
                .map(|item| OrderItemView {
                    title: item.product.title().to_string(),
                    image: item.product.summary().map(|s| s.image_cover.clone()),
                    quantity: item.quantity,
                    price: item.price.to_string(),
                })
                .collect(),
        }
    }
}

/// Join the non-empty address parts, or `None` if there are none.
fn format_address(address: &OrderAddress) -> Option<String> {
    let parts: Vec<&str> = [&address.details, &address.city, &address.phone]
        .into_iter()
        .filter_map(|part| part.as_deref().map(str::trim))
        .filter(|part| !part.is_empty())
        .collect();
    (!parts.is_empty()).then(|| parts.join(", "))
}

/// Order history page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersTemplate {
    pub page: PageContext,
    pub orders: Vec<OrderView>,
    pub error: Option<String>,
}

/// Display the visitor's orders.
///
/// Uses the user id remembered from the last cart fetch.
#[instrument(skip(state, session, _auth))]
pub async fn index(
    RequireAuth(_auth): RequireAuth,
    State(state): State<AppState>,
    session: Session,
) -> Result<OrdersTemplate> {
    let (orders, error) = match stored_user_id(&session).await? {
        Some(user_id) => match state.api().list_user_orders(&user_id).await {
            Ok(orders) => (orders.iter().map(OrderView::from).collect(), None),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load orders");
                (Vec::new(), Some(LOAD_FAILED.to_string()))
            }
        },
        None => {
            tracing::debug!("No user id in session; cannot list orders");
            (Vec::new(), Some(LOAD_FAILED.to_string()))
        }
    };

    Ok(OrdersTemplate {
        page: PageContext::load(&session).await?,
        orders,
        error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_address_skips_blank_parts() {
        let address = OrderAddress {
            details: Some("12 Nile Street".to_string()),
            phone: Some("01012345678".to_string()),
            city: Some("  ".to_string()),
        };
        assert_eq!(
            format_address(&address).as_deref(),
            Some("12 Nile Street, 01012345678")
        );
        assert_eq!(format_address(&OrderAddress::default()), None);
    }
}
