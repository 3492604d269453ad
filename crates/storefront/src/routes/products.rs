//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{OriginalUri, Path, Query, State},
    response::{IntoResponse, Response},
};
use freshcart_core::ProductId;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::api::{Pagination, Product};
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::routes::{PageContext, ProductCardView, pages};
use crate::state::AppState;

/// Pagination query parameters.
#[derive(Debug, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<u32>,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub page: PageContext,
    pub products: Vec<ProductCardView>,
    pub pagination: Pagination,
    pub error: Option<String>,
    pub return_to: String,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub page: PageContext,
    pub product: ProductCardView,
    pub description: String,
    pub images: Vec<String>,
    pub brand: Option<String>,
    pub ratings_quantity: u32,
    pub related: Vec<ProductCardView>,
    pub return_to: String,
}

/// Display product listing page.
#[instrument(skip(state, session, _auth))]
pub async fn index(
    RequireAuth(_auth): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<PaginationQuery>,
) -> Result<ProductsIndexTemplate> {
    let requested = query.page.unwrap_or(1).max(1);

    let (products, pagination, error) = match state.api().list_products(requested).await {
        Ok(page) => (
            page.products.iter().map(ProductCardView::from).collect(),
            page.pagination,
            None,
        ),
        Err(e) => {
            tracing::warn!(error = %e, page = requested, "Failed to load products");
            (
                Vec::new(),
                Pagination {
                    current_page: requested,
                    number_of_pages: requested,
                },
                Some(e.user_message()),
            )
        }
    };

    Ok(ProductsIndexTemplate {
        page: PageContext::load(&session).await?,
        products,
        pagination,
        error,
        return_to: format!("/products?page={requested}"),
    })
}

/// Display product detail page with related products from the same category.
#[instrument(skip(state, session, _auth, uri))]
pub async fn show(
    RequireAuth(_auth): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    OriginalUri(uri): OriginalUri,
    Path((id, category)): Path<(String, String)>,
) -> Result<Response> {
    let product = match state.api().get_product(&ProductId::new(id)).await {
        Ok(product) => product,
        Err(e) if e.is_not_found() => {
            return pages::render_not_found(&session, uri.path()).await;
        }
        Err(e) => return Err(e.into()),
    };

    let related = match state.api().list_products(1).await {
        Ok(page) => related_cards(&page.products, &category),
        Err(e) => {
            tracing::warn!(error = %e, category = %category, "Failed to load related products");
            Vec::new()
        }
    };

    Ok(ProductShowTemplate {
        page: PageContext::load(&session).await?,
        description: product.description.clone(),
        images: product.images.clone(),
        brand: product.brand.as_ref().map(|b| b.name.clone()),
        ratings_quantity: product.ratings_quantity,
        return_to: uri.path().to_string(),
        product: ProductCardView::from(&product),
        related,
    }
    .into_response())
}

/// Every listed product whose category name equals `category`.
fn related_cards(products: &[Product], category: &str) -> Vec<ProductCardView> {
    products
        .iter()
        .filter(|p| p.in_category(category))
        .map(ProductCardView::from)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use freshcart_core::Price;
    use rust_decimal::Decimal;

    use super::*;
    use crate::api::Category;

    fn product(id: &str, category: &str) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id} deluxe"),
            description: String::new(),
            price: Price::catalog(Decimal::from(100)),
            price_after_discount: None,
            image_cover: String::new(),
            images: Vec::new(),
            ratings_average: 4.5,
            ratings_quantity: 3,
            category: Some(Category {
                id: freshcart_core::CategoryId::new(category),
                name: category.to_string(),
                slug: category.to_lowercase(),
                image: None,
            }),
            brand: None,
        }
    }

    #[test]
    fn test_related_cards_filters_by_category_name() {
        let products = vec![
            product("a", "Electronics"),
            product("b", "Women's Fashion"),
            product("c", "Electronics"),
        ];
        let related = related_cards(&products, "Electronics");
        let ids: Vec<_> = related.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(related[0].short_title, "Product a");
    }

    #[test]
    fn test_related_cards_unknown_category() {
        let products = vec![product("a", "Electronics")];
        assert!(related_cards(&products, "Music").is_empty());
    }
}
