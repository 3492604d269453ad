//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::routes::{PageContext, ProductCardView};
use crate::state::AppState;

/// Products shown in the "recent products" grid.
const RECENT_LIMIT: usize = 12;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub page: PageContext,
    pub products: Vec<ProductCardView>,
    pub error: Option<String>,
    pub return_to: String,
}

/// Display home page.
#[instrument(skip(state, session, _auth))]
pub async fn home(
    RequireAuth(_auth): RequireAuth,
    State(state): State<AppState>,
    session: Session,
) -> Result<HomeTemplate> {
    let (products, error) = match state.api().list_products(1).await {
        Ok(page) => (
            page.products
                .iter()
                .take(RECENT_LIMIT)
                .map(ProductCardView::from)
                .collect(),
            None,
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load recent products");
            (Vec::new(), Some(e.user_message()))
        }
    };

    Ok(HomeTemplate {
        page: PageContext::load(&session).await?,
        products,
        error,
        return_to: "/".to_string(),
    })
}
