//! Checkout route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use freshcart_core::{FieldErrors, ShippingDraft};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::routes::{PageContext, cart::CartView};
use crate::services::cart::stored_snapshot;
use crate::services::checkout::{self, SubmitOutcome};
use crate::state::AppState;

/// Where a placed order sends the visitor.
const ORDERS_PATH: &str = "/allorders";

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub page: PageContext,
    pub cart: Option<CartView>,
    pub form: ShippingDraft,
    pub errors: FieldErrors,
    pub message: Option<String>,
}

/// Display the shipping form with a cart summary.
#[instrument(skip(state, session, auth))]
pub async fn show(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    session: Session,
) -> Result<CheckoutTemplate> {
    let loaded = checkout::load(&state.cart(&session, &auth.token)).await?;

    Ok(CheckoutTemplate {
        page: PageContext::load(&session).await?,
        cart: loaded.cart().map(CartView::from),
        form: ShippingDraft::default(),
        errors: FieldErrors::new(),
        message: None,
    })
}

/// Validate the form and place a cash order.
///
/// The page is re-rendered from the stored snapshot on any outcome other
/// than success, so no extra request is made.
#[instrument(skip(state, session, auth, form))]
pub async fn submit(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ShippingDraft>,
) -> Result<Response> {
    let store = state.cart(&session, &auth.token);
    let outcome = checkout::submit(&store, &session, &form).await?;

    let message = outcome.message().map(String::from);
    let (status, errors) = match outcome {
        SubmitOutcome::Placed(_) => return Ok(Redirect::to(ORDERS_PATH).into_response()),
        SubmitOutcome::Invalid(errors) => (StatusCode::UNPROCESSABLE_ENTITY, errors),
        SubmitOutcome::NoCart | SubmitOutcome::Failed => (StatusCode::OK, FieldErrors::new()),
    };

    let snapshot = stored_snapshot(&session).await?;
    let template = CheckoutTemplate {
        page: PageContext::load(&session).await?,
        cart: snapshot.cart().map(CartView::from),
        form,
        errors,
        message,
    };
    Ok((status, template).into_response())
}
