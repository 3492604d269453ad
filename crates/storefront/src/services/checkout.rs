//! Checkout flow.
//!
//! Loading the page fetches the cart (`Ready` or `Empty`). Submitting the
//! shipping form validates it first; an invalid form, or a missing cart id,
//! never reaches the network. A valid form issues exactly one order request.

use freshcart_core::{FieldErrors, ShippingDraft};
use tower_sessions::Session;
use tracing::instrument;

use crate::api::{Cart, CartSnapshot, Order};
use crate::services::cart::{self, CartOutcome, CartStore};

/// Shown when the form is valid but no cart id was ever stored.
pub const NO_CART: &str = "No cart found.";

/// Shown when the order request fails.
pub const PLACE_FAILED: &str = "Failed to place order. Please try again.";

/// What the checkout page shows once the cart has loaded.
#[derive(Debug)]
pub enum CheckoutState {
    /// The visitor has a cart.
    Ready(Cart),
    /// No cart exists, or it could not be loaded.
    Empty,
}

impl CheckoutState {
    #[must_use]
    pub const fn cart(&self) -> Option<&Cart> {
        match self {
            Self::Ready(cart) => Some(cart),
            Self::Empty => None,
        }
    }
}

/// Result of submitting the shipping form.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Field-level validation failed; nothing was sent.
    Invalid(FieldErrors),
    /// Valid form, but there is no stored cart id; nothing was sent.
    NoCart,
    /// The order was placed.
    Placed(Order),
    /// The order request failed.
    Failed,
}

impl SubmitOutcome {
    /// Form-level message to show, if any.
    #[must_use]
    pub const fn message(&self) -> Option<&'static str> {
        match self {
            Self::NoCart => Some(NO_CART),
            Self::Failed => Some(PLACE_FAILED),
            Self::Invalid(_) | Self::Placed(_) => None,
        }
    }
}

/// Fetch the cart for the checkout page.
///
/// # Errors
///
/// Returns an error if the session cannot be written.
pub async fn load(store: &CartStore<'_>) -> Result<CheckoutState, tower_sessions::session::Error> {
    Ok(match store.fetch().await? {
        CartOutcome::Done(CartSnapshot::Active(cart)) => CheckoutState::Ready(cart),
        CartOutcome::Done(CartSnapshot::Empty) | CartOutcome::Skipped | CartOutcome::Failed(_) => {
            CheckoutState::Empty
        }
    })
}

/// Validate the shipping form and place a cash order for the stored cart.
///
/// # Errors
///
/// Returns an error if the session cannot be read or written.
#[instrument(skip_all)]
pub async fn submit(
    store: &CartStore<'_>,
    session: &Session,
    draft: &ShippingDraft,
) -> Result<SubmitOutcome, tower_sessions::session::Error> {
    let address = match draft.validate() {
        Ok(address) => address,
        Err(errors) => return Ok(SubmitOutcome::Invalid(errors)),
    };

    let Some(cart_id) = cart::stored_cart_id(session).await? else {
        return Ok(SubmitOutcome::NoCart);
    };

    Ok(match store.checkout(&cart_id, &address).await? {
        CartOutcome::Done(order) => SubmitOutcome::Placed(order),
        CartOutcome::Skipped | CartOutcome::Failed(_) => SubmitOutcome::Failed,
    })
}
