//! Cart store.
//!
//! Mediates between the visitor's session and the remote cart. Each
//! operation issues exactly one request for its own purpose, then re-derives
//! the badge count and snapshot from that response; nothing is computed
//! locally. Remote failures become notices and are never retried.
//!
//! Operations for one visitor run one at a time: [`CartLocks`] hands out a
//! per-token async mutex.

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

use freshcart_core::{CartId, ProductId, ShippingAddress};
use moka::future::Cache;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tower_sessions::Session;
use tracing::{info, instrument, warn};

use crate::api::{ApiError, AuthToken, Cart, CartSnapshot, EcommerceClient, Order};
use crate::error::add_breadcrumb;
use crate::models::session_keys;
use crate::services::notices::{self, Notice};

type SessionResult<T> = Result<T, tower_sessions::session::Error>;

// =============================================================================
// Notice Texts
// =============================================================================

const CART_EMPTY: &str = "Cart is empty.";
const ADDED: &str = "Product added to cart";
const UPDATED: &str = "Quantity updated";
const REMOVED: &str = "Product removed from cart";
const CLEARED: &str = "Cart cleared";
const ORDER_CREATED: &str = "Cash order created successfully!";

const FETCH_FAILED: &str = "Failed to fetch cart";
const ADD_FAILED: &str = "Failed to add product";
const UPDATE_FAILED: &str = "Failed to update quantity";
const REMOVE_FAILED: &str = "Failed to remove product";
const CLEAR_FAILED: &str = "Failed to clear cart";
const ORDER_FAILED: &str = "Failed to create cash order";

// =============================================================================
// CartLocks
// =============================================================================

/// Per-visitor mutexes serializing cart operations.
///
/// Keyed by auth token; idle entries are evicted after 30 minutes. A lock
/// that is held or awaited stays reachable through `held` even after the
/// cache evicts it, so one visitor never gets two mutexes at once.
#[derive(Clone)]
pub struct CartLocks {
    warm: Cache<String, Arc<Mutex<()>>>,
    held: Arc<Mutex<HashMap<String, Weak<Mutex<()>>>>>,
}

impl CartLocks {
    const MAX_VISITORS: u64 = 10_000;
    const IDLE: Duration = Duration::from_secs(30 * 60);
    const PRUNE_AT: usize = 20_000;

    #[must_use]
    pub fn new() -> Self {
        Self {
            warm: Cache::builder()
                .max_capacity(Self::MAX_VISITORS)
                .time_to_idle(Self::IDLE)
                .build(),
            held: Arc::default(),
        }
    }

    /// Wait for this visitor's turn.
    pub async fn acquire(&self, token: &AuthToken) -> OwnedMutexGuard<()> {
        let key = token.expose().to_string();
        let lock = {
            let mut held = self.held.lock().await;
            if let Some(lock) = held.get(&key).and_then(Weak::upgrade) {
                lock
            } else {
                if held.len() >= Self::PRUNE_AT {
                    held.retain(|_, lock| lock.strong_count() > 0);
                }
                let lock = self
                    .warm
                    .get_with(key.clone(), async { Arc::new(Mutex::new(())) })
                    .await;
                held.insert(key, Arc::downgrade(&lock));
                lock
            }
        };
        lock.lock_owned().await
    }
}

impl Default for CartLocks {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// CartOutcome
// =============================================================================

/// What a cart operation did.
#[derive(Debug)]
pub enum CartOutcome<T = CartSnapshot> {
    /// The server accepted the operation.
    Done(T),
    /// Nothing was sent (input outside the accepted range).
    Skipped,
    /// The server or transport refused; a notice has been queued.
    Failed(ApiError),
}

impl<T> CartOutcome<T> {
    #[must_use]
    pub const fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }

    /// The success value, if any.
    #[must_use]
    pub fn done(self) -> Option<T> {
        match self {
            Self::Done(value) => Some(value),
            Self::Skipped | Self::Failed(_) => None,
        }
    }
}

// =============================================================================
// Session Accessors
// =============================================================================

/// Badge count from the session (0 when never fetched).
///
/// # Errors
///
/// Returns an error if the session cannot be read.
pub async fn stored_count(session: &Session) -> SessionResult<u32> {
    Ok(session
        .get::<u32>(session_keys::CART_COUNT)
        .await?
        .unwrap_or(0))
}

/// Last snapshot from the session.
///
/// # Errors
///
/// Returns an error if the session cannot be read.
pub async fn stored_snapshot(session: &Session) -> SessionResult<CartSnapshot> {
    Ok(session
        .get::<CartSnapshot>(session_keys::CART_SNAPSHOT)
        .await?
        .unwrap_or_default())
}

/// Cart id remembered from the last successful fetch.
///
/// # Errors
///
/// Returns an error if the session cannot be read.
pub async fn stored_cart_id(session: &Session) -> SessionResult<Option<CartId>> {
    session.get(session_keys::CART_ID).await
}

/// User id remembered from the last successful fetch.
///
/// # Errors
///
/// Returns an error if the session cannot be read.
pub async fn stored_user_id(session: &Session) -> SessionResult<Option<freshcart_core::UserId>> {
    session.get(session_keys::USER_ID).await
}

/// Forget every cart value mirrored into the session.
///
/// # Errors
///
/// Returns an error if the session cannot be written.
pub async fn clear_cart_state(session: &Session) -> SessionResult<()> {
    session.remove_value(session_keys::CART_ID).await?;
    session.remove_value(session_keys::USER_ID).await?;
    session.remove_value(session_keys::CART_COUNT).await?;
    session.remove_value(session_keys::CART_SNAPSHOT).await?;
    Ok(())
}

// =============================================================================
// CartStore
// =============================================================================

/// Cart operations for one signed-in visitor.
pub struct CartStore<'a> {
    client: &'a EcommerceClient,
    locks: &'a CartLocks,
    session: &'a Session,
    token: &'a AuthToken,
}

impl<'a> CartStore<'a> {
    /// Create a cart store bound to a visitor's session and token.
    #[must_use]
    pub const fn new(
        client: &'a EcommerceClient,
        locks: &'a CartLocks,
        session: &'a Session,
        token: &'a AuthToken,
    ) -> Self {
        Self {
            client,
            locks,
            session,
            token,
        }
    }

    /// Fetch the cart and mirror it into the session.
    ///
    /// A 404 means no cart exists yet: the snapshot becomes
    /// [`CartSnapshot::Empty`] and the stored cart id is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error only if the session cannot be written.
    #[instrument(skip(self))]
    pub async fn fetch(&self) -> SessionResult<CartOutcome> {
        let _turn = self.locks.acquire(self.token).await;
        self.fetch_locked().await
    }

    async fn fetch_locked(&self) -> SessionResult<CartOutcome> {
        match self.client.get_cart(self.token).await {
            Ok(cart) => {
                let snapshot = CartSnapshot::Active(cart);
                self.store(&snapshot).await?;
                Ok(CartOutcome::Done(snapshot))
            }
            Err(e) if e.is_not_found() => {
                self.store(&CartSnapshot::Empty).await?;
                notices::push(self.session, Notice::info(CART_EMPTY)).await?;
                Ok(CartOutcome::Done(CartSnapshot::Empty))
            }
            Err(e) => self.fail(FETCH_FAILED, e).await,
        }
    }

    /// Add one unit of a product.
    ///
    /// # Errors
    ///
    /// Returns an error only if the session cannot be written.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add(&self, product_id: &ProductId) -> SessionResult<CartOutcome> {
        let _turn = self.locks.acquire(self.token).await;
        add_breadcrumb("cart", "Add to cart", Some(&[("product_id", product_id.as_str())]));

        let result = self.client.add_to_cart(self.token, product_id).await;
        self.apply(result, ADDED, ADD_FAILED).await
    }

    /// Set a product's quantity.
    ///
    /// Quantities below 1 are ignored without contacting the server.
    ///
    /// # Errors
    ///
    /// Returns an error only if the session cannot be written.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn set_quantity(
        &self,
        product_id: &ProductId,
        quantity: i64,
    ) -> SessionResult<CartOutcome> {
        let Some(count) = u32::try_from(quantity).ok().filter(|n| *n >= 1) else {
            return Ok(CartOutcome::Skipped);
        };

        let _turn = self.locks.acquire(self.token).await;
        let result = self
            .client
            .update_cart_item(self.token, product_id, count)
            .await;
        self.apply(result, UPDATED, UPDATE_FAILED).await
    }

    /// Remove a product.
    ///
    /// # Errors
    ///
    /// Returns an error only if the session cannot be written.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove(&self, product_id: &ProductId) -> SessionResult<CartOutcome> {
        let _turn = self.locks.acquire(self.token).await;
        let result = self.client.remove_cart_item(self.token, product_id).await;
        self.apply(result, REMOVED, REMOVE_FAILED).await
    }

    /// Delete the whole cart.
    ///
    /// # Errors
    ///
    /// Returns an error only if the session cannot be written.
    #[instrument(skip(self))]
    pub async fn clear_all(&self) -> SessionResult<CartOutcome> {
        let _turn = self.locks.acquire(self.token).await;
        match self.client.clear_cart(self.token).await {
            Ok(()) => {
                self.store(&CartSnapshot::Empty).await?;
                notices::push(self.session, Notice::success(CLEARED)).await?;
                Ok(CartOutcome::Done(CartSnapshot::Empty))
            }
            Err(e) => self.fail(CLEAR_FAILED, e).await,
        }
    }

    /// Place a cash order for `cart_id`, then re-fetch the (server-cleared)
    /// cart so the badge follows.
    ///
    /// # Errors
    ///
    /// Returns an error only if the session cannot be written.
    #[instrument(skip(self, address), fields(cart_id = %cart_id))]
    pub async fn checkout(
        &self,
        cart_id: &CartId,
        address: &ShippingAddress,
    ) -> SessionResult<CartOutcome<Order>> {
        let _turn = self.locks.acquire(self.token).await;
        match self
            .client
            .create_cash_order(self.token, cart_id, address)
            .await
        {
            Ok(order) => {
                info!(order_id = %order.id, "Cash order created");
                notices::push(self.session, Notice::success(ORDER_CREATED)).await?;
                self.fetch_locked().await?;
                Ok(CartOutcome::Done(order))
            }
            Err(e) => self.fail(ORDER_FAILED, e).await,
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn apply(
        &self,
        result: Result<Cart, ApiError>,
        success: &str,
        action: &str,
    ) -> SessionResult<CartOutcome> {
        match result {
            Ok(cart) => {
                let snapshot = CartSnapshot::Active(cart);
                self.store(&snapshot).await?;
                notices::push(self.session, Notice::success(success)).await?;
                Ok(CartOutcome::Done(snapshot))
            }
            Err(e) => self.fail(action, e).await,
        }
    }

    async fn fail<T>(&self, action: &str, error: ApiError) -> SessionResult<CartOutcome<T>> {
        warn!(error = %error, action, "Cart operation failed");
        notices::push(
            self.session,
            Notice::error(format!("{action}: {}", error.user_message())),
        )
        .await?;
        Ok(CartOutcome::Failed(error))
    }

    /// Mirror a snapshot into the session.
    async fn store(&self, snapshot: &CartSnapshot) -> SessionResult<()> {
        self.session
            .insert(session_keys::CART_COUNT, snapshot.item_count())
            .await?;
        match snapshot {
            CartSnapshot::Active(cart) => {
                self.session.insert(session_keys::CART_ID, &cart.id).await?;
                if !cart.owner.as_str().is_empty() {
                    self.session
                        .insert(session_keys::USER_ID, &cart.owner)
                        .await?;
                }
            }
            CartSnapshot::Empty => {
                self.session.remove::<CartId>(session_keys::CART_ID).await?;
            }
        }
        self.session
            .insert(session_keys::CART_SNAPSHOT, snapshot)
            .await
    }
}
