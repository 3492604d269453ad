//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::api::{AuthToken, EcommerceClient};
use crate::config::StorefrontConfig;
use crate::services::{AuthService, CartLocks, CartStore};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the session database and the API client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: SqlitePool,
    api: EcommerceClient,
    cart_locks: CartLocks,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `pool` - `SQLite` pool backing the session store
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: SqlitePool) -> Self {
        let api = EcommerceClient::new(&config.api);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                api,
                cart_locks: CartLocks::new(),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the session database pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    /// Get a reference to the e-commerce API client.
    #[must_use]
    pub fn api(&self) -> &EcommerceClient {
        &self.inner.api
    }

    /// Cart store for one visitor.
    #[must_use]
    pub fn cart<'a>(&'a self, session: &'a Session, token: &'a AuthToken) -> CartStore<'a> {
        CartStore::new(&self.inner.api, &self.inner.cart_locks, session, token)
    }

    /// Authentication service for one visitor.
    #[must_use]
    pub fn auth<'a>(&'a self, session: &'a Session) -> AuthService<'a> {
        AuthService::new(&self.inner.api, session)
    }
}
