//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::StorefrontConfig;
use crate::db::OrderRepository;
use crate::pickup::{DirectoryError, PickupDirectory};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    orders: OrderRepository,
    pickup_directory: PickupDirectory,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled pickup reference data is invalid.
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Result<Self, DirectoryError> {
        let orders = OrderRepository::new(pool.clone());
        let pickup_directory = PickupDirectory::load_bundled()?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                orders,
                pickup_directory,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the order repository.
    #[must_use]
    pub fn orders(&self) -> &OrderRepository {
        &self.inner.orders
    }

    /// Get a reference to the static pickup reference data.
    #[must_use]
    pub fn pickup_directory(&self) -> &PickupDirectory {
        &self.inner.pickup_directory
    }
}
