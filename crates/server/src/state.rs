//! Application state shared across handlers.

use std::sync::Arc;

use moka::future::Cache;
use sqlx::PgPool;

use crate::config::GiftlyConfig;
use crate::db::catalog::ShippingCity;

/// Maximum number of `(country, prefix)` lookups kept in the city cache.
const CITY_CACHE_CAPACITY: u64 = 2_000;

/// Cache key for shipping city lookups: normalised country code and prefix.
pub type CityCacheKey = (String, String);

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: GiftlyConfig,
    pool: PgPool,
    city_cache: Cache<CityCacheKey, Vec<ShippingCity>>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: GiftlyConfig, pool: PgPool) -> Self {
        let city_cache = Cache::builder()
            .max_capacity(CITY_CACHE_CAPACITY)
            .time_to_live(config.city_cache_ttl)
            .build();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                city_cache,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &GiftlyConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the shipping city cache.
    #[must_use]
    pub fn city_cache(&self) -> &Cache<CityCacheKey, Vec<ShippingCity>> {
        &self.inner.city_cache
    }
}
