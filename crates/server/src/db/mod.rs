//! Database operations for the Giftly `PostgreSQL` database.
//!
//! All tables live in the `app` schema:
//!
//! - `profile`, `access_token` - marketplace users and their bearer tokens
//! - `vendor`, `product`, `category`, `product_category` - the catalog
//! - `registry`, `registry_item` - host gift registries
//! - `orders`, `order_item` - checkouts, shop and registry alike
//! - `promo`, `promo_product` - discount codes
//! - `page_visit`, `support_ticket`, `vendor_payout` - admin reporting inputs
//! - `shipping_city` - destination lookup for checkout forms
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p giftly-cli -- migrate
//! ```
//!
//! Queries are built at runtime with `sqlx::query_as` so the crate compiles
//! without a live database.

pub mod analytics;
pub mod catalog;
pub mod payouts;
pub mod profiles;
pub mod promos;
pub mod tokens;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use analytics::AnalyticsRepository;
pub use catalog::CatalogRepository;
pub use payouts::PayoutRepository;
pub use profiles::ProfileRepository;
pub use promos::PromoRepository;
pub use tokens::TokenRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate token hash).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Escape `LIKE` wildcards so user input matches literally.
pub(crate) fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
