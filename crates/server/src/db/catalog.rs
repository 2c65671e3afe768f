//! Catalog repository: product/registry search and shipping destinations.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use giftly_core::{CityId, ProductId, RegistryId, VendorId};

use super::{RepositoryError, escape_like};

/// A published product matching a search.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProductHit {
    pub id: ProductId,
    pub vendor_id: VendorId,
    pub vendor_name: String,
    pub name: String,
    pub price: Decimal,
}

/// A public registry matching a search.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct RegistryHit {
    pub id: RegistryId,
    pub title: String,
    pub host_name: String,
    pub event_date: Option<chrono::NaiveDate>,
}

/// A shipping destination city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct ShippingCity {
    pub id: CityId,
    pub country_code: String,
    pub name: String,
    pub region: Option<String>,
}

/// Repository for catalog database operations.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Published products whose name contains `query`, prefix matches first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn search_products(
        &self,
        query: &str,
        limit: i64,
    ) -> Result<Vec<ProductHit>, RepositoryError> {
        let escaped = escape_like(query);
        let rows = sqlx::query_as::<_, ProductHit>(
            r"
            SELECT p.id, p.vendor_id, v.name AS vendor_name, p.name, p.price
            FROM app.product p
            JOIN app.vendor v ON v.id = p.vendor_id
            WHERE p.published AND p.name ILIKE $1
            ORDER BY (p.name ILIKE $2) DESC, p.name, p.id
            LIMIT $3
            ",
        )
        .bind(format!("%{escaped}%"))
        .bind(format!("{escaped}%"))
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Public registries whose title contains `query`, soonest event first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn search_registries(
        &self,
        query: &str,
        limit: i64,
    ) -> Result<Vec<RegistryHit>, RepositoryError> {
        let rows = sqlx::query_as::<_, RegistryHit>(
            r"
            SELECT r.id, r.title, p.display_name AS host_name, r.event_date
            FROM app.registry r
            JOIN app.profile p ON p.id = r.host_id
            WHERE r.is_public AND r.title ILIKE $1
            ORDER BY r.event_date ASC NULLS LAST, r.id
            LIMIT $2
            ",
        )
        .bind(format!("%{}%", escape_like(query)))
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Cities of `country_code`, optionally filtered by name prefix.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn shipping_cities(
        &self,
        country_code: &str,
        prefix: Option<&str>,
        limit: i64,
    ) -> Result<Vec<ShippingCity>, RepositoryError> {
        let pattern = prefix.map(|p| format!("{}%", escape_like(p)));
        let rows = sqlx::query_as::<_, ShippingCity>(
            r"
            SELECT id, country_code, name, region
            FROM app.shipping_city
            WHERE country_code = $1
              AND ($2::text IS NULL OR name ILIKE $2)
            ORDER BY name, region NULLS FIRST, id
            LIMIT $3
            ",
        )
        .bind(country_code)
        .bind(pattern)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}
