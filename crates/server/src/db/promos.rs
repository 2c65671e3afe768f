//! Promo repository.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use giftly_core::promo::{DiscountKind, Promo, PromoCode, PromoScope};
use giftly_core::{CategoryId, ProductId, PromoId, VendorId};

use super::RepositoryError;

/// Raw promo row; array columns come back as plain integers.
#[derive(Debug, sqlx::FromRow)]
struct PromoRecord {
    id: PromoId,
    code: String,
    vendor_id: Option<VendorId>,
    scope: PromoScope,
    product_ids: Vec<i32>,
    kind: DiscountKind,
    value: Decimal,
    includes_gift_wrap: bool,
    category_ids: Vec<i32>,
    shippable_only: bool,
    min_subtotal: Option<Decimal>,
    max_discount: Option<Decimal>,
    starts_at: Option<DateTime<Utc>>,
    ends_at: Option<DateTime<Utc>>,
    usage_limit: Option<i32>,
    usage_count: i32,
    active: bool,
}

impl TryFrom<PromoRecord> for Promo {
    type Error = RepositoryError;

    fn try_from(r: PromoRecord) -> Result<Self, Self::Error> {
        let code = PromoCode::parse(&r.code).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid promo code in database: {e}"))
        })?;
        if r.scope == PromoScope::Vendor && r.vendor_id.is_none() {
            return Err(RepositoryError::DataCorruption(format!(
                "vendor-scoped promo {} has no vendor",
                r.id
            )));
        }

        Ok(Self {
            id: r.id,
            code,
            vendor_id: r.vendor_id,
            scope: r.scope,
            product_ids: r.product_ids.into_iter().map(ProductId::new).collect(),
            kind: r.kind,
            value: r.value,
            includes_gift_wrap: r.includes_gift_wrap,
            category_ids: r.category_ids.into_iter().map(CategoryId::new).collect(),
            shippable_only: r.shippable_only,
            min_subtotal: r.min_subtotal,
            max_discount: r.max_discount,
            starts_at: r.starts_at,
            ends_at: r.ends_at,
            usage_limit: r.usage_limit,
            usage_count: r.usage_count,
            active: r.active,
        })
    }
}

/// Repository for promo database operations.
pub struct PromoRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PromoRepository<'a> {
    /// Create a new promo repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Look up a promo by its normalised code, with its product set.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored promo is malformed.
    pub async fn get_by_code(&self, code: &PromoCode) -> Result<Option<Promo>, RepositoryError> {
        let record = sqlx::query_as::<_, PromoRecord>(
            r"
            SELECT p.id, p.code, p.vendor_id, p.scope,
                   COALESCE(
                       (SELECT array_agg(pp.product_id ORDER BY pp.product_id)
                        FROM app.promo_product pp
                        WHERE pp.promo_id = p.id),
                       '{}'
                   ) AS product_ids,
                   p.kind, p.value, p.includes_gift_wrap, p.category_ids,
                   p.shippable_only, p.min_subtotal, p.max_discount,
                   p.starts_at, p.ends_at, p.usage_limit, p.usage_count, p.active
            FROM app.promo p
            WHERE upper(p.code) = $1
            ",
        )
        .bind(code.as_str())
        .fetch_optional(self.pool)
        .await?;

        record.map(Promo::try_from).transpose()
    }
}
