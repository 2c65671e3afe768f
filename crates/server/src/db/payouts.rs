//! Reads for vendor payout statements.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::PgPool;

use giftly_core::VendorId;
use giftly_core::analytics::{OrderItemRow, OrderRow, PayoutRow, VendorRow};

use super::RepositoryError;

/// Everything needed to compute one vendor's statement.
#[derive(Debug, Clone)]
pub struct PayoutInputs {
    pub vendor: VendorRow,
    pub orders: Vec<OrderRow>,
    pub items: Vec<OrderItemRow>,
    pub prior_payouts: Vec<PayoutRow>,
}

/// Repository for payout reads.
pub struct PayoutRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PayoutRepository<'a> {
    /// Create a new payout repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Load the vendor, its order items and prior payouts for `first..=last`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the vendor does not exist.
    /// Returns `RepositoryError::Database` if any query fails.
    pub async fn load_inputs(
        &self,
        vendor_id: VendorId,
        first: NaiveDate,
        last: NaiveDate,
    ) -> Result<PayoutInputs, RepositoryError> {
        let vendor = sqlx::query_as::<_, VendorRow>(
            "SELECT id, name, commission_rate FROM app.vendor WHERE id = $1",
        )
        .bind(vendor_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        let start = day_start(first);
        let end = day_start(last.succ_opt().unwrap_or(last));

        let orders = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT DISTINCT o.id, o.buyer_id, o.registry_id, o.status, o.subtotal,
                   o.discount_total, o.shipping_total, o.total, o.promo_code, o.created_at
            FROM app.orders o
            JOIN app.order_item i ON i.order_id = o.id
            WHERE i.vendor_id = $1 AND o.created_at >= $2 AND o.created_at < $3
            ",
        )
        .bind(vendor_id)
        .bind(start)
        .bind(end)
        .fetch_all(self.pool)
        .await?;

        let items = sqlx::query_as::<_, OrderItemRow>(
            r"
            SELECT i.id, i.order_id, i.product_id, i.vendor_id, i.quantity,
                   i.unit_price, i.gift_wrap_fee
            FROM app.order_item i
            JOIN app.orders o ON o.id = i.order_id
            WHERE i.vendor_id = $1 AND o.created_at >= $2 AND o.created_at < $3
            ",
        )
        .bind(vendor_id)
        .bind(start)
        .bind(end)
        .fetch_all(self.pool)
        .await?;

        let prior_payouts = sqlx::query_as::<_, PayoutRow>(
            r"
            SELECT id, vendor_id, amount, status, period_start, period_end, created_at
            FROM app.vendor_payout
            WHERE vendor_id = $1 AND period_start >= $2 AND period_end <= $3
            ",
        )
        .bind(vendor_id)
        .bind(first)
        .bind(last)
        .fetch_all(self.pool)
        .await?;

        Ok(PayoutInputs {
            vendor,
            orders,
            items,
            prior_payouts,
        })
    }
}

fn day_start(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}
