//! Bulk reads feeding the admin analytics aggregator.
//!
//! Window-scoped tables (orders, order items, visits, signups) are fetched for
//! the window only; registries, tickets and payouts are snapshot metrics and
//! are fetched whole.

use chrono::NaiveDate;
use sqlx::PgPool;

use giftly_core::analytics::{
    AnalyticsInput, DateWindow, OrderItemRow, OrderRow, PayoutRow, ProductRow, ProfileRow,
    RegistryItemRow, RegistryRow, TicketRow, VendorRow, VisitRow,
};

use super::RepositoryError;

/// Repository for analytics reads.
pub struct AnalyticsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AnalyticsRepository<'a> {
    /// Create a new analytics repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Load everything the aggregator needs for `window`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any query fails.
    pub async fn load_input(
        &self,
        window: DateWindow,
        today: NaiveDate,
        top_n: usize,
    ) -> Result<AnalyticsInput, RepositoryError> {
        let orders = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, buyer_id, registry_id, status, subtotal, discount_total,
                   shipping_total, total, promo_code, created_at
            FROM app.orders
            WHERE created_at >= $1 AND created_at < $2
            ",
        )
        .bind(window.start)
        .bind(window.end)
        .fetch_all(self.pool)
        .await?;

        let order_items = sqlx::query_as::<_, OrderItemRow>(
            r"
            SELECT i.id, i.order_id, i.product_id, i.vendor_id, i.quantity,
                   i.unit_price, i.gift_wrap_fee
            FROM app.order_item i
            JOIN app.orders o ON o.id = i.order_id
            WHERE o.created_at >= $1 AND o.created_at < $2
            ",
        )
        .bind(window.start)
        .bind(window.end)
        .fetch_all(self.pool)
        .await?;

        let vendors = sqlx::query_as::<_, VendorRow>(
            "SELECT id, name, commission_rate FROM app.vendor",
        )
        .fetch_all(self.pool)
        .await?;

        let products =
            sqlx::query_as::<_, ProductRow>("SELECT id, vendor_id, name FROM app.product")
                .fetch_all(self.pool)
                .await?;

        let registries = sqlx::query_as::<_, RegistryRow>(
            "SELECT id, host_id, title, event_date, created_at FROM app.registry",
        )
        .fetch_all(self.pool)
        .await?;

        let registry_items = sqlx::query_as::<_, RegistryItemRow>(
            r"
            SELECT id, registry_id, product_id, quantity_requested, quantity_purchased
            FROM app.registry_item
            ",
        )
        .fetch_all(self.pool)
        .await?;

        let profiles = sqlx::query_as::<_, ProfileRow>(
            r"
            SELECT id, role, created_at
            FROM app.profile
            WHERE created_at >= $1 AND created_at < $2
            ",
        )
        .bind(window.start)
        .bind(window.end)
        .fetch_all(self.pool)
        .await?;

        let visits = sqlx::query_as::<_, VisitRow>(
            r"
            SELECT profile_id, session_id, ip_address, user_agent, path, created_at
            FROM app.page_visit
            WHERE created_at >= $1 AND created_at < $2
            ",
        )
        .bind(window.start)
        .bind(window.end)
        .fetch_all(self.pool)
        .await?;

        let tickets = sqlx::query_as::<_, TicketRow>(
            "SELECT id, status, created_at FROM app.support_ticket",
        )
        .fetch_all(self.pool)
        .await?;

        let payouts = sqlx::query_as::<_, PayoutRow>(
            r"
            SELECT id, vendor_id, amount, status, period_start, period_end, created_at
            FROM app.vendor_payout
            ",
        )
        .fetch_all(self.pool)
        .await?;

        tracing::debug!(
            orders = orders.len(),
            order_items = order_items.len(),
            visits = visits.len(),
            "Loaded analytics input"
        );

        Ok(AnalyticsInput {
            window,
            today,
            orders,
            order_items,
            vendors,
            products,
            registries,
            registry_items,
            profiles,
            visits,
            tickets,
            payouts,
            top_n,
        })
    }
}
