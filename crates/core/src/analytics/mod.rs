//! Admin dashboard analytics.
//!
//! The server bulk-fetches rows for a reporting window and hands them to
//! [`aggregate`], which reduces them into an [`AnalyticsReport`]. Nothing is
//! cached or persisted between calls: a report is a pure function of its
//! input, so recomputing it over identical rows yields an identical report.
//!
//! Window-scoped metrics (sales, rankings, visits, signups, promo usage)
//! ignore rows whose `created_at` falls outside the window, so repositories
//! may over-fetch. Snapshot metrics (registries, payouts, support) use every
//! row they are given.

mod aggregate;
mod visitors;
mod window;

pub use aggregate::aggregate;
pub use visitors::{ANONYMOUS_VISITOR, visitor_key};
pub use window::{DateWindow, DateWindowError, MAX_WINDOW_DAYS};

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{
    OrderId, OrderItemId, OrderStatus, PayoutId, PayoutStatus, ProductId, ProfileId, ProfileRole,
    RegistryId, RegistryItemId, TicketId, TicketStatus, VendorId,
};

/// Default number of entries kept in each ranking.
pub const DEFAULT_TOP_N: usize = 10;

// =============================================================================
// Input Rows
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct OrderRow {
    pub id: OrderId,
    pub buyer_id: Option<ProfileId>,
    pub registry_id: Option<RegistryId>,
    pub status: OrderStatus,
    pub subtotal: Decimal,
    pub discount_total: Decimal,
    pub shipping_total: Decimal,
    pub total: Decimal,
    pub promo_code: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct OrderItemRow {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub vendor_id: VendorId,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub gift_wrap_fee: Decimal,
}

impl OrderItemRow {
    /// Line total including gift wrap.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity) + self.gift_wrap_fee
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct VendorRow {
    pub id: VendorId,
    pub name: String,
    /// Platform share of each sale, in `[0, 1]`.
    pub commission_rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct ProductRow {
    pub id: ProductId,
    pub vendor_id: VendorId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct RegistryRow {
    pub id: RegistryId,
    pub host_id: ProfileId,
    pub title: String,
    pub event_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct RegistryItemRow {
    pub id: RegistryItemId,
    pub registry_id: RegistryId,
    pub product_id: ProductId,
    pub quantity_requested: i32,
    pub quantity_purchased: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct ProfileRow {
    pub id: ProfileId,
    pub role: ProfileRole,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct VisitRow {
    pub profile_id: Option<ProfileId>,
    pub session_id: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub path: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct TicketRow {
    pub id: TicketId,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct PayoutRow {
    pub id: PayoutId,
    pub vendor_id: VendorId,
    pub amount: Decimal,
    pub status: PayoutStatus,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Everything one report is computed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsInput {
    pub window: DateWindow,
    /// Used to decide which registries are still upcoming.
    pub today: NaiveDate,
    pub orders: Vec<OrderRow>,
    pub order_items: Vec<OrderItemRow>,
    pub vendors: Vec<VendorRow>,
    pub products: Vec<ProductRow>,
    pub registries: Vec<RegistryRow>,
    pub registry_items: Vec<RegistryItemRow>,
    pub profiles: Vec<ProfileRow>,
    pub visits: Vec<VisitRow>,
    pub tickets: Vec<TicketRow>,
    pub payouts: Vec<PayoutRow>,
    pub top_n: usize,
}

impl AnalyticsInput {
    /// An input with no rows for `window`.
    #[must_use]
    pub const fn empty(window: DateWindow, today: NaiveDate) -> Self {
        Self {
            window,
            today,
            orders: Vec::new(),
            order_items: Vec::new(),
            vendors: Vec::new(),
            products: Vec::new(),
            registries: Vec::new(),
            registry_items: Vec::new(),
            profiles: Vec::new(),
            visits: Vec::new(),
            tickets: Vec::new(),
            payouts: Vec::new(),
            top_n: DEFAULT_TOP_N,
        }
    }
}

// =============================================================================
// Report
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub window: DateWindow,
    pub revenue: RevenueMetrics,
    pub daily: Vec<DailyRevenue>,
    pub top_vendors: Vec<VendorRanking>,
    pub top_products: Vec<ProductRanking>,
    pub registries: RegistryMetrics,
    pub visitors: VisitorMetrics,
    pub promos: Vec<PromoUsage>,
    pub signups: SignupMetrics,
    pub payouts: PayoutMetrics,
    pub support: SupportMetrics,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueMetrics {
    pub gross_sales: Decimal,
    pub discounts: Decimal,
    pub shipping: Decimal,
    pub net_sales: Decimal,
    pub order_count: u64,
    pub average_order_value: Decimal,
    pub platform_commission: Decimal,
    pub cancelled_orders: u64,
    pub refunded_total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRevenue {
    pub date: NaiveDate,
    pub net_sales: Decimal,
    pub orders: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorRanking {
    pub vendor_id: VendorId,
    pub name: String,
    pub revenue: Decimal,
    pub units: u64,
    pub orders: u64,
    pub commission: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRanking {
    pub product_id: ProductId,
    pub name: String,
    pub units: u64,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryMetrics {
    pub total: u64,
    pub created_in_window: u64,
    /// Registries whose event is today or later, or undated.
    pub active: u64,
    pub items_requested: u64,
    /// Purchases capped per item at the requested quantity.
    pub items_purchased: u64,
    /// `items_purchased / items_requested`, 4 decimal places.
    pub fulfillment_rate: Decimal,
    pub fully_fulfilled: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitorMetrics {
    pub total_visits: u64,
    pub unique_visitors: u64,
    pub daily_unique: Vec<DailyVisitors>,
    pub top_paths: Vec<PathCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyVisitors {
    pub date: NaiveDate,
    pub unique_visitors: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathCount {
    pub path: String,
    pub visits: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoUsage {
    pub code: String,
    pub redemptions: u64,
    pub discount_total: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupMetrics {
    pub total: u64,
    pub by_role: BTreeMap<ProfileRole, u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutMetrics {
    /// Pending and processing payouts.
    pub pending_amount: Decimal,
    pub paid_amount: Decimal,
    pub failed_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportMetrics {
    pub open: u64,
    pub in_progress: u64,
    pub resolved: u64,
    pub closed: u64,
}
