//! Promo codes and checkout discount evaluation.
//!
//! A promo is scoped either to every product of one vendor or to an explicit
//! product set. Evaluation takes the promo, the cart lines being checked out
//! and a [`PromoContext`], and produces a [`DiscountBreakdown`] or the
//! [`PromoRejection`] explaining why the code does not apply.
//!
//! Nothing here touches the promo's usage counter; redemption is recorded when
//! the order is placed.

mod code;
mod evaluate;

pub use code::{PromoCode, PromoCodeError};
pub use evaluate::evaluate_promo;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CategoryId, ProductId, PromoId, VendorId};

/// What a promo applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "app.promo_scope", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum PromoScope {
    /// Every product sold by the promo's vendor.
    Vendor,
    /// Only the products listed on the promo.
    Products,
}

/// How the discount value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "app.discount_kind", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    /// `value` is a percentage in `(0, 100]`.
    Percentage,
    /// `value` is an amount off the eligible lines.
    FixedAmount,
}

/// A promo as stored by the marketplace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Promo {
    pub id: PromoId,
    pub code: PromoCode,
    /// Owning vendor. Platform-wide product promos have none.
    pub vendor_id: Option<VendorId>,
    pub scope: PromoScope,
    /// Products covered by a [`PromoScope::Products`] promo.
    pub product_ids: Vec<ProductId>,
    pub kind: DiscountKind,
    pub value: Decimal,
    /// Whether gift-wrap fees on eligible lines are discounted too.
    pub includes_gift_wrap: bool,
    /// Category restriction; empty means any category.
    pub category_ids: Vec<CategoryId>,
    /// Only lines that ship physically are eligible.
    pub shippable_only: bool,
    /// Minimum eligible subtotal for the code to apply.
    pub min_subtotal: Option<Decimal>,
    /// Upper bound on the total discount.
    pub max_discount: Option<Decimal>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub usage_limit: Option<i32>,
    pub usage_count: i32,
    pub active: bool,
}

const fn default_quantity() -> i32 {
    1
}

const fn default_shippable() -> bool {
    true
}

/// A cart line submitted for promo evaluation.
///
/// `subtotal` and `gift_wrap_fee` are line totals (already multiplied by
/// quantity).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub vendor_id: VendorId,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    pub subtotal: Decimal,
    #[serde(default)]
    pub gift_wrap_fee: Decimal,
    #[serde(default)]
    pub category_ids: Vec<CategoryId>,
    #[serde(default = "default_shippable")]
    pub shippable: bool,
}

/// Request-level facts the evaluation depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromoContext {
    pub now: DateTime<Utc>,
    /// Set when the checkout belongs to a single vendor's shop.
    pub vendor_id: Option<VendorId>,
}

/// The discount a promo grants on a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountBreakdown {
    pub product_discount: Decimal,
    pub gift_wrap_discount: Decimal,
    pub eligible_subtotal: Decimal,
    pub total_discount: Decimal,
    pub eligible_line_count: usize,
}

/// Why a promo does not apply to a cart.
///
/// The `Display` text is shown to shoppers verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PromoRejection {
    #[error("This promo code is not active")]
    Inactive,
    #[error("This promo code is not valid yet")]
    NotStarted,
    #[error("This promo code has expired")]
    Expired,
    #[error("This promo code has reached its usage limit")]
    UsageLimitReached,
    #[error("This promo code is not valid for this shop")]
    VendorMismatch,
    #[error("Your cart is empty")]
    EmptyCart,
    #[error("No items in your cart are eligible for this promo code")]
    NoEligibleItems,
    #[error("A minimum eligible subtotal of {minimum} is required for this promo code")]
    MinimumNotMet { minimum: Decimal },
    #[error("Invalid cart item: {0}")]
    InvalidLine(String),
}

/// Outcome of a promo validation request, as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoValidation {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<DiscountBreakdown>,
}

impl PromoValidation {
    /// A successful validation carrying the discount.
    #[must_use]
    pub const fn accepted(discount: DiscountBreakdown) -> Self {
        Self {
            valid: true,
            error: None,
            discount: Some(discount),
        }
    }

    /// A failed validation carrying a shopper-facing message.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(message.into()),
            discount: None,
        }
    }
}

impl From<Result<DiscountBreakdown, PromoRejection>> for PromoValidation {
    fn from(result: Result<DiscountBreakdown, PromoRejection>) -> Self {
        match result {
            Ok(discount) => Self::accepted(discount),
            Err(rejection) => Self::rejected(rejection.to_string()),
        }
    }
}
