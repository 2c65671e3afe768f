//! Decimal money helpers.
//!
//! All amounts are `Decimal` values in the currency's standard unit
//! (dollars, not cents). Every computed amount goes through [`round_money`]
//! before it leaves an engine, so totals built from rounded parts always add
//! up to the rounded whole that the client sees.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places kept for money values.
pub const MONEY_SCALE: u32 = 2;

/// Round an amount to cents, halves away from zero.
///
/// ```
/// use giftly_core::round_money;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_money(Decimal::new(12345, 3)), Decimal::new(1235, 2));
/// assert_eq!(round_money(Decimal::new(-12345, 3)), Decimal::new(-1235, 2));
/// ```
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}
