//! Vendor payout statements.
//!
//! A payout disburses a vendor's earnings for a period net of the platform
//! commission, minus whatever was already disbursed for that period.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::analytics::{OrderItemRow, OrderRow, PayoutRow, VendorRow};
use crate::types::{OrderId, VendorId, round_money};

/// Errors computing a payout statement.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayoutError {
    #[error("commission rate {0} is outside [0, 1]")]
    InvalidCommissionRate(Decimal),
    #[error("payout period ends before it starts")]
    InvalidPeriod,
}

/// What a vendor is owed for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutStatement {
    pub vendor_id: VendorId,
    pub vendor_name: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub order_count: u64,
    pub gross: Decimal,
    pub commission_rate: Decimal,
    pub commission: Decimal,
    pub net: Decimal,
    pub already_paid: Decimal,
    pub amount_due: Decimal,
}

/// Compute the payout statement for `vendor` over `period_start..=period_end`.
///
/// Only items of revenue-bearing orders placed inside the period count.
/// Payouts already paid or in flight are deducted when their own period lies
/// inside this one; a payout straddling either edge is left out. The amount
/// due never goes negative.
///
/// # Errors
///
/// Returns [`PayoutError::InvalidCommissionRate`] when the vendor's rate is
/// outside `[0, 1]` and [`PayoutError::InvalidPeriod`] for an inverted period.
pub fn compute_payout(
    vendor: &VendorRow,
    orders: &[OrderRow],
    items: &[OrderItemRow],
    prior_payouts: &[PayoutRow],
    period_start: NaiveDate,
    period_end: NaiveDate,
) -> Result<PayoutStatement, PayoutError> {
    if vendor.commission_rate < Decimal::ZERO || vendor.commission_rate > Decimal::ONE {
        return Err(PayoutError::InvalidCommissionRate(vendor.commission_rate));
    }
    if period_end < period_start {
        return Err(PayoutError::InvalidPeriod);
    }

    let in_period = |date: NaiveDate| period_start <= date && date <= period_end;
    let settled: Vec<OrderId> = orders
        .iter()
        .filter(|o| o.status.is_revenue_bearing() && in_period(o.created_at.date_naive()))
        .map(|o| o.id)
        .collect();

    let mut order_ids: Vec<OrderId> = Vec::new();
    let mut gross = Decimal::ZERO;
    for item in items
        .iter()
        .filter(|i| i.vendor_id == vendor.id && settled.contains(&i.order_id))
    {
        gross += item.line_total();
        if !order_ids.contains(&item.order_id) {
            order_ids.push(item.order_id);
        }
    }

    let gross = round_money(gross);
    let commission = round_money(gross * vendor.commission_rate);
    let net = gross - commission;
    let already_paid: Decimal = prior_payouts
        .iter()
        .filter(|p| {
            p.vendor_id == vendor.id
                && p.status.is_disbursed()
                && p.period_start >= period_start
                && p.period_end <= period_end
        })
        .map(|p| p.amount)
        .sum();

    Ok(PayoutStatement {
        vendor_id: vendor.id,
        vendor_name: vendor.name.clone(),
        period_start,
        period_end,
        order_count: order_ids.len() as u64,
        gross,
        commission_rate: vendor.commission_rate,
        commission,
        net,
        already_paid,
        amount_due: (net - already_paid).max(Decimal::ZERO),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::types::{OrderItemId, OrderStatus, PayoutId, PayoutStatus, ProductId};

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn day(m: u32, dd: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, dd).unwrap()
    }

    fn vendor(rate: &str) -> VendorRow {
        VendorRow {
            id: VendorId::new(7),
            name: "Ceramica".to_owned(),
            commission_rate: d(rate),
        }
    }

    fn order(id: i32, status: OrderStatus, month: u32) -> OrderRow {
        OrderRow {
            id: OrderId::new(id),
            buyer_id: None,
            registry_id: None,
            status,
            subtotal: Decimal::ZERO,
            discount_total: Decimal::ZERO,
            shipping_total: Decimal::ZERO,
            total: Decimal::ZERO,
            promo_code: None,
            created_at: Utc.with_ymd_and_hms(2026, month, 10, 12, 0, 0).unwrap(),
        }
    }

    fn item(order: i32, vendor: i32, qty: i32, price: &str, wrap: &str) -> OrderItemRow {
        OrderItemRow {
            id: OrderItemId::new(order * 10 + vendor),
            order_id: OrderId::new(order),
            product_id: ProductId::new(1),
            vendor_id: VendorId::new(vendor),
            quantity: qty,
            unit_price: d(price),
            gift_wrap_fee: d(wrap),
        }
    }

    fn payout(amount: &str, status: PayoutStatus) -> PayoutRow {
        PayoutRow {
            id: PayoutId::new(1),
            vendor_id: VendorId::new(7),
            amount: d(amount),
            status,
            period_start: day(3, 1),
            period_end: day(3, 31),
            created_at: Utc.with_ymd_and_hms(2026, 4, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_statement_nets_commission() {
        let orders = [
            order(1, OrderStatus::Paid, 3),
            order(2, OrderStatus::Delivered, 3),
            order(3, OrderStatus::Refunded, 3),
            order(4, OrderStatus::Paid, 4),
        ];
        let items = [
            item(1, 7, 2, "30.00", "4.00"),
            item(1, 8, 1, "99.00", "0"),
            item(2, 7, 1, "36.00", "0"),
            item(3, 7, 1, "500.00", "0"),
            item(4, 7, 1, "500.00", "0"),
        ];

        let statement =
            compute_payout(&vendor("0.125"), &orders, &items, &[], day(3, 1), day(3, 31))
                .unwrap();

        assert_eq!(statement.order_count, 2);
        assert_eq!(statement.gross, d("100.00"));
        assert_eq!(statement.commission, d("12.50"));
        assert_eq!(statement.net, d("87.50"));
        assert_eq!(statement.amount_due, d("87.50"));
    }

    #[test]
    fn test_prior_payouts_are_deducted() {
        let orders = [order(1, OrderStatus::Paid, 3)];
        let items = [item(1, 7, 1, "100.00", "0")];
        let prior = [
            payout("60.00", PayoutStatus::Paid),
            payout("25.00", PayoutStatus::Failed),
        ];

        let statement =
            compute_payout(&vendor("0.10"), &orders, &items, &prior, day(3, 1), day(3, 31))
                .unwrap();
        assert_eq!(statement.already_paid, d("60.00"));
        assert_eq!(statement.amount_due, d("30.00"));

        let overpaid = [payout("200.00", PayoutStatus::Processing)];
        let statement =
            compute_payout(&vendor("0.10"), &orders, &items, &overpaid, day(3, 1), day(3, 31))
                .unwrap();
        assert_eq!(statement.amount_due, Decimal::ZERO);
    }

    #[test]
    fn test_only_payouts_inside_the_period_are_deducted() {
        let orders = [order(1, OrderStatus::Paid, 3)];
        let items = [item(1, 7, 1, "100.00", "0")];
        let march = [payout("60.00", PayoutStatus::Paid)];

        // March 10 falls in the last-three-weeks window, the March payout does not
        let statement =
            compute_payout(&vendor("0.10"), &orders, &items, &march, day(3, 8), day(3, 31))
                .unwrap();
        assert_eq!(statement.already_paid, Decimal::ZERO);
        assert_eq!(statement.amount_due, d("90.00"));

        let statement =
            compute_payout(&vendor("0.10"), &orders, &items, &march, day(2, 15), day(4, 15))
                .unwrap();
        assert_eq!(statement.already_paid, d("60.00"));
        assert_eq!(statement.amount_due, d("30.00"));
    }

    #[test]
    fn test_invalid_inputs() {
        assert_eq!(
            compute_payout(&vendor("1.5"), &[], &[], &[], day(3, 1), day(3, 31)),
            Err(PayoutError::InvalidCommissionRate(d("1.5")))
        );
        assert_eq!(
            compute_payout(&vendor("0.1"), &[], &[], &[], day(3, 31), day(3, 1)),
            Err(PayoutError::InvalidPeriod)
        );
    }

    #[test]
    fn test_empty_period() {
        let statement =
            compute_payout(&vendor("0.2"), &[], &[], &[], day(3, 1), day(3, 31)).unwrap();
        assert_eq!(statement.gross, Decimal::ZERO);
        assert_eq!(statement.amount_due, Decimal::ZERO);
        assert_eq!(statement.order_count, 0);
    }
}
