//! Discount computation for a promo against a cart.

use rust_decimal::Decimal;

use super::{
    CartLine, DiscountBreakdown, DiscountKind, Promo, PromoContext, PromoRejection, PromoScope,
};
use crate::types::{MONEY_SCALE, round_money};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Largest line amount accepted, the bound of the `NUMERIC(12,2)` money columns.
// 9_999_999_999.99, i.e. mantissa 999_999_999_999 (0xE8_D4A5_0FFF) at scale 2
pub const MAX_LINE_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, 2);

/// Evaluate `promo` against the cart `lines`.
///
/// Checks run in a fixed order and the first failure is returned: promo
/// state (active, schedule, usage), shop scope, cart shape, eligibility, then
/// the minimum subtotal. The resulting breakdown always satisfies
/// `total_discount <= eligible_subtotal + eligible gift-wrap fees` and stays
/// within `max_discount` when the promo sets one.
///
/// # Errors
///
/// Returns the [`PromoRejection`] describing why the code does not apply.
pub fn evaluate_promo(
    promo: &Promo,
    lines: &[CartLine],
    ctx: &PromoContext,
) -> Result<DiscountBreakdown, PromoRejection> {
    check_promo_state(promo, ctx)?;

    if lines.is_empty() {
        return Err(PromoRejection::EmptyCart);
    }
    lines.iter().try_for_each(check_line)?;

    let eligible: Vec<&CartLine> = lines.iter().filter(|l| is_eligible(promo, l)).collect();
    if eligible.is_empty() {
        return Err(PromoRejection::NoEligibleItems);
    }

    let eligible_subtotal = checked_total(eligible.iter().map(|l| l.subtotal))?;
    if let Some(minimum) = promo.min_subtotal
        && eligible_subtotal < minimum
    {
        return Err(PromoRejection::MinimumNotMet { minimum });
    }

    let wrap_base: Decimal = if promo.includes_gift_wrap {
        checked_total(eligible.iter().map(|l| l.gift_wrap_fee))?
    } else {
        Decimal::ZERO
    };

    let (product_discount, gift_wrap_discount) = match promo.kind {
        DiscountKind::Percentage => {
            let rate = promo.value.clamp(Decimal::ZERO, HUNDRED) / HUNDRED;
            (
                round_money(eligible_subtotal * rate),
                round_money(wrap_base * rate),
            )
        }
        DiscountKind::FixedAmount => {
            let amount = round_money(promo.value.max(Decimal::ZERO));
            let product = amount.min(eligible_subtotal);
            (product, (amount - product).min(wrap_base))
        }
    };

    let (product_discount, gift_wrap_discount) =
        apply_cap(product_discount, gift_wrap_discount, promo.max_discount);

    Ok(DiscountBreakdown {
        product_discount,
        gift_wrap_discount,
        eligible_subtotal,
        total_discount: product_discount + gift_wrap_discount,
        eligible_line_count: eligible.len(),
    })
}

fn check_promo_state(promo: &Promo, ctx: &PromoContext) -> Result<(), PromoRejection> {
    if !promo.active {
        return Err(PromoRejection::Inactive);
    }
    if promo.starts_at.is_some_and(|start| start > ctx.now) {
        return Err(PromoRejection::NotStarted);
    }
    if promo.ends_at.is_some_and(|end| end <= ctx.now) {
        return Err(PromoRejection::Expired);
    }
    if promo
        .usage_limit
        .is_some_and(|limit| promo.usage_count >= limit)
    {
        return Err(PromoRejection::UsageLimitReached);
    }
    if let (Some(shop), Some(owner)) = (ctx.vendor_id, promo.vendor_id)
        && shop != owner
    {
        return Err(PromoRejection::VendorMismatch);
    }
    Ok(())
}

fn check_line(line: &CartLine) -> Result<(), PromoRejection> {
    if line.quantity <= 0 {
        return Err(PromoRejection::InvalidLine(format!(
            "product {} has quantity {}",
            line.product_id, line.quantity
        )));
    }
    for amount in [line.subtotal, line.gift_wrap_fee] {
        if amount.is_sign_negative() {
            return Err(PromoRejection::InvalidLine(format!(
                "product {} has a negative amount",
                line.product_id
            )));
        }
        if amount > MAX_LINE_AMOUNT {
            return Err(PromoRejection::InvalidLine(format!(
                "product {} exceeds the maximum amount of {MAX_LINE_AMOUNT}",
                line.product_id
            )));
        }
        if amount.normalize().scale() > MONEY_SCALE {
            return Err(PromoRejection::InvalidLine(format!(
                "product {} has an amount with fractional cents",
                line.product_id
            )));
        }
    }
    Ok(())
}

fn checked_total(mut amounts: impl Iterator<Item = Decimal>) -> Result<Decimal, PromoRejection> {
    amounts.try_fold(Decimal::ZERO, |total, amount| {
        total
            .checked_add(amount)
            .ok_or_else(|| PromoRejection::InvalidLine("cart total is too large".to_owned()))
    })
}

fn is_eligible(promo: &Promo, line: &CartLine) -> bool {
    let vendor_matches = promo.vendor_id.is_none_or(|v| v == line.vendor_id);
    let in_scope = match promo.scope {
        // A vendor-wide promo without a vendor covers nothing
        PromoScope::Vendor => promo.vendor_id.is_some() && vendor_matches,
        PromoScope::Products => vendor_matches && promo.product_ids.contains(&line.product_id),
    };
    let category_matches = promo.category_ids.is_empty()
        || line
            .category_ids
            .iter()
            .any(|c| promo.category_ids.contains(c));

    in_scope && category_matches && (!promo.shippable_only || line.shippable)
}

/// Cap the total at `cap`, taking from the gift-wrap share first.
fn apply_cap(product: Decimal, wrap: Decimal, cap: Option<Decimal>) -> (Decimal, Decimal) {
    let Some(cap) = cap.map(|c| round_money(c.max(Decimal::ZERO))) else {
        return (product, wrap);
    };
    let product = product.min(cap);
    let wrap = wrap.min(cap - product);
    (product, wrap)
}
