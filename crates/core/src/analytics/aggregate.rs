//! Reduction of fetched rows into an [`AnalyticsReport`].

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::{
    AnalyticsInput, AnalyticsReport, DailyRevenue, DailyVisitors, OrderRow, PathCount,
    PayoutMetrics, ProductRanking, PromoUsage, RegistryMetrics, RevenueMetrics, SignupMetrics,
    SupportMetrics, VendorRanking, VisitorMetrics, visitor_key,
};
use crate::types::{
    OrderId, OrderStatus, PayoutStatus, ProductId, TicketStatus, VendorId, round_money,
};

/// Decimal places kept for ratios.
const RATE_SCALE: u32 = 4;

/// Compute the dashboard report for `input`.
///
/// Deterministic: every map is ordered and every ranking has a total
/// tie-break ending on the entity id.
#[must_use]
pub fn aggregate(input: &AnalyticsInput) -> AnalyticsReport {
    let window = input.window;
    let in_window: Vec<&OrderRow> = input
        .orders
        .iter()
        .filter(|o| window.contains(o.created_at))
        .collect();
    let sales: HashMap<OrderId, &OrderRow> = in_window
        .iter()
        .filter(|o| o.status.is_revenue_bearing())
        .map(|o| (o.id, *o))
        .collect();

    let (top_vendors, platform_commission) = rank_vendors(input, &sales);

    AnalyticsReport {
        window,
        revenue: revenue(&in_window, platform_commission),
        daily: daily_revenue(&in_window),
        top_vendors,
        top_products: rank_products(input, &sales),
        registries: registry_metrics(input),
        visitors: visitor_metrics(input),
        promos: promo_usage(&in_window),
        signups: signups(input),
        payouts: payout_metrics(input),
        support: support_metrics(input),
    }
}

fn revenue(orders: &[&OrderRow], platform_commission: Decimal) -> RevenueMetrics {
    let mut metrics = RevenueMetrics {
        platform_commission,
        ..RevenueMetrics::default()
    };

    for order in orders {
        match order.status {
            status if status.is_revenue_bearing() => {
                metrics.gross_sales += order.subtotal;
                metrics.discounts += order.discount_total;
                metrics.shipping += order.shipping_total;
                metrics.net_sales += order.total;
                metrics.order_count += 1;
            }
            OrderStatus::Cancelled => metrics.cancelled_orders += 1,
            OrderStatus::Refunded => metrics.refunded_total += order.total,
            _ => {}
        }
    }

    if metrics.order_count > 0 {
        metrics.average_order_value =
            round_money(metrics.net_sales / Decimal::from(metrics.order_count));
    }
    metrics
}

fn daily_revenue(orders: &[&OrderRow]) -> Vec<DailyRevenue> {
    let mut days: BTreeMap<NaiveDate, (Decimal, u64)> = BTreeMap::new();
    for order in orders.iter().filter(|o| o.status.is_revenue_bearing()) {
        let entry = days.entry(order.created_at.date_naive()).or_default();
        entry.0 += order.total;
        entry.1 += 1;
    }
    days.into_iter()
        .map(|(date, (net_sales, orders))| DailyRevenue {
            date,
            net_sales,
            orders,
        })
        .collect()
}

#[derive(Default)]
struct VendorTally {
    revenue: Decimal,
    units: u64,
    orders: BTreeSet<OrderId>,
    commission: Decimal,
}

/// Rank vendors by revenue; also returns the total platform commission.
fn rank_vendors(
    input: &AnalyticsInput,
    sales: &HashMap<OrderId, &OrderRow>,
) -> (Vec<VendorRanking>, Decimal) {
    let vendors: HashMap<VendorId, _> = input.vendors.iter().map(|v| (v.id, v)).collect();
    let mut tallies: BTreeMap<VendorId, VendorTally> = BTreeMap::new();

    for item in input
        .order_items
        .iter()
        .filter(|i| sales.contains_key(&i.order_id))
    {
        let rate = vendors
            .get(&item.vendor_id)
            .map_or(Decimal::ZERO, |v| v.commission_rate);
        let line_total = item.line_total();
        let tally = tallies.entry(item.vendor_id).or_default();
        tally.revenue += line_total;
        tally.units += u64::try_from(item.quantity).unwrap_or(0);
        tally.orders.insert(item.order_id);
        tally.commission += round_money(line_total * rate);
    }

    let platform_commission: Decimal = tallies.values().map(|t| t.commission).sum();

    let mut rankings: Vec<VendorRanking> = tallies
        .into_iter()
        .map(|(vendor_id, tally)| VendorRanking {
            vendor_id,
            name: vendors
                .get(&vendor_id)
                .map_or_else(|| format!("Vendor {vendor_id}"), |v| v.name.clone()),
            revenue: tally.revenue,
            units: tally.units,
            orders: tally.orders.len() as u64,
            commission: tally.commission,
        })
        .collect();
    rankings.sort_by(|a, b| {
        b.revenue
            .cmp(&a.revenue)
            .then(b.units.cmp(&a.units))
            .then(a.vendor_id.cmp(&b.vendor_id))
    });
    rankings.truncate(input.top_n);

    (rankings, platform_commission)
}

fn rank_products(
    input: &AnalyticsInput,
    sales: &HashMap<OrderId, &OrderRow>,
) -> Vec<ProductRanking> {
    let names: HashMap<ProductId, &str> = input
        .products
        .iter()
        .map(|p| (p.id, p.name.as_str()))
        .collect();
    let mut tallies: BTreeMap<ProductId, (u64, Decimal)> = BTreeMap::new();

    for item in input
        .order_items
        .iter()
        .filter(|i| sales.contains_key(&i.order_id))
    {
        let tally = tallies.entry(item.product_id).or_default();
        tally.0 += u64::try_from(item.quantity).unwrap_or(0);
        tally.1 += item.line_total();
    }

    let mut rankings: Vec<ProductRanking> = tallies
        .into_iter()
        .map(|(product_id, (units, revenue))| ProductRanking {
            product_id,
            name: names
                .get(&product_id)
                .map_or_else(|| format!("Product {product_id}"), |n| (*n).to_owned()),
            units,
            revenue,
        })
        .collect();
    rankings.sort_by(|a, b| {
        b.units
            .cmp(&a.units)
            .then(b.revenue.cmp(&a.revenue))
            .then(a.product_id.cmp(&b.product_id))
    });
    rankings.truncate(input.top_n);
    rankings
}

fn registry_metrics(input: &AnalyticsInput) -> RegistryMetrics {
    let mut metrics = RegistryMetrics {
        total: input.registries.len() as u64,
        ..RegistryMetrics::default()
    };

    for registry in &input.registries {
        if input.window.contains(registry.created_at) {
            metrics.created_in_window += 1;
        }
        if registry.event_date.is_none_or(|date| date >= input.today) {
            metrics.active += 1;
        }
    }

    // (requested, purchased) per registry
    let mut per_registry: BTreeMap<_, (u64, u64)> = BTreeMap::new();
    for item in &input.registry_items {
        let requested = u64::try_from(item.quantity_requested).unwrap_or(0);
        let purchased = u64::try_from(item.quantity_purchased)
            .unwrap_or(0)
            .min(requested);
        let entry = per_registry.entry(item.registry_id).or_default();
        entry.0 += requested;
        entry.1 += purchased;
    }

    for (requested, purchased) in per_registry.values() {
        metrics.items_requested += requested;
        metrics.items_purchased += purchased;
        if *requested > 0 && purchased == requested {
            metrics.fully_fulfilled += 1;
        }
    }

    if metrics.items_requested > 0 {
        metrics.fulfillment_rate = (Decimal::from(metrics.items_purchased)
            / Decimal::from(metrics.items_requested))
        .round_dp(RATE_SCALE);
    }
    metrics
}

fn visitor_metrics(input: &AnalyticsInput) -> VisitorMetrics {
    let mut unique: BTreeSet<String> = BTreeSet::new();
    let mut daily: BTreeMap<NaiveDate, BTreeSet<String>> = BTreeMap::new();
    let mut paths: BTreeMap<&str, u64> = BTreeMap::new();
    let mut total_visits = 0;

    for visit in input
        .visits
        .iter()
        .filter(|v| input.window.contains(v.created_at))
    {
        total_visits += 1;
        let key = visitor_key(visit);
        daily
            .entry(visit.created_at.date_naive())
            .or_default()
            .insert(key.clone());
        unique.insert(key);
        *paths.entry(visit.path.as_str()).or_default() += 1;
    }

    let mut top_paths: Vec<PathCount> = paths
        .into_iter()
        .map(|(path, visits)| PathCount {
            path: path.to_owned(),
            visits,
        })
        .collect();
    // BTreeMap order is the path tie-break; the sort is stable
    top_paths.sort_by(|a, b| b.visits.cmp(&a.visits));
    top_paths.truncate(input.top_n);

    VisitorMetrics {
        total_visits,
        unique_visitors: unique.len() as u64,
        daily_unique: daily
            .into_iter()
            .map(|(date, keys)| DailyVisitors {
                date,
                unique_visitors: keys.len() as u64,
            })
            .collect(),
        top_paths,
    }
}

fn promo_usage(orders: &[&OrderRow]) -> Vec<PromoUsage> {
    let mut usage: BTreeMap<String, (u64, Decimal)> = BTreeMap::new();
    for order in orders.iter().filter(|o| o.status.is_revenue_bearing()) {
        let Some(code) = order
            .promo_code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
        else {
            continue;
        };
        let entry = usage.entry(code.to_ascii_uppercase()).or_default();
        entry.0 += 1;
        entry.1 += order.discount_total;
    }

    let mut promos: Vec<PromoUsage> = usage
        .into_iter()
        .map(|(code, (redemptions, discount_total))| PromoUsage {
            code,
            redemptions,
            discount_total,
        })
        .collect();
    promos.sort_by(|a, b| b.redemptions.cmp(&a.redemptions));
    promos
}

fn signups(input: &AnalyticsInput) -> SignupMetrics {
    let mut metrics = SignupMetrics::default();
    for profile in input
        .profiles
        .iter()
        .filter(|p| input.window.contains(p.created_at))
    {
        metrics.total += 1;
        *metrics.by_role.entry(profile.role).or_default() += 1;
    }
    metrics
}

fn payout_metrics(input: &AnalyticsInput) -> PayoutMetrics {
    let mut metrics = PayoutMetrics::default();
    for payout in &input.payouts {
        match payout.status {
            PayoutStatus::Pending | PayoutStatus::Processing => {
                metrics.pending_amount += payout.amount;
            }
            PayoutStatus::Paid => metrics.paid_amount += payout.amount,
            PayoutStatus::Failed => metrics.failed_count += 1,
        }
    }
    metrics
}

fn support_metrics(input: &AnalyticsInput) -> SupportMetrics {
    let mut metrics = SupportMetrics::default();
    for ticket in &input.tickets {
        match ticket.status {
            TicketStatus::Open => metrics.open += 1,
            TicketStatus::InProgress => metrics.in_progress += 1,
            TicketStatus::Resolved => metrics.resolved += 1,
            TicketStatus::Closed => metrics.closed += 1,
        }
    }
    metrics
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::too_many_lines)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};

    use super::*;
    use crate::analytics::{
        DateWindow, OrderItemRow, PayoutRow, ProductRow, ProfileRow, RegistryItemRow,
        RegistryRow, TicketRow, VendorRow, VisitRow,
    };
    use crate::types::{
        OrderItemId, PayoutId, ProfileId, ProfileRole, RegistryId, RegistryItemId, TicketId,
    };

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, day, hour, 0, 0).unwrap()
    }

    fn window() -> DateWindow {
        DateWindow::from_days(
            NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 4, 30).unwrap(),
        )
        .unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, 30).unwrap()
    }

    fn order(id: i32, status: OrderStatus, total: &str, created_at: DateTime<Utc>) -> OrderRow {
        OrderRow {
            id: OrderId::new(id),
            buyer_id: None,
            registry_id: None,
            status,
            subtotal: d(total),
            discount_total: Decimal::ZERO,
            shipping_total: Decimal::ZERO,
            total: d(total),
            promo_code: None,
            created_at,
        }
    }

    fn item(id: i32, order: i32, product: i32, vendor: i32, qty: i32, price: &str) -> OrderItemRow {
        OrderItemRow {
            id: OrderItemId::new(id),
            order_id: OrderId::new(order),
            product_id: ProductId::new(product),
            vendor_id: VendorId::new(vendor),
            quantity: qty,
            unit_price: d(price),
            gift_wrap_fee: Decimal::ZERO,
        }
    }

    fn vendor(id: i32, name: &str, rate: &str) -> VendorRow {
        VendorRow {
            id: VendorId::new(id),
            name: name.to_owned(),
            commission_rate: d(rate),
        }
    }

    fn visit(profile: Option<i32>, session: Option<&str>, path: &str, day: u32) -> VisitRow {
        VisitRow {
            profile_id: profile.map(ProfileId::new),
            session_id: session.map(str::to_owned),
            ip_address: None,
            user_agent: None,
            path: path.to_owned(),
            created_at: at(day, 10),
        }
    }

    fn sample_input() -> AnalyticsInput {
        let mut input = AnalyticsInput::empty(window(), today());
        let mut promo_order = order(2, OrderStatus::Shipped, "45.00", at(3, 15));
        promo_order.subtotal = d("50.00");
        promo_order.discount_total = d("5.00");
        promo_order.promo_code = Some(" spring ".to_owned());

        input.orders = vec![
            order(1, OrderStatus::Paid, "100.00", at(2, 9)),
            promo_order,
            order(3, OrderStatus::Cancelled, "80.00", at(3, 16)),
            order(4, OrderStatus::Refunded, "20.00", at(4, 8)),
            order(
                5,
                OrderStatus::Paid,
                "999.00",
                Utc.with_ymd_and_hms(2026, 3, 31, 23, 0, 0).unwrap(),
            ),
            order(6, OrderStatus::Delivered, "30.00", at(2, 20)),
        ];
        let mut wrapped = item(3, 2, 12, 20, 1, "45.00");
        wrapped.gift_wrap_fee = d("5.00");
        input.order_items = vec![
            item(1, 1, 10, 20, 2, "25.00"),
            item(2, 1, 11, 21, 1, "50.00"),
            wrapped,
            item(4, 3, 10, 20, 4, "20.00"),
            item(5, 5, 11, 21, 10, "99.90"),
            item(6, 6, 13, 22, 1, "30.00"),
        ];
        input.vendors = vec![
            vendor(20, "Linen & Co", "0.10"),
            vendor(21, "Ceramica", "0.15"),
            vendor(22, "Paper Goods", "0.20"),
        ];
        input.products = vec![
            ProductRow {
                id: ProductId::new(10),
                vendor_id: VendorId::new(20),
                name: "Tea Towels".to_owned(),
            },
            ProductRow {
                id: ProductId::new(11),
                vendor_id: VendorId::new(21),
                name: "Serving Bowl".to_owned(),
            },
        ];
        input
    }

    #[test]
    fn test_empty_input_yields_zeroed_report() {
        let report = aggregate(&AnalyticsInput::empty(window(), today()));

        assert_eq!(report.revenue, RevenueMetrics::default());
        assert!(report.daily.is_empty());
        assert!(report.top_vendors.is_empty());
        assert!(report.top_products.is_empty());
        assert_eq!(report.registries, RegistryMetrics::default());
        assert_eq!(report.visitors, VisitorMetrics::default());
        assert!(report.promos.is_empty());
        assert_eq!(report.signups.total, 0);
        assert_eq!(report.payouts, PayoutMetrics::default());
        assert_eq!(report.support, SupportMetrics::default());
    }

    #[test]
    fn test_revenue_counts_only_sales_in_window() {
        let report = aggregate(&sample_input());
        let revenue = &report.revenue;

        assert_eq!(revenue.order_count, 3);
        assert_eq!(revenue.gross_sales, d("180.00"));
        assert_eq!(revenue.discounts, d("5.00"));
        assert_eq!(revenue.net_sales, d("175.00"));
        assert_eq!(revenue.average_order_value, d("58.33"));
        assert_eq!(revenue.cancelled_orders, 1);
        assert_eq!(revenue.refunded_total, d("20.00"));
        // 50*0.10 + 50*0.15 + 50*0.10 + 30*0.20
        assert_eq!(revenue.platform_commission, d("23.50"));
    }

    #[test]
    fn test_daily_series_is_sorted() {
        let report = aggregate(&sample_input());
        let days: Vec<_> = report
            .daily
            .iter()
            .map(|d| (d.date.to_string(), d.orders))
            .collect();
        assert_eq!(
            days,
            vec![("2026-04-02".to_owned(), 2), ("2026-04-03".to_owned(), 1)]
        );
        assert_eq!(report.daily[0].net_sales, d("130.00"));
    }

    #[test]
    fn test_vendor_ranking_and_tie_break() {
        let report = aggregate(&sample_input());
        let ranking: Vec<_> = report
            .top_vendors
            .iter()
            .map(|v| (v.vendor_id.as_i32(), v.revenue, v.units, v.orders))
            .collect();

        // Linen & Co: 50 (order 1) + 50 (order 2 incl. wrap) across 2 orders
        // Ceramica: 50, one unit; Paper Goods: 30
        assert_eq!(
            ranking,
            vec![
                (20, d("100.00"), 3, 2),
                (21, d("50.00"), 1, 1),
                (22, d("30.00"), 1, 1),
            ]
        );
        assert_eq!(report.top_vendors[0].name, "Linen & Co");

        let mut input = sample_input();
        input.top_n = 1;
        assert_eq!(aggregate(&input).top_vendors.len(), 1);
    }

    #[test]
    fn test_product_ranking_by_units() {
        let report = aggregate(&sample_input());
        let ranking: Vec<_> = report
            .top_products
            .iter()
            .map(|p| (p.product_id.as_i32(), p.units))
            .collect();
        assert_eq!(ranking, vec![(10, 2), (11, 1), (12, 1), (13, 1)]);
        assert_eq!(report.top_products[0].name, "Tea Towels");
        assert_eq!(report.top_products[2].name, "Product 12");
    }

    #[test]
    fn test_promo_usage_normalises_codes() {
        let report = aggregate(&sample_input());
        assert_eq!(
            report.promos,
            vec![PromoUsage {
                code: "SPRING".to_owned(),
                redemptions: 1,
                discount_total: d("5.00"),
            }]
        );
    }

    #[test]
    fn test_registry_fulfillment() {
        let mut input = AnalyticsInput::empty(window(), today());
        input.registries = vec![
            RegistryRow {
                id: RegistryId::new(1),
                host_id: ProfileId::new(1),
                title: "Ana & Bo".to_owned(),
                event_date: NaiveDate::from_ymd_opt(2026, 6, 1),
                created_at: at(5, 12),
            },
            RegistryRow {
                id: RegistryId::new(2),
                host_id: ProfileId::new(2),
                title: "Baby Lee".to_owned(),
                event_date: NaiveDate::from_ymd_opt(2026, 1, 1),
                created_at: Utc.with_ymd_and_hms(2025, 11, 1, 0, 0, 0).unwrap(),
            },
        ];
        let reg_item = |id, registry, requested, purchased| RegistryItemRow {
            id: RegistryItemId::new(id),
            registry_id: RegistryId::new(registry),
            product_id: ProductId::new(id),
            quantity_requested: requested,
            quantity_purchased: purchased,
        };
        input.registry_items = vec![
            reg_item(1, 1, 4, 2),
            reg_item(2, 1, 2, 0),
            // over-purchase counts only up to the request
            reg_item(3, 2, 1, 3),
        ];

        let metrics = aggregate(&input).registries;

        assert_eq!(metrics.total, 2);
        assert_eq!(metrics.created_in_window, 1);
        assert_eq!(metrics.active, 1);
        assert_eq!(metrics.items_requested, 7);
        assert_eq!(metrics.items_purchased, 3);
        assert_eq!(metrics.fully_fulfilled, 1);
        assert_eq!(metrics.fulfillment_rate, d("0.4286"));
    }

    #[test]
    fn test_visitor_uniqueness() {
        let mut input = AnalyticsInput::empty(window(), today());
        input.top_n = 2;
        input.visits = vec![
            visit(Some(1), Some("s1"), "/registry/1", 1),
            visit(Some(1), Some("s2"), "/", 1),
            visit(None, Some("s3"), "/", 1),
            visit(None, Some("s3"), "/shop", 2),
            visit(Some(1), None, "/shop", 2),
            visit(None, None, "/", 2),
        ];
        let mut outside = visit(Some(99), None, "/", 1);
        outside.created_at = Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap();
        input.visits.push(outside);

        let metrics = aggregate(&input).visitors;

        assert_eq!(metrics.total_visits, 6);
        // profile:1, session:s3, anonymous
        assert_eq!(metrics.unique_visitors, 3);
        let daily: Vec<_> = metrics.daily_unique.iter().map(|d| d.unique_visitors).collect();
        assert_eq!(daily, vec![2, 3]);
        assert_eq!(
            metrics.top_paths,
            vec![
                PathCount {
                    path: "/".to_owned(),
                    visits: 3
                },
                PathCount {
                    path: "/shop".to_owned(),
                    visits: 2
                },
            ]
        );
    }

    #[test]
    fn test_snapshot_metrics() {
        let mut input = AnalyticsInput::empty(window(), today());
        let payout = |id, amount: &str, status| PayoutRow {
            id: PayoutId::new(id),
            vendor_id: VendorId::new(1),
            amount: d(amount),
            status,
            period_start: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            period_end: NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
            created_at: at(1, 0),
        };
        input.payouts = vec![
            payout(1, "100.00", PayoutStatus::Pending),
            payout(2, "50.00", PayoutStatus::Processing),
            payout(3, "75.00", PayoutStatus::Paid),
            payout(4, "10.00", PayoutStatus::Failed),
        ];
        input.tickets = [TicketStatus::Open, TicketStatus::Open, TicketStatus::Closed]
            .into_iter()
            .enumerate()
            .map(|(i, status)| TicketRow {
                id: TicketId::new(i32::try_from(i).unwrap()),
                status,
                created_at: at(1, 0),
            })
            .collect();
        input.profiles = vec![
            ProfileRow {
                id: ProfileId::new(1),
                role: ProfileRole::Host,
                created_at: at(2, 0),
            },
            ProfileRow {
                id: ProfileId::new(2),
                role: ProfileRole::Host,
                created_at: at(3, 0),
            },
            ProfileRow {
                id: ProfileId::new(3),
                role: ProfileRole::Vendor,
                created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            },
        ];

        let report = aggregate(&input);

        assert_eq!(report.payouts.pending_amount, d("150.00"));
        assert_eq!(report.payouts.paid_amount, d("75.00"));
        assert_eq!(report.payouts.failed_count, 1);
        assert_eq!(report.support.open, 2);
        assert_eq!(report.support.closed, 1);
        assert_eq!(report.signups.total, 2);
        assert_eq!(report.signups.by_role.get(&ProfileRole::Host), Some(&2));
        assert_eq!(report.signups.by_role.get(&ProfileRole::Vendor), None);
    }

    #[test]
    fn test_recomputation_is_identical() {
        let input = sample_input();
        let first = aggregate(&input);
        let second = aggregate(&input);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
