use std::collections::{BTreeMap, BTreeSet};

use chrono::{Duration, NaiveDate};

use super::stats;
use crate::domain::entities::features::{DemandSource, ProductFeatures};
use crate::domain::entities::order::OrderRecord;
use crate::domain::entities::product::ProductSnapshot;
use crate::domain::entities::sales::SalesRecord;
use crate::domain::value_objects::intensity::Intensity;
use crate::domain::value_objects::thresholds::ThresholdSet;

/// Products with fewer distinct sale days are flagged as insufficient data.
pub const MIN_ACTIVE_DAYS: u32 = 2;
/// Below this many sale days, recent orders may stand in for sales.
pub const CORROBORATION_DAYS: u32 = 3;
/// How far back order line items are considered as demand.
pub const ORDER_WINDOW_DAYS: i64 = 14;

/// Units and revenue across all products for one calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub units: f64,
    pub revenue: f64,
}

/// First day of the sales window ending before `as_of`.
#[must_use]
pub fn window_start(as_of: NaiveDate, sales_days: u32) -> NaiveDate {
    as_of - Duration::days(i64::from(sales_days))
}

/// Builds demand features for every product, sorted by product id.
#[must_use]
pub fn build_features(
    products: &[ProductSnapshot],
    sales: &[SalesRecord],
    orders: &[OrderRecord],
    as_of: NaiveDate,
    sales_days: u32,
    thresholds: &ThresholdSet,
) -> Vec<ProductFeatures> {
    let start = window_start(as_of, sales_days);

    let mut sold: BTreeMap<&str, BTreeMap<NaiveDate, f64>> = BTreeMap::new();
    for record in sales.iter().filter(|s| s.date >= start && s.date < as_of) {
        *sold
            .entry(record.product_id.as_str())
            .or_default()
            .entry(record.date)
            .or_insert(0.0) += record.quantity_sold.max(0.0);
    }

    let ordered = order_demand(orders, as_of);

    let ids: BTreeSet<&str> = products.iter().map(|p| p.product_id.as_str()).collect();
    ids.into_iter()
        .map(|id| match sold.get(id) {
            None => ProductFeatures::empty(id),
            Some(days) => {
                let mut source = DemandSource::Sales;
                let mut chosen = days;
                if (days.len() as u32) < CORROBORATION_DAYS {
                    if let Some(from_orders) = ordered.get(id) {
                        if from_orders.len() > days.len() {
                            source = DemandSource::Orders;
                            chosen = from_orders;
                        }
                    }
                }
                features_from_days(id, chosen, as_of, source, thresholds)
            }
        })
        .collect()
}

/// Dense per-day totals across all sales in the window. Empty when there are
/// no sales.
#[must_use]
pub fn daily_totals(sales: &[SalesRecord], as_of: NaiveDate, sales_days: u32) -> Vec<DailyTotal> {
    let start = window_start(as_of, sales_days);
    let mut by_day: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();
    for record in sales.iter().filter(|s| s.date >= start && s.date < as_of) {
        let entry = by_day.entry(record.date).or_insert((0.0, 0.0));
        entry.0 += record.quantity_sold.max(0.0);
        entry.1 += record.total_amount.max(0.0);
    }

    let Some(first) = by_day.keys().next().copied() else {
        return Vec::new();
    };
    first
        .iter_days()
        .take_while(|d| *d < as_of)
        .map(|date| {
            let (units, revenue) = by_day.get(&date).copied().unwrap_or((0.0, 0.0));
            DailyTotal {
                date,
                units,
                revenue,
            }
        })
        .collect()
}

/// Revenue of the seven days before `as_of`.
#[must_use]
pub fn trailing_week_revenue(totals: &[DailyTotal], as_of: NaiveDate) -> f64 {
    let start = as_of - Duration::days(7);
    totals
        .iter()
        .filter(|t| t.date >= start && t.date < as_of)
        .map(|t| t.revenue)
        .sum()
}

fn order_demand(orders: &[OrderRecord], as_of: NaiveDate) -> BTreeMap<&str, BTreeMap<NaiveDate, f64>> {
    let start = as_of - Duration::days(ORDER_WINDOW_DAYS);
    let mut demand: BTreeMap<&str, BTreeMap<NaiveDate, f64>> = BTreeMap::new();
    for order in orders.iter().filter(|o| o.status.counts_as_demand()) {
        let day = order.created_at.date_naive();
        if day < start || day >= as_of {
            continue;
        }
        for item in &order.line_items {
            *demand
                .entry(item.product_id.as_str())
                .or_default()
                .entry(day)
                .or_insert(0.0) += item.quantity.max(0.0);
        }
    }
    demand
}

fn features_from_days(
    product_id: &str,
    days: &BTreeMap<NaiveDate, f64>,
    as_of: NaiveDate,
    source: DemandSource,
    thresholds: &ThresholdSet,
) -> ProductFeatures {
    let Some(first) = days.keys().next().copied() else {
        return ProductFeatures::empty(product_id);
    };
    let series: Vec<f64> = first
        .iter_days()
        .take_while(|d| *d < as_of)
        .map(|d| days.get(&d).copied().unwrap_or(0.0))
        .collect();

    let active_days = days.values().filter(|u| **u > 0.0).count() as u32;
    let trend_slope = if active_days < 2 {
        0.0
    } else {
        stats::slope(&series)
    };
    let cv = stats::coefficient_of_variation(&series);

    ProductFeatures {
        product_id: product_id.to_string(),
        history_days: series.len() as u32,
        active_days,
        avg_daily_units: stats::mean(&series),
        trend_slope,
        coefficient_of_variation: cv,
        volatility: Intensity::from_variation(cv, thresholds.volatility_low, thresholds.volatility_high),
        insufficient_data: active_days < MIN_ACTIVE_DAYS,
        demand_source: source,
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::domain::entities::order::{OrderLineItem, OrderStatus};
    use chrono::{TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn sale(product: &str, day: NaiveDate, qty: f64) -> SalesRecord {
        SalesRecord {
            product_id: product.to_string(),
            date: day,
            quantity_sold: qty,
            unit_price: 2.0,
            total_amount: qty * 2.0,
        }
    }

    fn product(id: &str) -> ProductSnapshot {
        ProductSnapshot {
            product_id: id.to_string(),
            name: id.to_uppercase(),
            category: String::new(),
            current_stock: 10.0,
            unit_price: 2.0,
            expiration_date: None,
        }
    }

    fn order(day: NaiveDate, product: &str, qty: f64, status: OrderStatus) -> OrderRecord {
        OrderRecord {
            order_id: format!("o-{day}-{product}"),
            created_at: Utc
                .from_utc_datetime(&day.and_hms_opt(12, 0, 0).expect("valid time")),
            line_items: vec![OrderLineItem {
                product_id: product.to_string(),
                quantity: qty,
                amount: qty * 2.0,
            }],
            status,
        }
    }

    #[test]
    fn series_is_zero_filled_between_sale_days() {
        let as_of = date(2025, 3, 11);
        let sales = vec![
            sale("p1", date(2025, 3, 1), 10.0),
            sale("p1", date(2025, 3, 5), 10.0),
        ];
        let features = build_features(
            &[product("p1")],
            &sales,
            &[],
            as_of,
            90,
            &ThresholdSet::default(),
        );
        let f = &features[0];
        // 2025-03-01 through 2025-03-10
        assert_eq!(f.history_days, 10);
        assert_eq!(f.active_days, 2);
        assert!((f.avg_daily_units - 2.0).abs() < 1e-9);
        assert!(!f.insufficient_data);
        assert_eq!(f.demand_source, DemandSource::Sales);
    }

    #[test]
    fn product_without_sales_is_insufficient() {
        let features = build_features(
            &[product("p1")],
            &[],
            &[],
            date(2025, 3, 11),
            90,
            &ThresholdSet::default(),
        );
        assert_eq!(features.len(), 1);
        assert!(features[0].insufficient_data);
        assert!((features[0].avg_daily_units).abs() < 1e-9);
        assert!((features[0].trend_slope).abs() < 1e-9);
    }

    #[test]
    fn single_sale_day_has_zero_slope() {
        let as_of = date(2025, 3, 11);
        let sales = vec![sale("p1", date(2025, 3, 10), 4.0)];
        let features = build_features(
            &[product("p1")],
            &sales,
            &[],
            as_of,
            90,
            &ThresholdSet::default(),
        );
        assert!((features[0].trend_slope).abs() < 1e-9);
        assert!(features[0].insufficient_data);
    }

    #[test]
    fn rising_sales_have_positive_slope() {
        let as_of = date(2025, 3, 6);
        let sales: Vec<SalesRecord> = (1..=5)
            .map(|d| sale("p1", date(2025, 3, d), f64::from(d)))
            .collect();
        let features = build_features(
            &[product("p1")],
            &sales,
            &[],
            as_of,
            90,
            &ThresholdSet::default(),
        );
        assert!((features[0].trend_slope - 1.0).abs() < 1e-9);
    }

    #[test]
    fn sales_outside_window_are_ignored() {
        let as_of = date(2025, 3, 11);
        let sales = vec![
            sale("p1", date(2024, 1, 1), 100.0),
            sale("p1", as_of, 100.0),
            sale("p1", date(2025, 3, 9), 3.0),
            sale("p1", date(2025, 3, 10), 3.0),
        ];
        let features = build_features(
            &[product("p1")],
            &sales,
            &[],
            as_of,
            30,
            &ThresholdSet::default(),
        );
        assert_eq!(features[0].history_days, 2);
        assert!((features[0].avg_daily_units - 3.0).abs() < 1e-9);
    }

    #[test]
    fn sparse_sales_are_corroborated_by_orders() {
        let as_of = date(2025, 3, 11);
        let sales = vec![sale("p1", date(2025, 3, 10), 2.0)];
        let orders = vec![
            order(date(2025, 3, 6), "p1", 2.0, OrderStatus::Completed),
            order(date(2025, 3, 7), "p1", 2.0, OrderStatus::Completed),
            order(date(2025, 3, 8), "p1", 2.0, OrderStatus::Pending),
            order(date(2025, 3, 9), "p1", 50.0, OrderStatus::Cancelled),
        ];
        let features = build_features(
            &[product("p1")],
            &sales,
            &orders,
            as_of,
            90,
            &ThresholdSet::default(),
        );
        let f = &features[0];
        assert_eq!(f.demand_source, DemandSource::Orders);
        assert_eq!(f.active_days, 3);
        assert!(!f.insufficient_data);
    }

    #[test]
    fn orders_alone_do_not_create_history() {
        let as_of = date(2025, 3, 11);
        let orders = vec![
            order(date(2025, 3, 8), "p1", 2.0, OrderStatus::Completed),
            order(date(2025, 3, 9), "p1", 2.0, OrderStatus::Completed),
            order(date(2025, 3, 10), "p1", 2.0, OrderStatus::Completed),
        ];
        let features = build_features(
            &[product("p1")],
            &[],
            &orders,
            as_of,
            90,
            &ThresholdSet::default(),
        );
        assert!(features[0].insufficient_data);
        assert_eq!(features[0].demand_source, DemandSource::None);
    }

    #[test]
    fn features_are_sorted_and_deduplicated() {
        let features = build_features(
            &[product("b"), product("a"), product("b")],
            &[],
            &[],
            date(2025, 3, 11),
            90,
            &ThresholdSet::default(),
        );
        let ids: Vec<&str> = features.iter().map(|f| f.product_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn daily_totals_are_dense() {
        let as_of = date(2025, 3, 5);
        let sales = vec![
            sale("p1", date(2025, 3, 1), 1.0),
            sale("p2", date(2025, 3, 1), 2.0),
            sale("p1", date(2025, 3, 3), 4.0),
        ];
        let totals = daily_totals(&sales, as_of, 90);
        assert_eq!(totals.len(), 4);
        assert!((totals[0].units - 3.0).abs() < 1e-9);
        assert!((totals[1].units).abs() < 1e-9);
        assert!((totals[2].revenue - 8.0).abs() < 1e-9);
        assert!(daily_totals(&[], as_of, 90).is_empty());
    }

    #[test]
    fn trailing_week_sums_last_seven_days() {
        let as_of = date(2025, 3, 15);
        let sales: Vec<SalesRecord> = (1..=14)
            .map(|d| sale("p1", date(2025, 3, d), 1.0))
            .collect();
        let totals = daily_totals(&sales, as_of, 90);
        assert!((trailing_week_revenue(&totals, as_of) - 14.0).abs() < 1e-9);
    }
}
