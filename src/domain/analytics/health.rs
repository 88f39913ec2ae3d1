use chrono::NaiveDate;

use super::stats::{bound, round_to};
use crate::domain::entities::health::BusinessHealth;
use crate::domain::entities::product::ProductSnapshot;
use crate::domain::entities::risk::{RiskDriver, RiskProfile};
use crate::domain::value_objects::intensity::Intensity;
use crate::domain::value_objects::risk_level::RiskLevel;
use crate::domain::value_objects::thresholds::ThresholdSet;

/// Computes business health from the ranked risk profiles.
///
/// `units_sold` covers the whole sales window. Average stock over the window
/// is estimated as the midpoint between current stock and current stock plus
/// everything sold since the window opened.
#[must_use]
pub fn score(
    profiles: &[RiskProfile],
    products: &[ProductSnapshot],
    units_sold: f64,
    as_of: NaiveDate,
    thresholds: &ThresholdSet,
) -> BusinessHealth {
    let sold = units_sold.max(0.0);
    let on_hand: f64 = products.iter().map(ProductSnapshot::stock_on_hand).sum();

    let average_stock = on_hand + sold / 2.0;
    let inventory_turnover = if average_stock > 0.0 {
        sold / average_stock
    } else {
        0.0
    };

    let tracks_expiry = products.iter().any(|p| p.expiration_date.is_some());
    let expired: f64 = products
        .iter()
        .filter(|p| p.is_expired(as_of))
        .map(ProductSnapshot::stock_on_hand)
        .sum();
    let handled = sold + on_hand;
    let waste_percentage = if tracks_expiry && handled > 0.0 {
        bound(expired / handled * 100.0, 0.0, 100.0)
    } else {
        0.0
    };

    let total = profiles.len();
    let stocked_out = profiles
        .iter()
        .filter(|p| p.risk_level == RiskLevel::High && p.driver() == RiskDriver::Stockout)
        .count();
    let volatile_product_count = profiles
        .iter()
        .filter(|p| !p.insufficient_data && p.volatility == Intensity::High)
        .count();
    let share = |count: usize| {
        if total == 0 {
            0.0
        } else {
            count as f64 / total as f64 * 100.0
        }
    };
    let stockout_percentage = share(stocked_out);

    let overall_score = overall(
        waste_percentage,
        stockout_percentage,
        share(volatile_product_count),
        thresholds,
    );

    BusinessHealth {
        inventory_turnover: round_to(inventory_turnover, 2),
        waste_percentage: round_to(waste_percentage, 1),
        stockout_percentage: round_to(stockout_percentage, 1),
        volatile_product_count,
        overall_score,
    }
}

/// Starts at 100 and deducts weighted penalties; monotone in each input and
/// bounded to `[0, 100]`.
#[must_use]
pub fn overall(
    waste_percentage: f64,
    stockout_percentage: f64,
    volatile_percentage: f64,
    thresholds: &ThresholdSet,
) -> f64 {
    let raw = 100.0
        - thresholds.waste_penalty * waste_percentage.max(0.0)
        - thresholds.stockout_penalty * stockout_percentage.max(0.0)
        - thresholds.volatility_penalty * volatile_percentage.max(0.0);
    bound(raw, 0.0, 100.0).round()
}
