use chrono::NaiveDate;

use super::stats::{self, bound, round_to};
use crate::domain::entities::features::ProductFeatures;
use crate::domain::entities::forecast::ProductForecast;
use crate::domain::entities::product::ProductSnapshot;
use crate::domain::entities::risk::{RiskEngine, RiskProfile};
use crate::domain::value_objects::intensity::Intensity;
use crate::domain::value_objects::risk_level::RiskLevel;
use crate::domain::value_objects::thresholds::ThresholdSet;

/// Probability-like stockout risk. Zero once stock reaches the safety cover
/// of forecast demand, 100 with no stock against positive demand.
#[must_use]
pub fn stockout_risk(stock: f64, demand: f64, safety_cover: f64) -> f64 {
    if demand <= 0.0 || safety_cover <= 0.0 {
        return 0.0;
    }
    bound((safety_cover - stock / demand) / safety_cover, 0.0, 1.0) * 100.0
}

/// Overstock risk from the stock-to-demand ratio: 0 up to 1x, 50 at
/// `multiple`, approaching 100 beyond it.
#[must_use]
pub fn overstock_risk(stock: f64, demand: f64, multiple: f64) -> f64 {
    if demand <= 0.0 {
        return if stock > 0.0 { 100.0 } else { 0.0 };
    }
    let ratio = stock / demand;
    let multiple = multiple.max(1.0 + f64::EPSILON);
    let pct = if ratio <= 1.0 {
        0.0
    } else if ratio <= multiple {
        50.0 * (ratio - 1.0) / (multiple - 1.0)
    } else {
        50.0 + 50.0 * (1.0 - multiple / ratio)
    };
    bound(pct, 0.0, 100.0)
}

/// Classifies one product against its 7-day forecast.
#[must_use]
pub fn classify(
    product: &ProductSnapshot,
    features: &ProductFeatures,
    forecast: &ProductForecast,
    as_of: NaiveDate,
    thresholds: &ThresholdSet,
) -> RiskProfile {
    let stock = product.stock_on_hand();
    let demand = forecast.total_units();
    let days_to_expiry = product.days_to_expiry(as_of);
    let mut reasons: Vec<String> = Vec::new();

    let (mut stockout, mut overstock) = if features.insufficient_data {
        reasons.push("insufficient sales history".to_string());
        (0.0, 0.0)
    } else {
        let stockout = stockout_risk(stock, demand, thresholds.stockout_safety_cover);
        let overstock = overstock_risk(stock, demand, thresholds.overstock_multiple);
        if stockout > 0.0 {
            if stock <= 0.0 {
                reasons.push("out of stock".to_string());
            } else {
                let cover_days = stock / (demand / 7.0);
                reasons.push(format!("stock covers {cover_days:.1} days of demand"));
            }
        }
        if demand <= 0.0 && stock > 0.0 {
            reasons.push("no forecast demand".to_string());
        } else if overstock > 0.0 {
            reasons.push(format!("stock {:.1}× forecast", stock / demand));
        }
        (stockout, overstock)
    };

    let mut excess = if features.insufficient_data {
        0.0
    } else {
        (stock - demand).max(0.0)
    };

    if let Some(days) = days_to_expiry {
        if stock > 0.0 && days < 0 {
            overstock = 100.0;
            excess = stock;
            let ago = -days;
            reasons.push(format!(
                "expired {ago} day{} ago",
                if ago == 1 { "" } else { "s" }
            ));
        } else if stock > 0.0 && days <= thresholds.expiry_warning_days {
            let sellable = forecast.units_through(days);
            if stock > sellable {
                overstock = overstock.max((1.0 - sellable / stock) * 100.0);
                excess = stock - sellable;
                reasons.push(match days {
                    0 => "expires today".to_string(),
                    1 => "expires in 1 day".to_string(),
                    n => format!("expires in {n} days"),
                });
            }
        }
    }

    if reasons.is_empty() {
        reasons.push("stock within forecast range".to_string());
    }

    stockout = round_to(bound(stockout, 0.0, 100.0), 1);
    overstock = round_to(bound(overstock, 0.0, 100.0), 1);
    let shortfall = if features.insufficient_data {
        0.0
    } else {
        (demand * thresholds.stockout_safety_cover - stock).max(0.0)
    };

    RiskProfile {
        product_id: product.product_id.clone(),
        name: product.name.clone(),
        stockout_risk_pct: stockout,
        overstock_risk_pct: overstock,
        risk_level: RiskLevel::from_percent(stockout.max(overstock), thresholds),
        reason: reasons.join(", "),
        current_stock: stock,
        forecast_demand: round_to(demand, 2),
        shortfall_units: round_to(shortfall, 2),
        excess_units: round_to(excess, 2),
        avg_daily_units: round_to(features.avg_daily_units, 2),
        trend_slope: round_to(features.trend_slope, 3),
        volatility: features.volatility,
        days_to_expiry,
        insufficient_data: features.insufficient_data,
    }
}

/// Rolls per-product profiles up into the inventory-wide risk summary.
#[must_use]
pub fn summarize(
    mut profiles: Vec<RiskProfile>,
    daily_units: &[f64],
    weather_sensitivity: Intensity,
    thresholds: &ThresholdSet,
) -> RiskEngine {
    profiles.sort_by(RiskProfile::rank_cmp);

    let assessed: Vec<&RiskProfile> = profiles.iter().filter(|p| !p.insufficient_data).collect();
    let stockout: Vec<f64> = assessed.iter().map(|p| p.stockout_risk_pct).collect();
    let overstock: Vec<f64> = assessed.iter().map(|p| p.overstock_risk_pct).collect();

    let volatility_index = if daily_units.len() < 2 {
        Intensity::Low
    } else {
        Intensity::from_variation(
            stats::coefficient_of_variation(daily_units),
            thresholds.volatility_low,
            thresholds.volatility_high,
        )
    };

    let critical_products = profiles
        .iter()
        .filter(|p| p.risk_level >= RiskLevel::Medium)
        .take(thresholds.critical_products)
        .cloned()
        .collect();

    RiskEngine {
        stockout_risk: round_to(stats::mean(&stockout), 1),
        overstock_risk: round_to(stats::mean(&overstock), 1),
        weather_sensitivity,
        volatility_index,
        critical_products,
        product_risks: profiles,
    }
}
