use std::collections::HashMap;

use super::stats::{bound, round_to};
use crate::domain::entities::features::{DemandSource, ProductFeatures};
use crate::domain::entities::forecast::{ForecastPoint, ProductForecast, SalesForecast};
use crate::domain::value_objects::settings::ForecastSettings;

/// Number of days predicted by every forecast.
pub const HORIZON_DAYS: u32 = 7;

/// Starting confidence before decay. Scales with history length and is
/// discounted for thin or order-derived series.
#[must_use]
pub fn base_confidence(features: &ProductFeatures, settings: &ForecastSettings) -> f64 {
    let coverage = if settings.full_history_days == 0 {
        1.0
    } else {
        (f64::from(features.history_days) / f64::from(settings.full_history_days)).min(1.0)
    };
    let mut base =
        settings.min_confidence + (settings.max_confidence - settings.min_confidence) * coverage;
    if features.insufficient_data || features.demand_source == DemandSource::Orders {
        base -= settings.insufficient_data_penalty;
    }
    base
}

/// Confidence for horizon day `day`, bounded and non-increasing in `day`.
#[must_use]
pub fn confidence_at(base: f64, day: u32, settings: &ForecastSettings) -> f64 {
    bound(
        base - settings.decay_per_day * f64::from(day),
        settings.min_confidence,
        settings.max_confidence,
    )
}

/// Linear extrapolation of the product's daily demand over the horizon.
#[must_use]
pub fn forecast_product(
    features: &ProductFeatures,
    unit_price: f64,
    settings: &ForecastSettings,
) -> ProductForecast {
    let base = base_confidence(features, settings);
    let price = unit_price.max(0.0);
    let points = (1..=HORIZON_DAYS)
        .map(|day| {
            let units = (features.avg_daily_units + features.trend_slope * f64::from(day)).max(0.0);
            ForecastPoint {
                day,
                predicted_units: units,
                predicted_revenue: units * price,
                confidence: confidence_at(base, day, settings),
            }
        })
        .collect();
    ProductForecast {
        product_id: features.product_id.clone(),
        points,
    }
}

/// Sums per-product forecasts into the inventory-wide horizon.
///
/// Daily confidence is the mean of product confidences weighted by average
/// daily units, so high-volume products dominate. With no demand at all the
/// confidence falls back to `min_confidence`.
#[must_use]
pub fn aggregate(
    forecasts: &[ProductForecast],
    features: &[ProductFeatures],
    trailing_week_revenue: f64,
    settings: &ForecastSettings,
) -> SalesForecast {
    let weights: HashMap<&str, f64> = features
        .iter()
        .map(|f| (f.product_id.as_str(), f.avg_daily_units.max(0.0)))
        .collect();
    let total_weight: f64 = forecasts
        .iter()
        .map(|f| weights.get(f.product_id.as_str()).copied().unwrap_or(0.0))
        .sum();

    let mut total_units = 0.0;
    let mut total_revenue = 0.0;
    let next_seven_days = (1..=HORIZON_DAYS)
        .map(|day| {
            let mut units = 0.0;
            let mut revenue = 0.0;
            let mut weighted = 0.0;
            for forecast in forecasts {
                let Some(point) = forecast.points.iter().find(|p| p.day == day) else {
                    continue;
                };
                units += point.predicted_units;
                revenue += point.predicted_revenue;
                let weight = weights.get(forecast.product_id.as_str()).copied().unwrap_or(0.0);
                weighted += weight * point.confidence;
            }
            total_units += units;
            total_revenue += revenue;
            let confidence = if total_weight > 0.0 {
                weighted / total_weight
            } else {
                settings.min_confidence
            };
            ForecastPoint {
                day,
                predicted_units: round_to(units, 2),
                predicted_revenue: round_to(revenue, 2),
                confidence: round_to(confidence, 1),
            }
        })
        .collect();

    SalesForecast {
        next_seven_days,
        total_forecast: round_to(total_revenue, 2),
        total_units: round_to(total_units, 2),
        growth_vs_last_week: growth_percent(total_revenue, trailing_week_revenue),
    }
}

/// Percent change of the forecast against last week's actual revenue, `0.0`
/// without a baseline.
#[must_use]
pub fn growth_percent(forecast_revenue: f64, trailing_week_revenue: f64) -> f64 {
    if trailing_week_revenue <= 0.0 {
        return 0.0;
    }
    round_to((forecast_revenue / trailing_week_revenue - 1.0) * 100.0, 1)
}
