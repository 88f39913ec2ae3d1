use serde::{Deserialize, Serialize};

use crate::domain::value_objects::intensity::Intensity;

/// Where a product's demand series came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DemandSource {
    Sales,
    Orders,
    #[default]
    None,
}

/// Demand statistics derived from a product's dense daily series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFeatures {
    pub product_id: String,
    /// Length of the dense daily series
    pub history_days: u32,
    /// Days on which the product actually sold
    pub active_days: u32,
    pub avg_daily_units: f64,
    pub trend_slope: f64,
    pub coefficient_of_variation: f64,
    pub volatility: Intensity,
    pub insufficient_data: bool,
    pub demand_source: DemandSource,
}

impl ProductFeatures {
    /// Features of a product with no usable history.
    #[must_use]
    pub fn empty(product_id: &str) -> Self {
        Self {
            product_id: product_id.to_string(),
            history_days: 0,
            active_days: 0,
            avg_daily_units: 0.0,
            trend_slope: 0.0,
            coefficient_of_variation: 0.0,
            volatility: Intensity::Low,
            insufficient_data: true,
            demand_source: DemandSource::None,
        }
    }
}
