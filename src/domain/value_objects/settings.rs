use serde::{Deserialize, Serialize};

/// Confidence model for the 7-day forecast.
///
/// Starting confidence grows with the amount of history (reaching
/// `max_confidence` at `full_history_days`), then decays by
/// `decay_per_day` per horizon day, never leaving
/// `[min_confidence, max_confidence]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSettings {
    pub min_confidence: f64,
    pub max_confidence: f64,
    pub decay_per_day: f64,
    pub full_history_days: u32,
    /// Deducted from the starting confidence when demand was inferred from
    /// orders or no history exists
    pub insufficient_data_penalty: f64,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            min_confidence: 60.0,
            max_confidence: 95.0,
            decay_per_day: 2.0,
            full_history_days: 28,
            insufficient_data_penalty: 15.0,
        }
    }
}

/// How far back the aggregator reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookbackWindow {
    pub sales_days: u32,
    pub order_limit: usize,
}

impl Default for LookbackWindow {
    fn default() -> Self {
        Self {
            sales_days: 90,
            order_limit: 100,
        }
    }
}
