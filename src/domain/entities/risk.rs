use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::intensity::Intensity;
use crate::domain::value_objects::risk_level::RiskLevel;

/// Which of the two independent risks dominates a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskDriver {
    Stockout,
    Overstock,
    None,
}

/// Risk assessment of one product. Stockout and overstock percentages are
/// independent probabilities, not a partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskProfile {
    pub product_id: String,
    pub name: String,
    pub stockout_risk_pct: f64,
    pub overstock_risk_pct: f64,
    pub risk_level: RiskLevel,
    pub reason: String,
    pub current_stock: f64,
    /// Predicted units over the 7-day horizon
    pub forecast_demand: f64,
    /// Units missing to meet the forecast
    pub shortfall_units: f64,
    /// Units not expected to sell before expiry or within the horizon
    pub excess_units: f64,
    pub avg_daily_units: f64,
    pub trend_slope: f64,
    pub volatility: Intensity,
    pub days_to_expiry: Option<i64>,
    pub insufficient_data: bool,
}

impl RiskProfile {
    #[must_use]
    pub fn severity(&self) -> f64 {
        self.stockout_risk_pct.max(self.overstock_risk_pct)
    }

    #[must_use]
    pub fn driver(&self) -> RiskDriver {
        if self.stockout_risk_pct > 0.0 && self.stockout_risk_pct >= self.overstock_risk_pct {
            RiskDriver::Stockout
        } else if self.overstock_risk_pct > 0.0 {
            RiskDriver::Overstock
        } else {
            RiskDriver::None
        }
    }

    /// Ranking order: higher level, then higher severity, then sooner
    /// expiry (untracked last), then product id.
    #[must_use]
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .risk_level
            .cmp(&self.risk_level)
            .then_with(|| other.severity().total_cmp(&self.severity()))
            .then_with(|| expiry_cmp(self.days_to_expiry, other.days_to_expiry))
            .then_with(|| self.product_id.cmp(&other.product_id))
    }
}

/// Sooner expiry first; products without an expiry date sort last.
#[must_use]
pub fn expiry_cmp(a: Option<i64>, b: Option<i64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Inventory-wide risk summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskEngine {
    pub stockout_risk: f64,
    pub overstock_risk: f64,
    pub weather_sensitivity: Intensity,
    pub volatility_index: Intensity,
    pub critical_products: Vec<RiskProfile>,
    /// Every product, ranked by risk
    pub product_risks: Vec<RiskProfile>,
}
