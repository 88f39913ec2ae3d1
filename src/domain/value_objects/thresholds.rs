use serde::{Deserialize, Serialize};

/// Tunable thresholds and weights for risk classification, health scoring
/// and alerting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSet {
    /// Risk percentage above which a product is High risk
    pub risk_high: f64,
    /// Risk percentage above which a product is Medium risk
    pub risk_medium: f64,
    /// Stock above this multiple of 7-day demand is High overstock risk
    pub overstock_multiple: f64,
    /// Stock should cover this multiple of 7-day demand; stockout risk is
    /// zero at or above it
    pub stockout_safety_cover: f64,
    /// Stockout percentage that triggers a warning
    pub stockout_warning: f64,
    /// Stockout percentage that triggers a critical alert
    pub stockout_critical: f64,
    /// Waste percentage that triggers a warning
    pub waste_warning: f64,
    /// Overall health score below which a critical alert fires
    pub health_critical: f64,
    /// Number of critical products surfaced by the risk engine
    pub critical_products: usize,
    /// Days before expiry at which stock counts as near expiry
    pub expiry_warning_days: i64,
    /// Days before expiry at which discounts deepen
    pub expiry_critical_days: i64,
    /// Coefficient of variation below which volatility is Low
    pub volatility_low: f64,
    /// Coefficient of variation above which volatility is High
    pub volatility_high: f64,
    /// Health score points deducted per waste percentage point
    pub waste_penalty: f64,
    /// Health score points deducted per stockout percentage point
    pub stockout_penalty: f64,
    /// Health score points deducted per percentage point of volatile products
    pub volatility_penalty: f64,
    /// Days of stock cover under which an imminent stockout alert fires
    pub imminent_stockout_days: f64,
    /// Week-over-week demand growth (percent) that raises an info alert
    pub demand_spike_percent: f64,
}

impl Default for ThresholdSet {
    fn default() -> Self {
        Self {
            risk_high: 50.0,
            risk_medium: 25.0,
            overstock_multiple: 2.0,
            stockout_safety_cover: 1.5,
            stockout_warning: 5.0,
            stockout_critical: 15.0,
            waste_warning: 5.0,
            health_critical: 50.0,
            critical_products: 5,
            expiry_warning_days: 7,
            expiry_critical_days: 3,
            volatility_low: 0.3,
            volatility_high: 0.7,
            waste_penalty: 2.5,
            stockout_penalty: 1.5,
            volatility_penalty: 0.2,
            imminent_stockout_days: 3.0,
            demand_spike_percent: 15.0,
        }
    }
}
