use serde::{Deserialize, Serialize};

/// Business-wide health indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessHealth {
    pub inventory_turnover: f64,
    pub waste_percentage: f64,
    pub stockout_percentage: f64,
    pub volatile_product_count: usize,
    /// Composite score in `[0, 100]`
    pub overall_score: f64,
}
