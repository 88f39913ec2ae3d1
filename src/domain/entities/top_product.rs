use serde::{Deserialize, Serialize};

use crate::domain::value_objects::risk_level::RiskLevel;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub product_id: String,
    pub name: String,
    pub current_stock: f64,
    /// Predicted units over the next 7 days
    pub forecast_demand: f64,
    pub avg_daily_sales: f64,
    pub risk_level: RiskLevel,
    pub recommendation: String,
}
