use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day's sales of one product. Append-only history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesRecord {
    pub product_id: String,
    pub date: NaiveDate,
    pub quantity_sold: f64,
    pub unit_price: f64,
    pub total_amount: f64,
}
