use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Completed,
    Cancelled,
    Refunded,
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    /// Cancelled and refunded orders never represent real demand.
    #[must_use]
    pub const fn counts_as_demand(self) -> bool {
        !matches!(self, Self::Cancelled | Self::Refunded)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineItem {
    pub product_id: String,
    pub quantity: f64,
    pub amount: f64,
}

/// A customer order with its line items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub order_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub line_items: Vec<OrderLineItem>,
    pub status: OrderStatus,
}
