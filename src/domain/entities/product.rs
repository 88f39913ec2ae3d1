use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Point-in-time copy of a product's inventory record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    pub product_id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    pub current_stock: f64,
    pub unit_price: f64,
    #[serde(default)]
    pub expiration_date: Option<NaiveDate>,
}

impl ProductSnapshot {
    /// Whole days until expiry; negative once expired, `None` when untracked.
    #[must_use]
    pub fn days_to_expiry(&self, today: NaiveDate) -> Option<i64> {
        self.expiration_date
            .map(|expires| (expires - today).num_days())
    }

    /// A product expiring today is still sellable today.
    #[must_use]
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.days_to_expiry(today).is_some_and(|d| d < 0)
    }

    /// Stock on hand, never negative.
    #[must_use]
    pub fn stock_on_hand(&self) -> f64 {
        self.current_stock.max(0.0)
    }
}
