use serde::{Deserialize, Serialize};

use super::factor::ExternalFactor;
use super::order::OrderRecord;
use super::product::ProductSnapshot;
use super::sales::SalesRecord;

/// The raw collections of one tenant, as read by the aggregator or imported
/// from a JSON document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default)]
    pub sales: Vec<SalesRecord>,
    #[serde(default)]
    pub products: Vec<ProductSnapshot>,
    #[serde(default)]
    pub orders: Vec<OrderRecord>,
    #[serde(default)]
    pub external_factors: Vec<ExternalFactor>,
}

impl Dataset {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sales.is_empty()
            && self.products.is_empty()
            && self.orders.is_empty()
            && self.external_factors.is_empty()
    }
}
