use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::entities::factor::ExternalFactor;
use crate::domain::entities::order::OrderRecord;
use crate::domain::entities::product::ProductSnapshot;
use crate::domain::entities::sales::SalesRecord;
use crate::domain::value_objects::tenant::TenantId;

/// Source collection a read targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Sales,
    Products,
    Orders,
    ExternalFactors,
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sales => write!(f, "sales"),
            Self::Products => write!(f, "products"),
            Self::Orders => write!(f, "orders"),
            Self::ExternalFactors => write!(f, "external factors"),
        }
    }
}

#[derive(Error, Debug)]
pub enum SourceError {
    /// The store cannot be reached at all. Fatal for a run.
    #[error("data store unreachable: {0}")]
    Unreachable(String),
    /// A single query failed. The collection degrades to empty.
    #[error("{collection} query failed: {reason}")]
    QueryFailed {
        collection: Collection,
        reason: String,
    },
}

/// Read-only access to one tenant's operational data.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Sales records dated on or after `since`.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` if the store is unreachable or the query fails.
    async fn sales_history(
        &self,
        tenant: &TenantId,
        since: NaiveDate,
    ) -> Result<Vec<SalesRecord>, SourceError>;

    /// Current inventory.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` if the store is unreachable or the query fails.
    async fn products(&self, tenant: &TenantId) -> Result<Vec<ProductSnapshot>, SourceError>;

    /// Most recent orders with their line items, newest first.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` if the store is unreachable or the query fails.
    async fn recent_orders(
        &self,
        tenant: &TenantId,
        limit: usize,
    ) -> Result<Vec<OrderRecord>, SourceError>;

    /// Recorded weather, events and holidays dated on or after `since`.
    /// Sources without such data return nothing.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` if the store is unreachable or the query fails.
    async fn external_factors(
        &self,
        _tenant: &TenantId,
        _since: NaiveDate,
    ) -> Result<Vec<ExternalFactor>, SourceError> {
        Ok(Vec::new())
    }
}
