use chrono::NaiveDate;

use crate::application::errors::AnalyticsError;
use crate::domain::analytics::features::window_start;
use crate::domain::entities::factor::ExternalFactor;
use crate::domain::entities::order::OrderRecord;
use crate::domain::entities::product::ProductSnapshot;
use crate::domain::entities::sales::SalesRecord;
use crate::domain::ports::source::{Collection, DataSource, SourceError};
use crate::domain::value_objects::settings::LookbackWindow;
use crate::domain::value_objects::tenant::TenantId;

/// Raw collections for one run. A collection whose query failed is empty
/// and listed in `degraded`.
#[derive(Debug, Clone, Default)]
pub struct AggregatedData {
    pub sales: Vec<SalesRecord>,
    pub products: Vec<ProductSnapshot>,
    pub orders: Vec<OrderRecord>,
    pub external_factors: Vec<ExternalFactor>,
    pub degraded: Vec<Collection>,
}

/// Reads the tenant's sales, products, orders and external factors
/// concurrently.
pub struct DataAggregator<'a> {
    source: &'a dyn DataSource,
    lookback: LookbackWindow,
}

impl<'a> DataAggregator<'a> {
    #[must_use]
    pub fn new(source: &'a dyn DataSource, lookback: LookbackWindow) -> Self {
        Self { source, lookback }
    }

    /// Collects everything a run needs for the window ending before `as_of`.
    ///
    /// # Errors
    ///
    /// Returns `AnalyticsError::DataAccess` when the store is unreachable or
    /// when the sales, products and orders queries all fail.
    pub async fn aggregate(
        &self,
        tenant: &TenantId,
        as_of: NaiveDate,
    ) -> Result<AggregatedData, AnalyticsError> {
        let since = window_start(as_of, self.lookback.sales_days);
        tracing::debug!(%tenant, %since, "Aggregating source data");

        let (sales, products, orders, factors) = tokio::join!(
            self.source.sales_history(tenant, since),
            self.source.products(tenant),
            self.source.recent_orders(tenant, self.lookback.order_limit),
            self.source.external_factors(tenant, since),
        );

        let mut degraded = Vec::new();
        let sales = absorb(sales, Collection::Sales, &mut degraded)?;
        let products = absorb(products, Collection::Products, &mut degraded)?;
        let mut orders = absorb(orders, Collection::Orders, &mut degraded)?;
        if degraded.len() == 3 {
            return Err(AnalyticsError::DataAccess(
                "sales, products and orders queries all failed".to_string(),
            ));
        }

        // External factors are optional enrichment and never fail a run
        let external_factors = match factors {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!(%tenant, "External factors unavailable: {e}");
                degraded.push(Collection::ExternalFactors);
                Vec::new()
            }
        };

        orders.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.order_id.cmp(&b.order_id))
        });
        orders.truncate(self.lookback.order_limit);

        tracing::info!(
            %tenant,
            sales = sales.len(),
            products = products.len(),
            orders = orders.len(),
            factors = external_factors.len(),
            degraded = degraded.len(),
            "Source data aggregated"
        );

        Ok(AggregatedData {
            sales,
            products,
            orders,
            external_factors,
            degraded,
        })
    }
}

fn absorb<T>(
    result: Result<Vec<T>, SourceError>,
    collection: Collection,
    degraded: &mut Vec<Collection>,
) -> Result<Vec<T>, AnalyticsError> {
    match result {
        Ok(rows) => Ok(rows),
        Err(e @ SourceError::Unreachable(_)) => Err(e.into()),
        Err(e @ SourceError::QueryFailed { .. }) => {
            tracing::warn!("Degrading {collection} to empty: {e}");
            degraded.push(collection);
            Ok(Vec::new())
        }
    }
}
