use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::entities::dataset::Dataset;
use crate::domain::entities::factor::ExternalFactor;
use crate::domain::entities::order::OrderRecord;
use crate::domain::entities::product::ProductSnapshot;
use crate::domain::entities::sales::SalesRecord;
use crate::domain::entities::snapshot::CachedSnapshot;
use crate::domain::ports::source::{DataSource, SourceError};
use crate::domain::ports::store::{SnapshotStore, StoreError};
use crate::domain::value_objects::tenant::TenantId;

/// In-memory data source and snapshot cache for tests and dry runs.
pub struct InMemoryStore {
    datasets: Mutex<HashMap<TenantId, Dataset>>,
    snapshots: Mutex<HashMap<TenantId, CachedSnapshot>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            datasets: Mutex::new(HashMap::new()),
            snapshots: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn with_dataset(tenant: TenantId, dataset: Dataset) -> Self {
        Self {
            datasets: Mutex::new(HashMap::from([(tenant, dataset)])),
            snapshots: Mutex::new(HashMap::new()),
        }
    }

    /// Replace the tenant's dataset.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::WriteFailed` if the lock is poisoned.
    pub fn insert_dataset(&self, tenant: TenantId, dataset: Dataset) -> Result<(), StoreError> {
        self.datasets
            .lock()
            .map_err(|_| StoreError::WriteFailed("lock poisoned".into()))?
            .insert(tenant, dataset);
        Ok(())
    }

    fn read<T>(
        &self,
        tenant: &TenantId,
        select: impl FnOnce(&Dataset) -> T,
    ) -> Result<Option<T>, SourceError> {
        let datasets = self
            .datasets
            .lock()
            .map_err(|_| SourceError::Unreachable("lock poisoned".into()))?;
        Ok(datasets.get(tenant).map(select))
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DataSource for InMemoryStore {
    async fn sales_history(
        &self,
        tenant: &TenantId,
        since: NaiveDate,
    ) -> Result<Vec<SalesRecord>, SourceError> {
        let mut sales = self
            .read(tenant, |d| {
                d.sales
                    .iter()
                    .filter(|s| s.date >= since)
                    .cloned()
                    .collect::<Vec<_>>()
            })?
            .unwrap_or_default();
        sales.sort_by_key(|s| s.date);
        Ok(sales)
    }

    async fn products(&self, tenant: &TenantId) -> Result<Vec<ProductSnapshot>, SourceError> {
        Ok(self
            .read(tenant, |d| d.products.clone())?
            .unwrap_or_default())
    }

    async fn recent_orders(
        &self,
        tenant: &TenantId,
        limit: usize,
    ) -> Result<Vec<OrderRecord>, SourceError> {
        let mut orders = self
            .read(tenant, |d| d.orders.clone())?
            .unwrap_or_default();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders.truncate(limit);
        Ok(orders)
    }

    async fn external_factors(
        &self,
        tenant: &TenantId,
        since: NaiveDate,
    ) -> Result<Vec<ExternalFactor>, SourceError> {
        Ok(self
            .read(tenant, |d| {
                d.external_factors
                    .iter()
                    .filter(|f| f.date().is_some_and(|date| date >= since))
                    .cloned()
                    .collect()
            })?
            .unwrap_or_default())
    }
}

impl SnapshotStore for InMemoryStore {
    fn save_snapshot(
        &self,
        tenant: &TenantId,
        snapshot: &CachedSnapshot,
    ) -> Result<(), StoreError> {
        self.snapshots
            .lock()
            .map_err(|_| StoreError::WriteFailed("lock poisoned".into()))?
            .insert(tenant.clone(), snapshot.clone());
        Ok(())
    }

    fn get_latest_snapshot(
        &self,
        tenant: &TenantId,
    ) -> Result<Option<CachedSnapshot>, StoreError> {
        let snapshots = self
            .snapshots
            .lock()
            .map_err(|_| StoreError::ReadFailed("lock poisoned".into()))?;
        Ok(snapshots.get(tenant).cloned())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::domain::entities::snapshot::tests::empty_snapshot;

    fn tenant(raw: &str) -> TenantId {
        TenantId::parse(raw).expect("tenant")
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).expect("date")
    }

    fn sale(day: u32) -> SalesRecord {
        SalesRecord {
            product_id: "p1".into(),
            date: date(day),
            quantity_sold: 1.0,
            unit_price: 2.0,
            total_amount: 2.0,
        }
    }

    #[tokio::test]
    async fn unknown_tenant_reads_empty() {
        let store = InMemoryStore::new();
        let other = tenant("nobody");
        assert!(store.products(&other).await.expect("products").is_empty());
        assert!(store.recent_orders(&other, 5).await.expect("orders").is_empty());
    }

    #[tokio::test]
    async fn sales_are_filtered_and_sorted() {
        let dataset = Dataset {
            sales: vec![sale(9), sale(2), sale(5)],
            ..Dataset::default()
        };
        let store = InMemoryStore::with_dataset(tenant("shop"), dataset);
        let sales = store
            .sales_history(&tenant("shop"), date(4))
            .await
            .expect("sales");
        let days: Vec<NaiveDate> = sales.iter().map(|s| s.date).collect();
        assert_eq!(days, vec![date(5), date(9)]);
    }

    #[tokio::test]
    async fn insert_dataset_replaces_previous() {
        let store = InMemoryStore::new();
        let shop = tenant("shop");
        store
            .insert_dataset(shop.clone(), Dataset {
                sales: vec![sale(1)],
                ..Dataset::default()
            })
            .expect("insert");
        store
            .insert_dataset(shop.clone(), Dataset::default())
            .expect("insert");
        assert!(store
            .sales_history(&shop, date(1))
            .await
            .expect("sales")
            .is_empty());
    }

    #[test]
    fn snapshot_save_and_get() {
        let store = InMemoryStore::new();
        let shop = tenant("shop");
        assert!(store.get_latest_snapshot(&shop).expect("read").is_none());

        let cached = CachedSnapshot::new("v1".into(), empty_snapshot());
        store.save_snapshot(&shop, &cached).expect("save");
        let loaded = store.get_latest_snapshot(&shop).expect("read");
        assert_eq!(loaded, Some(cached));
        assert!(store
            .get_latest_snapshot(&tenant("other"))
            .expect("read")
            .is_none());
    }
}
