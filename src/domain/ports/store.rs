use thiserror::Error;

use crate::domain::entities::snapshot::CachedSnapshot;
use crate::domain::value_objects::tenant::TenantId;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage read failed: {0}")]
    ReadFailed(String),
    #[error("storage write failed: {0}")]
    WriteFailed(String),
}

/// Cache of the latest snapshot per tenant.
pub trait SnapshotStore: Send + Sync {
    /// Replace the tenant's cached snapshot. Last writer wins.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write operation fails.
    fn save_snapshot(&self, tenant: &TenantId, snapshot: &CachedSnapshot)
        -> Result<(), StoreError>;

    /// Retrieve the tenant's cached snapshot, if any.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the read operation fails.
    fn get_latest_snapshot(&self, tenant: &TenantId)
        -> Result<Option<CachedSnapshot>, StoreError>;
}
