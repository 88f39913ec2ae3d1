use std::time::Duration;

use chrono::{DateTime, Utc};

use super::aggregator::DataAggregator;
use crate::application::errors::AnalyticsError;
use crate::domain::analytics::{compute, AnalyticsInput, EngineSettings};
use crate::domain::entities::snapshot::{AnalyticsSnapshot, CachedSnapshot};
use crate::domain::ports::source::{Collection, DataSource};
use crate::domain::ports::store::SnapshotStore;
use crate::domain::value_objects::settings::LookbackWindow;
use crate::domain::value_objects::tenant::TenantId;

/// Outcome of one analytics request.
#[derive(Debug, Clone)]
pub struct AnalyticsRun {
    pub snapshot: AnalyticsSnapshot,
    /// Fingerprint of the inputs the snapshot describes
    pub input_version: String,
    /// Collections that could not be read and were treated as empty
    pub degraded: Vec<Collection>,
    pub from_cache: bool,
}

/// Orchestrates a run: resolve tenant → aggregate → reuse cache or compute →
/// validate → cache.
pub struct AnalyticsService<'a> {
    source: &'a dyn DataSource,
    cache: Option<&'a dyn SnapshotStore>,
    lookback: LookbackWindow,
    settings: &'a EngineSettings,
    timeout: Duration,
}

impl<'a> AnalyticsService<'a> {
    #[must_use]
    pub fn new(
        source: &'a dyn DataSource,
        cache: Option<&'a dyn SnapshotStore>,
        lookback: LookbackWindow,
        settings: &'a EngineSettings,
        timeout: Duration,
    ) -> Self {
        Self {
            source,
            cache,
            lookback,
            settings,
            timeout,
        }
    }

    /// Runs the analysis for `tenant_raw` as of now.
    ///
    /// # Errors
    ///
    /// `Unauthenticated` when the tenant cannot be resolved, `DataAccess`
    /// when the store is unreachable, `Timeout` when the run exceeds the
    /// request timeout, `InvalidSnapshot` when the result breaks its
    /// contract.
    pub async fn run(
        &self,
        tenant_raw: &str,
        force_refresh: bool,
    ) -> Result<AnalyticsRun, AnalyticsError> {
        let tenant = TenantId::parse(tenant_raw)?;
        self.run_at(&tenant, Utc::now(), force_refresh).await
    }

    /// Runs the analysis for a fixed point in time.
    ///
    /// # Errors
    ///
    /// See [`AnalyticsService::run`].
    pub async fn run_at(
        &self,
        tenant: &TenantId,
        as_of: DateTime<Utc>,
        force_refresh: bool,
    ) -> Result<AnalyticsRun, AnalyticsError> {
        if let Ok(result) =
            tokio::time::timeout(self.timeout, self.execute(tenant, as_of, force_refresh)).await
        {
            result
        } else {
            tracing::warn!(%tenant, "Analytics run exceeded {:?}", self.timeout);
            Err(AnalyticsError::Timeout(self.timeout))
        }
    }

    /// Latest cached snapshot for the tenant, if caching is enabled.
    ///
    /// # Errors
    ///
    /// `Unauthenticated` for an invalid tenant, `DataAccess` when the cache
    /// cannot be read.
    pub fn cached(&self, tenant_raw: &str) -> Result<Option<CachedSnapshot>, AnalyticsError> {
        let tenant = TenantId::parse(tenant_raw)?;
        let Some(cache) = self.cache else {
            return Ok(None);
        };
        cache
            .get_latest_snapshot(&tenant)
            .map_err(|e| AnalyticsError::DataAccess(e.to_string()))
    }

    async fn execute(
        &self,
        tenant: &TenantId,
        as_of: DateTime<Utc>,
        force_refresh: bool,
    ) -> Result<AnalyticsRun, AnalyticsError> {
        let data = DataAggregator::new(self.source, self.lookback)
            .aggregate(tenant, as_of.date_naive())
            .await?;
        let degraded = data.degraded;

        let input = AnalyticsInput {
            as_of,
            sales_days: self.lookback.sales_days,
            sales: data.sales,
            products: data.products,
            orders: data.orders,
            external_factors: data.external_factors,
        };
        let input_version = input
            .fingerprint(tenant, self.settings)
            .map_err(|e| AnalyticsError::Internal(e.to_string()))?;

        if !force_refresh && degraded.is_empty() {
            if let Some(hit) = self.lookup(tenant, &input_version) {
                tracing::debug!(%tenant, version = %input_version, "Snapshot cache hit");
                return Ok(AnalyticsRun {
                    snapshot: hit.snapshot,
                    input_version,
                    degraded,
                    from_cache: true,
                });
            }
            tracing::debug!(%tenant, version = %input_version, "Snapshot cache miss");
        }

        let report = compute(&input, self.settings);
        let snapshot = AnalyticsSnapshot::assemble(report, Utc::now());
        snapshot.validate()?;

        if let Some(cache) = self.cache {
            let entry = CachedSnapshot::new(input_version.clone(), snapshot.clone());
            if let Err(e) = cache.save_snapshot(tenant, &entry) {
                tracing::warn!(%tenant, "Failed to cache snapshot: {e}");
            }
        }

        tracing::info!(
            %tenant,
            alerts = snapshot.alerts.len(),
            recommendations = snapshot.recommendations.len(),
            score = snapshot.business_health.overall_score,
            "Analytics snapshot computed"
        );

        Ok(AnalyticsRun {
            snapshot,
            input_version,
            degraded,
            from_cache: false,
        })
    }

    fn lookup(&self, tenant: &TenantId, input_version: &str) -> Option<CachedSnapshot> {
        let cache = self.cache?;
        match cache.get_latest_snapshot(tenant) {
            Ok(Some(entry)) if entry.matches(input_version) => Some(entry),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(%tenant, "Snapshot cache unreadable: {e}");
                None
            }
        }
    }
}
