#![allow(clippy::expect_used)]

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use stockpulse::application::errors::AnalyticsError;
use stockpulse::application::services::analytics::AnalyticsService;
use stockpulse::domain::analytics::EngineSettings;
use stockpulse::domain::entities::dataset::Dataset;
use stockpulse::domain::entities::factor::ExternalFactor;
use stockpulse::domain::entities::order::OrderRecord;
use stockpulse::domain::entities::product::ProductSnapshot;
use stockpulse::domain::entities::sales::SalesRecord;
use stockpulse::domain::ports::source::{Collection, DataSource, SourceError};
use stockpulse::domain::value_objects::settings::LookbackWindow;
use stockpulse::domain::value_objects::tenant::TenantId;
use stockpulse::infrastructure::persistence::in_memory_store::InMemoryStore;

fn load_fixture(name: &str) -> Dataset {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    let json = std::fs::read_to_string(&path).expect("Failed to read fixture");
    serde_json::from_str(&json).expect("Failed to parse fixture")
}

fn as_of() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 15, 6, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn tenant(raw: &str) -> TenantId {
    TenantId::parse(raw).expect("tenant")
}

fn bakery_store() -> InMemoryStore {
    InMemoryStore::with_dataset(tenant("bakery"), load_fixture("bakery_dataset.json"))
}

/// Wraps a store and fails or delays selected reads.
struct FaultySource {
    inner: InMemoryStore,
    failing_orders: bool,
    unreachable: bool,
    delay: Option<Duration>,
}

impl FaultySource {
    fn new(inner: InMemoryStore) -> Self {
        Self {
            inner,
            failing_orders: false,
            unreachable: false,
            delay: None,
        }
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl DataSource for FaultySource {
    async fn sales_history(
        &self,
        tenant: &TenantId,
        since: NaiveDate,
    ) -> Result<Vec<SalesRecord>, SourceError> {
        self.pause().await;
        if self.unreachable {
            return Err(SourceError::Unreachable("connection refused".into()));
        }
        self.inner.sales_history(tenant, since).await
    }

    async fn products(&self, tenant: &TenantId) -> Result<Vec<ProductSnapshot>, SourceError> {
        self.inner.products(tenant).await
    }

    async fn recent_orders(
        &self,
        tenant: &TenantId,
        limit: usize,
    ) -> Result<Vec<OrderRecord>, SourceError> {
        if self.failing_orders {
            return Err(SourceError::QueryFailed {
                collection: Collection::Orders,
                reason: "no such table: orders".into(),
            });
        }
        self.inner.recent_orders(tenant, limit).await
    }

    async fn external_factors(
        &self,
        tenant: &TenantId,
        since: NaiveDate,
    ) -> Result<Vec<ExternalFactor>, SourceError> {
        self.inner.external_factors(tenant, since).await
    }
}

#[tokio::test]
async fn second_run_is_served_from_cache() {
    let store = bakery_store();
    let settings = EngineSettings::default();
    let service = AnalyticsService::new(
        &store,
        Some(&store),
        LookbackWindow::default(),
        &settings,
        Duration::from_secs(5),
    );

    let first = service
        .run_at(&tenant("bakery"), as_of(), false)
        .await
        .expect("first run");
    assert!(!first.from_cache);

    let second = service
        .run_at(&tenant("bakery"), as_of(), false)
        .await
        .expect("second run");
    assert!(second.from_cache);
    assert_eq!(second.input_version, first.input_version);
    assert_eq!(second.snapshot, first.snapshot);
}

#[tokio::test]
async fn forced_refresh_recomputes() {
    let store = bakery_store();
    let settings = EngineSettings::default();
    let service = AnalyticsService::new(
        &store,
        Some(&store),
        LookbackWindow::default(),
        &settings,
        Duration::from_secs(5),
    );

    service
        .run_at(&tenant("bakery"), as_of(), false)
        .await
        .expect("first run");
    let refreshed = service
        .run_at(&tenant("bakery"), as_of(), true)
        .await
        .expect("refresh");
    assert!(!refreshed.from_cache);
}

#[tokio::test]
async fn changed_inputs_miss_the_cache() {
    let store = bakery_store();
    let settings = EngineSettings::default();
    let service = AnalyticsService::new(
        &store,
        Some(&store),
        LookbackWindow::default(),
        &settings,
        Duration::from_secs(5),
    );

    let first = service
        .run_at(&tenant("bakery"), as_of(), false)
        .await
        .expect("first run");

    let mut dataset = load_fixture("bakery_dataset.json");
    dataset.products[0].current_stock += 40.0;
    store
        .insert_dataset(tenant("bakery"), dataset)
        .expect("insert");

    let second = service
        .run_at(&tenant("bakery"), as_of(), false)
        .await
        .expect("second run");
    assert!(!second.from_cache);
    assert_ne!(second.input_version, first.input_version);
}

#[tokio::test]
async fn failed_orders_query_degrades_instead_of_failing() {
    let mut source = FaultySource::new(bakery_store());
    source.failing_orders = true;
    let settings = EngineSettings::default();
    let service = AnalyticsService::new(
        &source,
        None,
        LookbackWindow::default(),
        &settings,
        Duration::from_secs(5),
    );

    let run = service
        .run_at(&tenant("bakery"), as_of(), false)
        .await
        .expect("partial run");
    assert_eq!(run.degraded, vec![Collection::Orders]);
    assert!(!run.snapshot.top_products.is_empty());
    assert!(run.snapshot.validate().is_ok());
}

#[tokio::test]
async fn unreachable_store_is_a_data_access_error() {
    let mut source = FaultySource::new(bakery_store());
    source.unreachable = true;
    let settings = EngineSettings::default();
    let service = AnalyticsService::new(
        &source,
        None,
        LookbackWindow::default(),
        &settings,
        Duration::from_secs(5),
    );

    let err = service
        .run_at(&tenant("bakery"), as_of(), false)
        .await
        .expect_err("unreachable");
    assert!(matches!(err, AnalyticsError::DataAccess(_)));
    assert_eq!(err.status_code(), 500);
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn slow_store_times_out_as_retryable() {
    let mut source = FaultySource::new(bakery_store());
    source.delay = Some(Duration::from_millis(500));
    let settings = EngineSettings::default();
    let service = AnalyticsService::new(
        &source,
        None,
        LookbackWindow::default(),
        &settings,
        Duration::from_millis(50),
    );

    let err = service
        .run_at(&tenant("bakery"), as_of(), false)
        .await
        .expect_err("timeout");
    assert!(matches!(err, AnalyticsError::Timeout(_)));
    assert_eq!(err.status_code(), 503);
    assert!(err.is_retryable());
}

#[tokio::test]
async fn unresolvable_tenant_is_unauthenticated() {
    let store = bakery_store();
    let settings = EngineSettings::default();
    let service = AnalyticsService::new(
        &store,
        None,
        LookbackWindow::default(),
        &settings,
        Duration::from_secs(5),
    );

    let err = service.run("", false).await.expect_err("no tenant");
    assert_eq!(err.status_code(), 401);
    let body = serde_json::to_value(err.body()).expect("serialize");
    assert!(body["error"].as_str().is_some_and(|m| !m.is_empty()));
}

#[tokio::test]
async fn tenants_never_see_each_other() {
    let store = bakery_store();
    let settings = EngineSettings::default();
    let service = AnalyticsService::new(
        &store,
        Some(&store),
        LookbackWindow::default(),
        &settings,
        Duration::from_secs(5),
    );

    let other = service
        .run_at(&tenant("florist"), as_of(), false)
        .await
        .expect("other tenant");
    assert!(other.snapshot.risk_engine.product_risks.is_empty());
    assert!(other.snapshot.sales_forecast.total_forecast.abs() < f64::EPSILON);
    assert!(service.cached("bakery").expect("read").is_none());
}

#[tokio::test]
async fn snapshot_json_uses_contract_keys() {
    let store = bakery_store();
    let settings = EngineSettings::default();
    let service = AnalyticsService::new(
        &store,
        None,
        LookbackWindow::default(),
        &settings,
        Duration::from_secs(5),
    );

    let run = service
        .run_at(&tenant("bakery"), as_of(), false)
        .await
        .expect("run");
    let json = serde_json::to_value(&run.snapshot).expect("serialize");
    for key in [
        "riskEngine",
        "recommendations",
        "businessHealth",
        "alerts",
        "salesForecast",
        "topProducts",
        "influencingFactors",
        "lastUpdated",
    ] {
        assert!(json.get(key).is_some(), "missing key {key}");
    }
    assert_eq!(
        json["salesForecast"]["next7Days"]
            .as_array()
            .map(Vec::len),
        Some(7)
    );
}
