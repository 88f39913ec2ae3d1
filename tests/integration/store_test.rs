#![allow(clippy::expect_used)]

use std::time::Duration;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use stockpulse::application::services::analytics::AnalyticsService;
use stockpulse::domain::analytics::EngineSettings;
use stockpulse::domain::entities::dataset::Dataset;
use stockpulse::domain::entities::factor::ExternalFactor;
use stockpulse::domain::ports::source::DataSource;
use stockpulse::domain::ports::store::SnapshotStore;
use stockpulse::domain::value_objects::settings::LookbackWindow;
use stockpulse::domain::value_objects::tenant::TenantId;
use stockpulse::infrastructure::persistence::sqlite_store::SqliteStore;

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

fn tenant() -> TenantId {
    TenantId::parse("bakery").expect("tenant")
}

fn open(dir: &tempfile::TempDir) -> SqliteStore {
    let path = dir.path().join("stockpulse.db");
    SqliteStore::new(path.to_str().expect("path")).expect("store")
}

#[tokio::test]
async fn imported_fixture_reads_back() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = open(&dir);
    let dataset = load_fixture("bakery_dataset.json");
    let summary = store.import_dataset(&tenant(), &dataset).expect("import");

    assert_eq!(summary.sales, dataset.sales.len());
    assert_eq!(summary.products, 5);
    assert_eq!(summary.orders, 3);
    // The factor of unknown kind is not stored
    assert_eq!(summary.external_factors, 3);

    let since = NaiveDate::from_ymd_opt(2025, 1, 1).expect("date");
    assert_eq!(
        store.sales_history(&tenant(), since).await.expect("sales").len(),
        dataset.sales.len()
    );
    let factors = store.external_factors(&tenant(), since).await.expect("factors");
    assert!(factors
        .iter()
        .all(|f| !matches!(f, ExternalFactor::Unknown)));
}

#[tokio::test]
async fn reimporting_fixture_keeps_history_unchanged() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = open(&dir);
    let dataset = load_fixture("bakery_dataset.json");
    store.import_dataset(&tenant(), &dataset).expect("import");
    store.import_dataset(&tenant(), &dataset).expect("reimport");

    let since = NaiveDate::from_ymd_opt(2025, 1, 1).expect("date");
    assert_eq!(
        store.sales_history(&tenant(), since).await.expect("sales").len(),
        dataset.sales.len()
    );
    assert_eq!(
        store.external_factors(&tenant(), since).await.expect("factors").len(),
        3
    );
    assert_eq!(store.products(&tenant()).await.expect("products").len(), 5);
}

#[tokio::test]
async fn sqlite_backed_run_caches_across_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = EngineSettings::default();
    let first_version = {
        let store = open(&dir);
        store
            .import_dataset(&tenant(), &load_fixture("bakery_dataset.json"))
            .expect("import");
        let service = AnalyticsService::new(
            &store,
            Some(&store),
            LookbackWindow::default(),
            &settings,
            Duration::from_secs(5),
        );
        let run = service
            .run_at(&tenant(), as_of(), false)
            .await
            .expect("run");
        assert!(!run.from_cache);
        run.input_version
    };

    let store = open(&dir);
    let cached = store
        .get_latest_snapshot(&tenant())
        .expect("read")
        .expect("cached snapshot");
    assert!(cached.matches(&first_version));
    assert!(cached.snapshot.validate().is_ok());

    let service = AnalyticsService::new(
        &store,
        Some(&store),
        LookbackWindow::default(),
        &settings,
        Duration::from_secs(5),
    );
    let run = service
        .run_at(&tenant(), as_of(), false)
        .await
        .expect("second run");
    assert!(run.from_cache);
    assert_eq!(run.input_version, first_version);
}

#[tokio::test]
async fn order_limit_bounds_recent_orders() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = open(&dir);
    store
        .import_dataset(&tenant(), &load_fixture("bakery_dataset.json"))
        .expect("import");

    let orders = store.recent_orders(&tenant(), 2).await.expect("orders");
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].order_id, "o-100");
    assert_eq!(orders[0].line_items.len(), 2);
}
