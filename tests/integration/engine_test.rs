#![allow(clippy::expect_used)]

use chrono::{DateTime, TimeZone, Utc};
use stockpulse::domain::analytics::health::overall;
use stockpulse::domain::analytics::{compute, AnalyticsInput, AnalyticsReport, EngineSettings};
use stockpulse::domain::entities::dataset::Dataset;
use stockpulse::domain::entities::health::BusinessHealth;
use stockpulse::domain::entities::risk::{RiskEngine, RiskProfile};
use stockpulse::domain::entities::snapshot::AnalyticsSnapshot;
use stockpulse::domain::rules::{AlertContext, AlertEngine};
use stockpulse::domain::value_objects::intensity::Intensity;
use stockpulse::domain::value_objects::risk_level::RiskLevel;
use stockpulse::domain::value_objects::severity::Severity;
use stockpulse::domain::value_objects::thresholds::ThresholdSet;

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

fn make_input(dataset: Dataset) -> AnalyticsInput {
    AnalyticsInput {
        as_of: as_of(),
        sales_days: 90,
        sales: dataset.sales,
        products: dataset.products,
        orders: dataset.orders,
        external_factors: dataset.external_factors,
    }
}

fn bakery_report() -> AnalyticsReport {
    compute(
        &make_input(load_fixture("bakery_dataset.json")),
        &EngineSettings::default(),
    )
}

fn profile<'a>(report: &'a AnalyticsReport, id: &str) -> &'a RiskProfile {
    report
        .risk_engine
        .product_risks
        .iter()
        .find(|p| p.product_id == id)
        .unwrap_or_else(|| panic!("missing profile for {id}"))
}

#[test]
fn forecast_confidence_never_rises() {
    let report = bakery_report();
    let points = &report.sales_forecast.next_seven_days;
    assert_eq!(points.len(), 7);
    for pair in points.windows(2) {
        assert!(pair[1].confidence <= pair[0].confidence);
    }
    assert!(points[6].confidence <= points[0].confidence);
}

#[test]
fn outputs_are_non_negative_and_bounded() {
    let report = bakery_report();
    for p in &report.sales_forecast.next_seven_days {
        assert!(p.predicted_units >= 0.0);
        assert!(p.predicted_revenue >= 0.0);
    }
    for p in &report.risk_engine.product_risks {
        assert!(p.stockout_risk_pct >= 0.0);
        assert!(p.overstock_risk_pct >= 0.0);
    }
    let score = report.business_health.overall_score;
    assert!((0.0..=100.0).contains(&score));
}

#[test]
fn recommendations_are_ranked_and_deterministic() {
    let first = bakery_report();
    let second = bakery_report();

    assert!(!first.recommendations.is_empty());
    for (i, rec) in first.recommendations.iter().enumerate() {
        assert_eq!(rec.priority as usize, i + 1);
    }
    assert_eq!(first.recommendations, second.recommendations);
}

#[test]
fn identical_inputs_give_identical_snapshots() {
    let stamp = as_of();
    let a = AnalyticsSnapshot::assemble(bakery_report(), stamp);
    let b = AnalyticsSnapshot::assemble(bakery_report(), stamp);
    let a_json = serde_json::to_string(&a).expect("serialize");
    let b_json = serde_json::to_string(&b).expect("serialize");
    assert_eq!(a_json, b_json);
}

#[test]
fn fixture_snapshot_passes_validation() {
    let snapshot = AnalyticsSnapshot::assemble(bakery_report(), as_of());
    assert!(snapshot.validate().is_ok());
}

#[test]
fn no_sales_yields_zero_forecast_without_error() {
    let report = compute(
        &make_input(load_fixture("no_sales_dataset.json")),
        &EngineSettings::default(),
    );
    assert!(report.sales_forecast.total_forecast.abs() < f64::EPSILON);
    assert!(report.top_products.is_empty());
    assert_eq!(report.risk_engine.product_risks.len(), 1);
}

#[test]
fn low_stock_against_steady_demand_is_high_stockout_risk() {
    let report = bakery_report();
    let bread = profile(&report, "bread");
    assert!((bread.avg_daily_units - 5.0).abs() < 1e-9);
    assert!(bread.trend_slope.abs() < 1e-9);
    assert!((bread.forecast_demand - 35.0).abs() < 1e-6);
    assert_eq!(bread.risk_level, RiskLevel::High);
    assert!(bread.stockout_risk_pct > 50.0);
    assert!(report
        .risk_engine
        .critical_products
        .iter()
        .any(|p| p.product_id == "bread"));
}

#[test]
fn stock_far_above_demand_is_high_overstock_risk() {
    let report = bakery_report();
    let jam = profile(&report, "jam");
    assert!(jam.current_stock > 2.0 * jam.forecast_demand);
    assert_eq!(jam.risk_level, RiskLevel::High);
    assert!(jam.overstock_risk_pct > 50.0);
}

#[test]
fn expired_stock_is_flagged_for_donation() {
    let report = bakery_report();
    let milk = profile(&report, "milk");
    assert!((milk.overstock_risk_pct - 100.0).abs() < f64::EPSILON);
    assert!(milk.reason.contains("expired"));
    assert!(report.business_health.waste_percentage > 0.0);
    assert!(report
        .recommendations
        .iter()
        .any(|r| r.product_id.as_deref() == Some("milk") && r.action.contains("Donate")));
}

#[test]
fn product_without_history_is_kept_but_not_ranked() {
    let report = bakery_report();
    let cheese = profile(&report, "cheese");
    assert!(cheese.insufficient_data);
    assert!(cheese.avg_daily_units.abs() < f64::EPSILON);
    assert!(report.top_products.iter().all(|t| t.product_id != "cheese"));
}

#[test]
fn top_products_ranked_by_forecast_demand() {
    let report = bakery_report();
    assert!(report.top_products.len() <= 10);
    for pair in report.top_products.windows(2) {
        assert!(pair[0].forecast_demand >= pair[1].forecast_demand);
    }
    assert_eq!(report.top_products[0].product_id, "apples");
}

#[test]
fn degraded_health_raises_critical_alert() {
    let thresholds = ThresholdSet::default();
    let score = overall(10.0, 20.0, 0.0, &thresholds);
    assert!(score < 50.0);

    let health = BusinessHealth {
        inventory_turnover: 1.0,
        waste_percentage: 10.0,
        stockout_percentage: 20.0,
        volatile_product_count: 0,
        overall_score: score,
    };
    let risks = RiskEngine {
        stockout_risk: 0.0,
        overstock_risk: 0.0,
        weather_sensitivity: Intensity::Low,
        volatility_index: Intensity::Low,
        critical_products: vec![],
        product_risks: vec![],
    };
    let ctx = AlertContext {
        as_of: as_of(),
        health: &health,
        risks: &risks,
        weekly_change_pct: None,
    };

    let alerts = AlertEngine::default().evaluate(&ctx, &thresholds);
    assert!(alerts
        .iter()
        .any(|a| a.severity == Severity::Critical && a.title.contains("Business health")));
    assert_eq!(alerts[0].severity, Severity::Critical);
}
