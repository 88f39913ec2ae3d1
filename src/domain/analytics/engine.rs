use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::{factors, features, forecast, health, recommendations, risk, top_products};
use crate::domain::entities::alert::Alert;
use crate::domain::entities::factor::{ExternalFactor, InfluencingFactor};
use crate::domain::entities::forecast::SalesForecast;
use crate::domain::entities::health::BusinessHealth;
use crate::domain::entities::order::OrderRecord;
use crate::domain::entities::product::ProductSnapshot;
use crate::domain::entities::recommendation::Recommendation;
use crate::domain::entities::risk::RiskEngine;
use crate::domain::entities::sales::SalesRecord;
use crate::domain::entities::top_product::TopProduct;
use crate::domain::rules::{AlertContext, AlertEngine};
use crate::domain::value_objects::intensity::Intensity;
use crate::domain::value_objects::settings::ForecastSettings;
use crate::domain::value_objects::tenant::TenantId;
use crate::domain::value_objects::thresholds::ThresholdSet;

/// Tunables passed into every run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    pub forecast: ForecastSettings,
    pub thresholds: ThresholdSet,
}

/// Point-in-time copy of everything one run reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsInput {
    /// Moment the analysis describes. Days strictly before its date count as
    /// history.
    pub as_of: DateTime<Utc>,
    pub sales_days: u32,
    pub sales: Vec<SalesRecord>,
    pub products: Vec<ProductSnapshot>,
    pub orders: Vec<OrderRecord>,
    pub external_factors: Vec<ExternalFactor>,
}

impl AnalyticsInput {
    /// Hex SHA-256 over the tenant, the as-of date, the settings and the
    /// input collections. Equal fingerprints yield equal reports up to alert
    /// timestamps.
    pub fn fingerprint(
        &self,
        tenant: &TenantId,
        settings: &EngineSettings,
    ) -> Result<String, serde_json::Error> {
        let mut hasher = Sha256::new();
        hasher.update(tenant.as_str().as_bytes());
        hasher.update(self.as_of.date_naive().to_string().as_bytes());
        hasher.update(self.sales_days.to_le_bytes());
        hasher.update(serde_json::to_vec(settings)?);
        hasher.update(serde_json::to_vec(&self.sales)?);
        hasher.update(serde_json::to_vec(&self.products)?);
        hasher.update(serde_json::to_vec(&self.orders)?);
        hasher.update(serde_json::to_vec(&self.external_factors)?);
        Ok(hex::encode(hasher.finalize()))
    }
}

/// Everything a snapshot holds except its wall-clock stamp.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsReport {
    pub risk_engine: RiskEngine,
    pub recommendations: Vec<Recommendation>,
    pub business_health: BusinessHealth,
    pub alerts: Vec<Alert>,
    pub sales_forecast: SalesForecast,
    pub top_products: Vec<TopProduct>,
    pub influencing_factors: Vec<InfluencingFactor>,
}

/// Runs the whole pipeline. Pure: the same input and settings always give
/// the same report.
#[must_use]
pub fn compute(input: &AnalyticsInput, settings: &EngineSettings) -> AnalyticsReport {
    let thresholds = &settings.thresholds;
    let today = input.as_of.date_naive();

    // First occurrence wins for duplicated product ids
    let mut by_id: HashMap<&str, &ProductSnapshot> = HashMap::new();
    let mut unique: Vec<ProductSnapshot> = Vec::with_capacity(input.products.len());
    for product in &input.products {
        if !by_id.contains_key(product.product_id.as_str()) {
            by_id.insert(product.product_id.as_str(), product);
            unique.push(product.clone());
        }
    }

    let product_features = features::build_features(
        &unique,
        &input.sales,
        &input.orders,
        today,
        input.sales_days,
        thresholds,
    );

    let mut forecasts = Vec::with_capacity(product_features.len());
    let mut profiles = Vec::with_capacity(product_features.len());
    for f in &product_features {
        let Some(product) = by_id.get(f.product_id.as_str()) else {
            continue;
        };
        let product_forecast = forecast::forecast_product(f, product.unit_price, &settings.forecast);
        profiles.push(risk::classify(product, f, &product_forecast, today, thresholds));
        forecasts.push(product_forecast);
    }

    let totals = features::daily_totals(&input.sales, today, input.sales_days);
    let sales_forecast = forecast::aggregate(
        &forecasts,
        &product_features,
        features::trailing_week_revenue(&totals, today),
        &settings.forecast,
    );

    let daily_units: Vec<f64> = totals.iter().map(|t| t.units).collect();
    let weather_sensitivity = factors::weather_correlation(&totals, &input.external_factors)
        .map_or(Intensity::Low, Intensity::from_correlation);
    let risk_engine = risk::summarize(profiles, &daily_units, weather_sensitivity, thresholds);

    let units_sold: f64 = daily_units.iter().sum();
    let business_health = health::score(
        &risk_engine.product_risks,
        &unique,
        units_sold,
        today,
        thresholds,
    );

    let recommendations = recommendations::rank(&risk_engine.product_risks, &unique, thresholds);
    let top_products = top_products::rank(&risk_engine.product_risks);
    let influencing_factors = factors::analyze(&totals, &input.external_factors);

    let alerts = AlertEngine::default().evaluate(
        &AlertContext {
            as_of: input.as_of,
            health: &business_health,
            risks: &risk_engine,
            weekly_change_pct: factors::weekly_change(&totals),
        },
        thresholds,
    );

    AnalyticsReport {
        risk_engine,
        recommendations,
        business_health,
        alerts,
        sales_forecast,
        top_products,
        influencing_factors,
    }
}
