use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::alert::Alert;
use super::factor::InfluencingFactor;
use super::forecast::SalesForecast;
use super::health::BusinessHealth;
use super::recommendation::Recommendation;
use super::risk::RiskEngine;
use super::top_product::TopProduct;
use crate::domain::analytics::engine::AnalyticsReport;

/// Version of the serialized [`AnalyticsSnapshot`] contract. Bumped whenever
/// a field is added, removed or changes meaning.
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// Maximum number of entries in `topProducts`.
pub const MAX_TOP_PRODUCTS: usize = 10;

/// The immutable result of one analytics run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    pub risk_engine: RiskEngine,
    pub recommendations: Vec<Recommendation>,
    pub business_health: BusinessHealth,
    pub alerts: Vec<Alert>,
    pub sales_forecast: SalesForecast,
    pub top_products: Vec<TopProduct>,
    pub influencing_factors: Vec<InfluencingFactor>,
    pub last_updated: DateTime<Utc>,
}

/// A snapshot as kept in a cache, keyed by tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedSnapshot {
    pub schema_version: u32,
    /// Fingerprint of the inputs the snapshot was computed from
    pub input_version: String,
    pub snapshot: AnalyticsSnapshot,
}

impl CachedSnapshot {
    #[must_use]
    pub fn new(input_version: String, snapshot: AnalyticsSnapshot) -> Self {
        Self {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            input_version,
            snapshot,
        }
    }

    /// True when the entry was produced from `input_version` under the
    /// current schema.
    #[must_use]
    pub fn matches(&self, input_version: &str) -> bool {
        self.schema_version == SNAPSHOT_SCHEMA_VERSION && self.input_version == input_version
    }
}

/// A broken invariant found while validating a snapshot.
#[derive(Debug, Error, PartialEq)]
pub enum SnapshotViolation {
    #[error("{field} is not a finite non-negative number: {value}")]
    Negative { field: String, value: f64 },

    #[error("{field} is outside [0, 100]: {value}")]
    OutOfRange { field: String, value: f64 },

    #[error("forecast confidence increases at day {day}")]
    ConfidenceIncreases { day: u32 },

    #[error("forecast days are not 1..={expected}")]
    ForecastDays { expected: usize },

    #[error("recommendation priorities are not 1..=n in order (found {found} at position {position})")]
    PriorityOrder { position: usize, found: u32 },

    #[error("{0} top products exceed the limit of 10")]
    TooManyTopProducts(usize),
}

impl AnalyticsSnapshot {
    /// Stamps a computed report with the wall-clock time of the run.
    #[must_use]
    pub fn assemble(report: AnalyticsReport, last_updated: DateTime<Utc>) -> Self {
        Self {
            risk_engine: report.risk_engine,
            recommendations: report.recommendations,
            business_health: report.business_health,
            alerts: report.alerts,
            sales_forecast: report.sales_forecast,
            top_products: report.top_products,
            influencing_factors: report.influencing_factors,
            last_updated,
        }
    }

    /// Checks the snapshot contract before it leaves the service.
    pub fn validate(&self) -> Result<(), SnapshotViolation> {
        let forecast = &self.sales_forecast;
        for (i, point) in forecast.next_seven_days.iter().enumerate() {
            if point.day as usize != i + 1 {
                return Err(SnapshotViolation::ForecastDays {
                    expected: forecast.next_seven_days.len(),
                });
            }
            non_negative("predictedUnits", point.predicted_units)?;
            non_negative("predictedRevenue", point.predicted_revenue)?;
            percent("confidence", point.confidence)?;
        }
        for pair in forecast.next_seven_days.windows(2) {
            if pair[1].confidence > pair[0].confidence {
                return Err(SnapshotViolation::ConfidenceIncreases { day: pair[1].day });
            }
        }
        non_negative("totalForecast", forecast.total_forecast)?;
        non_negative("totalUnits", forecast.total_units)?;

        percent("stockoutRisk", self.risk_engine.stockout_risk)?;
        percent("overstockRisk", self.risk_engine.overstock_risk)?;
        for profile in &self.risk_engine.product_risks {
            percent("stockoutRiskPct", profile.stockout_risk_pct)?;
            percent("overstockRiskPct", profile.overstock_risk_pct)?;
        }

        let health = &self.business_health;
        non_negative("inventoryTurnover", health.inventory_turnover)?;
        percent("wastePercentage", health.waste_percentage)?;
        percent("stockoutPercentage", health.stockout_percentage)?;
        percent("overallScore", health.overall_score)?;

        for (position, rec) in self.recommendations.iter().enumerate() {
            if rec.priority as usize != position + 1 {
                return Err(SnapshotViolation::PriorityOrder {
                    position,
                    found: rec.priority,
                });
            }
        }

        if self.top_products.len() > MAX_TOP_PRODUCTS {
            return Err(SnapshotViolation::TooManyTopProducts(self.top_products.len()));
        }
        Ok(())
    }
}

fn non_negative(field: &str, value: f64) -> Result<(), SnapshotViolation> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SnapshotViolation::Negative {
            field: field.to_string(),
            value,
        })
    }
}

fn percent(field: &str, value: f64) -> Result<(), SnapshotViolation> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(SnapshotViolation::OutOfRange {
            field: field.to_string(),
            value,
        })
    }
}
