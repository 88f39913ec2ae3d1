use serde::{Deserialize, Serialize};

/// Prediction for one horizon day (1..=7).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    pub day: u32,
    pub predicted_units: f64,
    pub predicted_revenue: f64,
    /// Percentage in `[0, 100]`, non-increasing in `day`
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductForecast {
    pub product_id: String,
    pub points: Vec<ForecastPoint>,
}

impl ProductForecast {
    #[must_use]
    pub fn total_units(&self) -> f64 {
        self.points.iter().map(|p| p.predicted_units).sum()
    }

    /// Units predicted for horizon days `1..=day`.
    #[must_use]
    pub fn units_through(&self, day: i64) -> f64 {
        self.points
            .iter()
            .filter(|p| i64::from(p.day) <= day)
            .map(|p| p.predicted_units)
            .sum()
    }
}

/// Aggregate 7-day forecast across all products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesForecast {
    #[serde(rename = "next7Days")]
    pub next_seven_days: Vec<ForecastPoint>,
    /// Predicted revenue over the horizon
    pub total_forecast: f64,
    pub total_units: f64,
    /// Percent change of `total_forecast` against the trailing 7 days
    pub growth_vs_last_week: f64,
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    fn point(day: u32, units: f64) -> ForecastPoint {
        ForecastPoint {
            day,
            predicted_units: units,
            predicted_revenue: units * 2.0,
            confidence: 90.0,
        }
    }

    #[test]
    fn units_through_sums_prefix() {
        let forecast = ProductForecast {
            product_id: "p1".into(),
            points: (1..=7).map(|d| point(d, 2.0)).collect(),
        };
        assert!((forecast.total_units() - 14.0).abs() < 1e-9);
        assert!((forecast.units_through(3) - 6.0).abs() < 1e-9);
        assert!((forecast.units_through(0) - 0.0).abs() < 1e-9);
        assert!((forecast.units_through(-2) - 0.0).abs() < 1e-9);
    }

    #[test]
    fn sales_forecast_uses_next7days_key() {
        let forecast = SalesForecast {
            next_seven_days: vec![point(1, 1.0)],
            total_forecast: 2.0,
            total_units: 1.0,
            growth_vs_last_week: 0.0,
        };
        let json = serde_json::to_value(&forecast).expect("serialize");
        assert!(json.get("next7Days").is_some());
        assert!(json.get("totalForecast").is_some());
        assert!(json.get("growthVsLastWeek").is_some());
    }
}
