use crate::domain::entities::alert::Alert;
use crate::domain::value_objects::severity::Severity;
use crate::domain::value_objects::thresholds::ThresholdSet;

use super::{AlertContext, AlertRule};

pub struct StockoutRateRule;

impl AlertRule for StockoutRateRule {
    fn name(&self) -> &'static str {
        "stockout_rate"
    }

    fn evaluate(&self, ctx: &AlertContext<'_>, thresholds: &ThresholdSet) -> Vec<Alert> {
        let pct = ctx.health.stockout_percentage;
        if pct <= thresholds.stockout_warning {
            return vec![];
        }
        let severity = if pct > thresholds.stockout_critical {
            Severity::Critical
        } else {
            Severity::Warning
        };
        vec![Alert {
            title: format!("Stockout rate at {pct:.1}%"),
            description: format!(
                "{pct:.1}% of products are at high risk of running out this week \
                 (warning above {:.0}%, critical above {:.0}%)",
                thresholds.stockout_warning, thresholds.stockout_critical
            ),
            severity,
            timestamp: ctx.as_of,
            rule: self.name().to_string(),
        }]
    }
}

/// Fires when a product's stock covers less than a few days of forecast
/// demand. Reports the product that runs out first.
pub struct ImminentStockoutRule;

impl AlertRule for ImminentStockoutRule {
    fn name(&self) -> &'static str {
        "imminent_stockout"
    }

    fn evaluate(&self, ctx: &AlertContext<'_>, thresholds: &ThresholdSet) -> Vec<Alert> {
        let mut short: Vec<(f64, &str)> = ctx
            .risks
            .product_risks
            .iter()
            .filter(|p| !p.insufficient_data && p.forecast_demand > 0.0)
            .map(|p| (p.current_stock / (p.forecast_demand / 7.0), p.name.as_str()))
            .filter(|(days, _)| *days < thresholds.imminent_stockout_days)
            .collect();
        if short.is_empty() {
            return vec![];
        }
        short.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(b.1)));

        let (days, name) = short[0];
        let hours = (days * 24.0).floor().max(0.0);
        let severity = if hours < 24.0 {
            Severity::Critical
        } else {
            Severity::Warning
        };
        let others = short.len() - 1;
        let mut description = if days <= 0.0 {
            format!("{name} is out of stock with demand forecast this week")
        } else {
            format!("{name} runs out in about {hours:.0} hours at the forecast rate")
        };
        if others > 0 {
            description.push_str(&format!(
                "; {others} other product{} under {:.0} days of cover",
                if others == 1 { "" } else { "s" },
                thresholds.imminent_stockout_days
            ));
        }
        vec![Alert {
            title: format!("Stockout imminent: {name}"),
            description,
            severity,
            timestamp: ctx.as_of,
            rule: self.name().to_string(),
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::risk::test_support::profile;
    use crate::domain::rules::test_support::{context, healthy, risks};
    use crate::domain::value_objects::risk_level::RiskLevel;

    #[test]
    fn quiet_at_or_below_warning() {
        let mut health = healthy();
        health.stockout_percentage = 5.0;
        let risks = risks(vec![]);
        let alerts = StockoutRateRule.evaluate(&context(&health, &risks), &ThresholdSet::default());
        assert!(alerts.is_empty());
    }

    #[test]
    fn warning_above_five() {
        let mut health = healthy();
        health.stockout_percentage = 8.0;
        let risks = risks(vec![]);
        let alerts = StockoutRateRule.evaluate(&context(&health, &risks), &ThresholdSet::default());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, Severity::Warning);
    }

    #[test]
    fn critical_above_fifteen() {
        let mut health = healthy();
        health.stockout_percentage = 20.0;
        let risks = risks(vec![]);
        let alerts = StockoutRateRule.evaluate(&context(&health, &risks), &ThresholdSet::default());
        assert_eq!(alerts[0].severity, Severity::Critical);
        assert_eq!(alerts[0].rule, "stockout_rate");
    }

    #[test]
    fn imminent_stockout_reports_hours_for_worst_product() {
        let mut soon = profile("soon", 90.0, 0.0, RiskLevel::High);
        soon.name = "Croissant".into();
        soon.current_stock = 2.0;
        soon.forecast_demand = 35.0;
        let mut later = profile("later", 40.0, 0.0, RiskLevel::Medium);
        later.current_stock = 10.0;
        later.forecast_demand = 35.0;
        let health = healthy();
        let risks = risks(vec![later, soon]);
        let alerts =
            ImminentStockoutRule.evaluate(&context(&health, &risks), &ThresholdSet::default());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].title, "Stockout imminent: Croissant");
        assert!(alerts[0].description.contains("9 hours"));
        assert!(alerts[0].description.contains("1 other product"));
        assert_eq!(alerts[0].severity, Severity::Critical);
    }

    #[test]
    fn empty_shelf_reads_out_of_stock() {
        let mut empty = profile("empty", 100.0, 0.0, RiskLevel::High);
        empty.name = "Sourdough".into();
        empty.current_stock = 0.0;
        empty.forecast_demand = 14.0;
        let health = healthy();
        let risks = risks(vec![empty]);
        let alerts =
            ImminentStockoutRule.evaluate(&context(&health, &risks), &ThresholdSet::default());
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].description.starts_with("Sourdough is out of stock"));
        assert!(!alerts[0].description.contains("hours"));
        assert_eq!(alerts[0].severity, Severity::Critical);
    }

    #[test]
    fn comfortable_cover_is_quiet() {
        let health = healthy();
        let risks = risks(vec![profile("a", 0.0, 0.0, RiskLevel::Low)]);
        let alerts =
            ImminentStockoutRule.evaluate(&context(&health, &risks), &ThresholdSet::default());
        assert!(alerts.is_empty());
    }
}
