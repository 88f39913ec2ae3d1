pub mod demand;
pub mod expiry;
pub mod health;
pub mod overstock;
pub mod stockout;
pub mod waste;

use chrono::{DateTime, Utc};

use crate::domain::entities::alert::Alert;
use crate::domain::entities::health::BusinessHealth;
use crate::domain::entities::risk::RiskEngine;
use crate::domain::value_objects::thresholds::ThresholdSet;

/// Everything an alert rule may look at. Built from values the pipeline has
/// already computed; rules never recompute risk or health.
pub struct AlertContext<'a> {
    /// Point in time the analysis describes, used as the alert timestamp
    pub as_of: DateTime<Utc>,
    pub health: &'a BusinessHealth,
    pub risks: &'a RiskEngine,
    /// Week-over-week change of units sold, when two weeks of history exist
    pub weekly_change_pct: Option<f64>,
}

/// A deterministic rule that turns computed risk and health into alerts.
/// Rules are pure functions: context + thresholds in, alerts out. No I/O.
pub trait AlertRule: Send + Sync {
    /// Returns the unique name of this rule
    fn name(&self) -> &'static str;

    /// Evaluates the rule using the given thresholds
    fn evaluate(&self, ctx: &AlertContext<'_>, thresholds: &ThresholdSet) -> Vec<Alert>;
}

/// Returns every built-in alert rule
#[must_use]
pub fn default_rules() -> Vec<Box<dyn AlertRule>> {
    vec![
        Box::new(stockout::StockoutRateRule),
        Box::new(waste::WasteRateRule),
        Box::new(health::BusinessHealthRule),
        Box::new(stockout::ImminentStockoutRule),
        Box::new(expiry::ExpiringStockRule),
        Box::new(overstock::OverstockRule),
        Box::new(demand::DemandSpikeRule),
    ]
}

/// Runs a collection of rules against one analysis
pub struct AlertEngine {
    rules: Vec<Box<dyn AlertRule>>,
}

impl Default for AlertEngine {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

impl AlertEngine {
    #[must_use]
    pub fn new(rules: Vec<Box<dyn AlertRule>>) -> Self {
        Self { rules }
    }

    /// Runs all rules, returning alerts sorted by severity (critical first).
    /// Alerts of equal severity keep rule order.
    #[must_use]
    pub fn evaluate(&self, ctx: &AlertContext<'_>, thresholds: &ThresholdSet) -> Vec<Alert> {
        let mut alerts: Vec<Alert> = self
            .rules
            .iter()
            .flat_map(|rule| rule.evaluate(ctx, thresholds))
            .collect();
        alerts.sort_by(|a, b| b.severity.cmp(&a.severity));
        alerts
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::domain::value_objects::severity::Severity;

    struct NoopRule;
    impl AlertRule for NoopRule {
        fn name(&self) -> &'static str {
            "noop"
        }
        fn evaluate(&self, _: &AlertContext<'_>, _: &ThresholdSet) -> Vec<Alert> {
            vec![]
        }
    }

    struct FixedAlertRule {
        severity: Severity,
    }
    impl AlertRule for FixedAlertRule {
        fn name(&self) -> &'static str {
            "fixed"
        }
        fn evaluate(&self, ctx: &AlertContext<'_>, _: &ThresholdSet) -> Vec<Alert> {
            vec![Alert {
                title: "Fixed alert".to_string(),
                description: String::new(),
                severity: self.severity,
                timestamp: ctx.as_of,
                rule: "fixed".to_string(),
            }]
        }
    }

    #[test]
    fn engine_with_no_rules_returns_empty() {
        let (health, risks) = (healthy(), risks(vec![]));
        let engine = AlertEngine::new(vec![]);
        assert!(engine
            .evaluate(&context(&health, &risks), &ThresholdSet::default())
            .is_empty());
    }

    #[test]
    fn engine_with_noop_rule_returns_empty() {
        let noop = NoopRule;
        assert_eq!(noop.name(), "noop");
        let (health, risks) = (healthy(), risks(vec![]));
        let engine = AlertEngine::new(vec![Box::new(noop)]);
        assert!(engine
            .evaluate(&context(&health, &risks), &ThresholdSet::default())
            .is_empty());
    }

    #[test]
    fn engine_sorts_alerts_critical_first() {
        let (health, risks) = (healthy(), risks(vec![]));
        let engine = AlertEngine::new(vec![
            Box::new(FixedAlertRule {
                severity: Severity::Info,
            }),
            Box::new(FixedAlertRule {
                severity: Severity::Critical,
            }),
            Box::new(FixedAlertRule {
                severity: Severity::Warning,
            }),
        ]);
        let alerts = engine.evaluate(&context(&health, &risks), &ThresholdSet::default());
        assert_eq!(alerts.len(), 3);
        assert_eq!(alerts[0].severity, Severity::Critical);
        assert_eq!(alerts[1].severity, Severity::Warning);
        assert_eq!(alerts[2].severity, Severity::Info);
    }

    #[test]
    fn alerts_carry_the_analysis_timestamp() {
        let (health, risks) = (healthy(), risks(vec![]));
        let engine = AlertEngine::new(vec![Box::new(FixedAlertRule {
            severity: Severity::Info,
        })]);
        let alerts = engine.evaluate(&context(&health, &risks), &ThresholdSet::default());
        assert_eq!(alerts[0].timestamp, as_of());
    }

    #[test]
    fn default_rules_returns_all_rules() {
        let rules = default_rules();
        assert_eq!(rules.len(), 7);
        let names: Vec<&str> = rules.iter().map(|r| r.name()).collect();
        for expected in [
            "stockout_rate",
            "waste_rate",
            "business_health",
            "imminent_stockout",
            "expiring_stock",
            "overstock",
            "demand_spike",
        ] {
            assert!(names.contains(&expected), "missing {expected}");
        }
    }

    #[test]
    fn default_rules_are_quiet_on_healthy_business() {
        let (health, risks) = (healthy(), risks(vec![]));
        let alerts = AlertEngine::default()
            .evaluate(&context(&health, &risks), &ThresholdSet::default());
        assert!(alerts.is_empty());
    }
}
