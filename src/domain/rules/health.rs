use crate::domain::entities::alert::Alert;
use crate::domain::value_objects::severity::Severity;
use crate::domain::value_objects::thresholds::ThresholdSet;

use super::{AlertContext, AlertRule};

pub struct BusinessHealthRule;

impl AlertRule for BusinessHealthRule {
    fn name(&self) -> &'static str {
        "business_health"
    }

    fn evaluate(&self, ctx: &AlertContext<'_>, thresholds: &ThresholdSet) -> Vec<Alert> {
        let health = ctx.health;
        if health.overall_score >= thresholds.health_critical {
            return vec![];
        }
        vec![Alert {
            title: format!("Business health critical: score {:.0}/100", health.overall_score),
            description: format!(
                "Waste {:.1}%, stockouts {:.1}%, {} volatile product(s)",
                health.waste_percentage, health.stockout_percentage, health.volatile_product_count
            ),
            severity: Severity::Critical,
            timestamp: ctx.as_of,
            rule: self.name().to_string(),
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rules::test_support::{context, healthy, risks};

    #[test]
    fn critical_below_fifty() {
        let mut health = healthy();
        health.waste_percentage = 10.0;
        health.stockout_percentage = 20.0;
        health.overall_score = 45.0;
        let risks = risks(vec![]);
        let alerts =
            BusinessHealthRule.evaluate(&context(&health, &risks), &ThresholdSet::default());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, Severity::Critical);
        assert!(alerts[0].title.contains("Business health"));
    }

    #[test]
    fn quiet_at_fifty() {
        let mut health = healthy();
        health.overall_score = 50.0;
        let risks = risks(vec![]);
        assert!(BusinessHealthRule
            .evaluate(&context(&health, &risks), &ThresholdSet::default())
            .is_empty());
    }
}
