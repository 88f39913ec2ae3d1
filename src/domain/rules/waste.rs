use crate::domain::entities::alert::Alert;
use crate::domain::value_objects::severity::Severity;
use crate::domain::value_objects::thresholds::ThresholdSet;

use super::{AlertContext, AlertRule};

pub struct WasteRateRule;

impl AlertRule for WasteRateRule {
    fn name(&self) -> &'static str {
        "waste_rate"
    }

    fn evaluate(&self, ctx: &AlertContext<'_>, thresholds: &ThresholdSet) -> Vec<Alert> {
        let pct = ctx.health.waste_percentage;
        if pct > thresholds.waste_warning {
            vec![Alert {
                title: format!("Waste at {pct:.1}% of handled stock"),
                description: format!(
                    "Expired units on hand exceed the {:.0}% waste threshold",
                    thresholds.waste_warning
                ),
                severity: Severity::Warning,
                timestamp: ctx.as_of,
                rule: self.name().to_string(),
            }]
        } else {
            vec![]
        }
    }
}
