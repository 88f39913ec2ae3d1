use crate::domain::entities::alert::Alert;
use crate::domain::value_objects::severity::Severity;
use crate::domain::value_objects::thresholds::ThresholdSet;

use super::{AlertContext, AlertRule};

pub struct DemandSpikeRule;

impl AlertRule for DemandSpikeRule {
    fn name(&self) -> &'static str {
        "demand_spike"
    }

    fn evaluate(&self, ctx: &AlertContext<'_>, thresholds: &ThresholdSet) -> Vec<Alert> {
        match ctx.weekly_change_pct {
            Some(change) if change > thresholds.demand_spike_percent => vec![Alert {
                title: format!("Demand up {change:.0}% week over week"),
                description: "Check stock levels of fast movers before the next order cutoff"
                    .to_string(),
                severity: Severity::Info,
                timestamp: ctx.as_of,
                rule: self.name().to_string(),
            }],
            _ => vec![],
        }
    }
}
