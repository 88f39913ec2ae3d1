use crate::domain::entities::alert::Alert;
use crate::domain::value_objects::severity::Severity;
use crate::domain::value_objects::thresholds::ThresholdSet;

use super::{AlertContext, AlertRule};

pub struct OverstockRule;

impl AlertRule for OverstockRule {
    fn name(&self) -> &'static str {
        "overstock"
    }

    fn evaluate(&self, ctx: &AlertContext<'_>, thresholds: &ThresholdSet) -> Vec<Alert> {
        let over: Vec<&str> = ctx
            .risks
            .product_risks
            .iter()
            .filter(|p| p.overstock_risk_pct > thresholds.risk_high)
            .map(|p| p.name.as_str())
            .collect();
        if over.is_empty() {
            return vec![];
        }
        let shown: Vec<&str> = over.iter().take(3).copied().collect();
        let mut description = shown.join(", ");
        if over.len() > shown.len() {
            description.push_str(&format!(" and {} more", over.len() - shown.len()));
        }
        vec![Alert {
            title: format!(
                "Overproduction: {} product{} well above forecast demand",
                over.len(),
                if over.len() == 1 { "" } else { "s" }
            ),
            description,
            severity: Severity::Warning,
            timestamp: ctx.as_of,
            rule: self.name().to_string(),
        }]
    }
}
