use crate::domain::entities::alert::Alert;
use crate::domain::value_objects::severity::Severity;
use crate::domain::value_objects::thresholds::ThresholdSet;

use super::{AlertContext, AlertRule};

/// Days before expiry at which remaining stock is alerted on.
const IMMINENT_EXPIRY_DAYS: i64 = 2;
/// Smaller leftovers are not worth an alert.
const MIN_EXPIRING_UNITS: f64 = 5.0;

/// One alert per product expiring within two days with stock left.
/// Stock expiring today is critical.
pub struct ExpiringStockRule;

impl AlertRule for ExpiringStockRule {
    fn name(&self) -> &'static str {
        "expiring_stock"
    }

    fn evaluate(&self, ctx: &AlertContext<'_>, thresholds: &ThresholdSet) -> Vec<Alert> {
        ctx.risks
            .product_risks
            .iter()
            .filter(|p| p.current_stock > MIN_EXPIRING_UNITS)
            .filter_map(|p| {
                let days = p.days_to_expiry?;
                if !(0..=IMMINENT_EXPIRY_DAYS).contains(&days) {
                    return None;
                }
                let when = match days {
                    0 => "today".to_string(),
                    1 => "tomorrow".to_string(),
                    n => format!("in {n} days"),
                };
                Some(Alert {
                    title: format!("{} expires {when}", p.name),
                    description: format!(
                        "{:.0} units on hand, about {:.0} expected to sell before expiry",
                        p.current_stock,
                        (p.current_stock - p.excess_units).max(0.0)
                    ),
                    severity: if days == 0 {
                        Severity::Critical
                    } else {
                        Severity::Warning
                    },
                    timestamp: ctx.as_of,
                    rule: self.name().to_string(),
                })
            })
            .take(thresholds.critical_products)
            .collect()
    }
}
