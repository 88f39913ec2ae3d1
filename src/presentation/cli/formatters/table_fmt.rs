use colored::Colorize;

use crate::domain::entities::forecast::ForecastPoint;
use crate::domain::entities::recommendation::Recommendation;
use crate::domain::entities::risk::RiskProfile;
use crate::domain::entities::top_product::TopProduct;
use crate::domain::value_objects::risk_level::RiskLevel;

use super::alert_fmt::sanitize_terminal;

fn truncate(text: &str, max: usize) -> String {
    sanitize_terminal(text).chars().take(max).collect()
}

/// Formats the seven-day forecast as an aligned table.
#[must_use]
pub fn format_forecast_table(points: &[ForecastPoint]) -> String {
    let header = format!(
        "{:<5} {:>10} {:>12} {:>11}",
        "DAY", "UNITS", "REVENUE", "CONFIDENCE"
    );
    let separator = "─".repeat(header.len());
    let mut rows = vec![header, separator];

    for p in points {
        rows.push(format!(
            "{:<5} {:>10.1} {:>12.2} {:>10.0}%",
            format!("+{}", p.day),
            p.predicted_units,
            p.predicted_revenue,
            p.confidence
        ));
    }

    rows.join("\n")
}

/// Formats top products by forecast demand, highest first.
#[must_use]
pub fn format_top_products_table(products: &[TopProduct]) -> String {
    let header = format!(
        "{:<20} {:>8} {:>9} {:>8} {:<7} {:<24}",
        "PRODUCT", "STOCK", "DEMAND 7D", "AVG/DAY", "RISK", "HINT"
    );
    let separator = "─".repeat(header.len());
    let mut rows = vec![header, separator];

    for p in products {
        let row = format!(
            "{:<20} {:>8.1} {:>9.1} {:>8.2} {:<7} {:<24}",
            truncate(&p.name, 19),
            p.current_stock,
            p.forecast_demand,
            p.avg_daily_sales,
            p.risk_level.to_string(),
            truncate(&p.recommendation, 24)
        );
        if p.risk_level == RiskLevel::High {
            rows.push(row.red().to_string());
        } else {
            rows.push(row);
        }
    }

    rows.join("\n")
}

/// Formats the critical products with the reason behind each rating.
#[must_use]
pub fn format_critical_products(profiles: &[RiskProfile]) -> String {
    profiles
        .iter()
        .map(|p| {
            format!(
                "  {:<20} stockout {:>5.1}%  overstock {:>5.1}%  {}",
                truncate(&p.name, 19),
                p.stockout_risk_pct,
                p.overstock_risk_pct,
                sanitize_terminal(&p.reason).dimmed()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Formats recommendations in priority order.
#[must_use]
pub fn format_recommendations(recommendations: &[Recommendation]) -> String {
    recommendations
        .iter()
        .map(|r| {
            format!(
                "  {:>2}. {} {}\n      {} {}",
                r.priority,
                format!("[{}]", r.kind).cyan(),
                sanitize_terminal(&r.action).bold(),
                sanitize_terminal(&r.reason).dimmed(),
                sanitize_terminal(&r.impact).green()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
