use colored::Colorize;

use crate::domain::entities::snapshot::AnalyticsSnapshot;
use crate::domain::value_objects::intensity::Intensity;

use super::alert_fmt::{self, sanitize_terminal};
use super::status_fmt::{
    colorize_change, colorize_percent, colorize_score, print_section_header, progress_bar,
};
use super::table_fmt::{
    format_critical_products, format_forecast_table, format_recommendations,
    format_top_products_table,
};

fn colorize_intensity(intensity: Intensity) -> String {
    let text = intensity.to_string();
    match intensity {
        Intensity::Low => text.green().to_string(),
        Intensity::Medium => text.yellow().to_string(),
        Intensity::High => text.red().bold().to_string(),
    }
}

/// Prints every section of a snapshot for a terminal reader.
pub fn print_snapshot(tenant: &str, snapshot: &AnalyticsSnapshot) {
    println!(
        "{}",
        format!("stockpulse · {}", sanitize_terminal(tenant)).bold().cyan()
    );
    println!(
        "{}",
        format!(
            "Updated {}",
            snapshot.last_updated.format("%Y-%m-%d %H:%M UTC")
        )
        .dimmed()
    );
    println!("{}", "━".repeat(50));

    let forecast = &snapshot.sales_forecast;
    print_section_header("\n📈 Sales forecast (next 7 days)");
    println!("{}", format_forecast_table(&forecast.next_seven_days));
    println!(
        "  Total: {:.2} ({:.1} units)  vs last week: {}",
        forecast.total_forecast,
        forecast.total_units,
        colorize_change(forecast.growth_vs_last_week)
    );

    let risk = &snapshot.risk_engine;
    print_section_header("\n📦 Inventory risk");
    println!(
        "  Stockout   {} {}",
        progress_bar(risk.stockout_risk, 30),
        colorize_percent(risk.stockout_risk)
    );
    println!(
        "  Overstock  {} {}",
        progress_bar(risk.overstock_risk, 30),
        colorize_percent(risk.overstock_risk)
    );
    println!(
        "  Weather sensitivity: {}  Volatility: {}",
        colorize_intensity(risk.weather_sensitivity),
        colorize_intensity(risk.volatility_index)
    );
    if !risk.critical_products.is_empty() {
        println!("  Critical products:");
        println!("{}", format_critical_products(&risk.critical_products));
    }

    let health = &snapshot.business_health;
    print_section_header("\n💚 Business health");
    println!("  Score: {}", colorize_score(health.overall_score));
    println!(
        "  Turnover {:.2}  Waste {}  Stockouts {}  Volatile products {}",
        health.inventory_turnover,
        colorize_percent(health.waste_percentage),
        colorize_percent(health.stockout_percentage),
        health.volatile_product_count
    );

    if !snapshot.top_products.is_empty() {
        print_section_header("\n🏆 Top products");
        println!("{}", format_top_products_table(&snapshot.top_products));
    }

    if !snapshot.recommendations.is_empty() {
        print_section_header("\n💡 Recommendations");
        println!("{}", format_recommendations(&snapshot.recommendations));
    }

    if !snapshot.influencing_factors.is_empty() {
        print_section_header("\n🌦  Influencing factors");
        for factor in &snapshot.influencing_factors {
            println!(
                "  {} {}: {}",
                format!("[{}]", factor.impact).cyan(),
                factor.factor.bold(),
                factor.description
            );
        }
    }

    print_section_header("\n🔔 Alerts");
    if snapshot.alerts.is_empty() {
        alert_fmt::print_no_alerts();
    } else {
        alert_fmt::format_alerts(&snapshot.alerts);
    }
}
