use colored::Colorize;

use crate::domain::entities::alert::Alert;
use crate::domain::value_objects::risk_level::RiskLevel;
use crate::domain::value_objects::severity::Severity;

/// Strips escape characters so imported product names cannot drive the terminal.
#[must_use]
pub fn sanitize_terminal(input: &str) -> String {
    input.chars().filter(|c| *c != '\x1b').collect()
}

fn severity_badge(severity: Severity) -> String {
    let label = format!(" {severity} ");
    match severity {
        Severity::Critical => format!("{}", label.on_red().white().bold()),
        Severity::Warning => format!("{}", label.on_yellow().black().bold()),
        Severity::Info => format!("{}", label.on_blue().white()),
    }
}

#[must_use]
pub fn risk_badge(level: RiskLevel) -> String {
    let label = format!("[{level}]");
    match level {
        RiskLevel::Low => format!("{}", label.green()),
        RiskLevel::Medium => format!("{}", label.yellow()),
        RiskLevel::High => format!("{}", label.red().bold()),
    }
}

pub fn format_alerts(alerts: &[Alert]) {
    for alert in alerts {
        println!();
        println!(
            "{} {} {}",
            severity_badge(alert.severity),
            alert.severity.emoji(),
            sanitize_terminal(&alert.title).bold()
        );
        if !alert.description.is_empty() {
            println!("  {}", sanitize_terminal(&alert.description).dimmed());
        }
    }
    println!();
}

pub fn print_no_alerts() {
    println!();
    println!("{}", "✅ No alerts for this period".green().bold());
    println!();
}
