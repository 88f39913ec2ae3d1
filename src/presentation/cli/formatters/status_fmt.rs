use colored::{ColoredString, Colorize};

/// Horizontal bar for a percentage where higher is worse.
#[must_use]
pub fn progress_bar(value: f64, width: usize) -> String {
    let ratio = (value / 100.0).clamp(0.0, 1.0);
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    let filled = (ratio * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);

    let bar_filled = "█".repeat(filled);
    let bar_empty = "░".repeat(empty);

    let colored_bar = if value >= 50.0 {
        bar_filled.red().bold()
    } else if value >= 25.0 {
        bar_filled.yellow()
    } else {
        bar_filled.green()
    };

    format!("{colored_bar}{bar_empty}")
}

#[must_use]
pub fn colorize_percent(value: f64) -> ColoredString {
    let text = format!("{value:.1}%");
    if value >= 50.0 {
        text.red().bold()
    } else if value >= 25.0 {
        text.yellow()
    } else {
        text.green()
    }
}

/// Health score out of 100, higher is better.
#[must_use]
pub fn colorize_score(score: f64) -> ColoredString {
    let text = format!("{score:.1}/100");
    if score < 50.0 {
        text.red().bold()
    } else if score < 75.0 {
        text.yellow()
    } else {
        text.green()
    }
}

/// Signed percentage change, green when positive.
#[must_use]
pub fn colorize_change(value: f64) -> ColoredString {
    let text = format!("{value:+.1}%");
    if value > 0.0 {
        text.green()
    } else if value < 0.0 {
        text.red()
    } else {
        text.normal()
    }
}

pub fn print_section_header(title: &str) {
    println!("{}", title.bold().cyan());
    let display_width = title.chars().count();
    println!("{}", "─".repeat(display_width).cyan());
}
