use colored::Colorize;

use crate::application::config::AppConfig;

/// Prints the effective configuration as TOML.
///
/// # Errors
///
/// Returns an error if the configuration cannot be serialized.
pub fn run_config(config: &AppConfig) -> anyhow::Result<()> {
    println!("{}", "# effective stockpulse configuration".dimmed());
    println!("{}", config.to_toml()?);
    Ok(())
}
