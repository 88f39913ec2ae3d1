use colored::Colorize;

use crate::application::errors::AnalyticsError;
use crate::application::services::analytics::{AnalyticsRun, AnalyticsService};
use crate::presentation::cli::formatters::snapshot_fmt::print_snapshot;

/// Runs the analysis once and prints the snapshot.
///
/// In JSON mode a failure is printed as `{"error": "..."}` before the error
/// is returned.
///
/// # Errors
///
/// Returns an error if the run fails or JSON serialization fails.
pub async fn run_analyze(
    service: &AnalyticsService<'_>,
    tenant: &str,
    refresh: bool,
    json: bool,
) -> anyhow::Result<()> {
    let run = match service.run(tenant, refresh).await {
        Ok(run) => run,
        Err(e) => {
            if json {
                print_error_json(&e)?;
            }
            return Err(e.into());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&run.snapshot)?);
    } else {
        print_run_human(tenant, &run);
    }
    Ok(())
}

/// Prints the error body a client would receive for `err`.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn print_error_json(err: &AnalyticsError) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&err.body())?);
    Ok(())
}

fn print_run_human(tenant: &str, run: &AnalyticsRun) {
    print_snapshot(tenant, &run.snapshot);
    if run.from_cache {
        println!("{}", "Served from cache (inputs unchanged)".dimmed());
    }
    if !run.degraded.is_empty() {
        let names: Vec<String> = run.degraded.iter().map(ToString::to_string).collect();
        println!(
            "{} {}",
            "⚠️  Partial data:".yellow().bold(),
            format!("{} could not be read", names.join(", ")).yellow()
        );
    }
}
