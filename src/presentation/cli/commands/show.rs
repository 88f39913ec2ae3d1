use crate::application::services::analytics::AnalyticsService;
use crate::presentation::cli::formatters::snapshot_fmt::print_snapshot;

/// Prints the tenant's cached snapshot without recomputing.
///
/// # Errors
///
/// Returns an error if the cache cannot be read, holds nothing for the
/// tenant, or JSON serialization fails.
pub fn run_show(service: &AnalyticsService<'_>, tenant: &str, json: bool) -> anyhow::Result<()> {
    let Some(cached) = service.cached(tenant)? else {
        anyhow::bail!("No cached snapshot for '{tenant}'. Run `stockpulse analyze` first");
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&cached.snapshot)?);
    } else {
        print_snapshot(tenant, &cached.snapshot);
    }
    Ok(())
}
