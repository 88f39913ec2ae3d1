use std::time::Duration;

use crate::application::services::analytics::AnalyticsService;

/// Refresh the tenant's snapshot at the configured interval.
///
/// Runs until it receives a SIGINT signal (Ctrl+C) via
/// [`tokio::signal::ctrl_c()`], then returns `Ok(())`. Each tick forces a
/// recomputation so the cache always reflects the latest data.
///
/// Errors during individual cycles are logged but do not stop the schedule.
///
/// # Errors
///
/// Returns an error only if `interval_secs` is zero.
pub async fn run_schedule(
    service: &AnalyticsService<'_>,
    tenant: &str,
    interval_secs: u64,
) -> anyhow::Result<()> {
    if interval_secs == 0 {
        anyhow::bail!("Refresh interval must be greater than 0");
    }
    tracing::info!("Scheduled refresh started for '{tenant}' (every {interval_secs}s)");
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                match service.run(tenant, true).await {
                    Ok(run) => {
                        tracing::info!(
                            "Refresh complete: {} alert(s), {} recommendation(s), health {:.1}{}",
                            run.snapshot.alerts.len(),
                            run.snapshot.recommendations.len(),
                            run.snapshot.business_health.overall_score,
                            if run.degraded.is_empty() { "" } else { " (partial data)" }
                        );
                    }
                    Err(e) => {
                        tracing::error!("Scheduled refresh failed: {e}");
                    }
                }
            }
            _ = &mut shutdown => {
                tracing::info!("Shutdown signal received, stopping schedule");
                println!("\nStopping stockpulse...");
                break;
            }
        }
    }
    Ok(())
}
