use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use stockpulse::application::config::AppConfig;
use stockpulse::application::services::analytics::AnalyticsService;
use stockpulse::domain::ports::store::SnapshotStore;
use stockpulse::infrastructure::persistence::sqlite_store::SqliteStore;
use stockpulse::presentation::cli::app::{Cli, Commands};
use stockpulse::presentation::cli::commands::analyze::run_analyze;
use stockpulse::presentation::cli::commands::config::run_config;
use stockpulse::presentation::cli::commands::import::run_import;
use stockpulse::presentation::cli::commands::schedule::run_schedule;
use stockpulse::presentation::cli::commands::show::run_show;

fn print_banner() {
    println!("{}", "━".repeat(40).cyan());
    println!("{}", "  STOCKPULSE · Inventory Analytics".bold().cyan());
    println!("{}", "━".repeat(40).cyan());
}

fn setup_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_store(config: &AppConfig) -> anyhow::Result<SqliteStore> {
    let store = SqliteStore::new(&config.database.path)?;
    tracing::debug!("Database opened at {}", config.database_path().display());
    Ok(store)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose);

    // Load configuration
    let mut config = if let Some(ref path) = cli.config {
        AppConfig::load_from(path)?
    } else {
        AppConfig::load()?
    };

    let command = cli.command.unwrap_or(Commands::Analyze {
        tenant: None,
        json: false,
        refresh: false,
        sales_days: None,
        order_limit: None,
    });

    if let Commands::Analyze {
        sales_days,
        order_limit,
        ..
    } = &command
    {
        if let Some(days) = sales_days {
            config.lookback.sales_days = *days;
        }
        if let Some(limit) = order_limit {
            config.lookback.order_limit = *limit;
        }
    }

    if let Commands::Config = command {
        return run_config(&config);
    }

    // Manual DI: main.rs is the only place that knows concrete types
    let store = open_store(&config)?;
    let settings = config.engine_settings();
    let cache: Option<&dyn SnapshotStore> = if config.cache.enabled {
        Some(&store)
    } else {
        None
    };
    let service = AnalyticsService::new(
        &store,
        cache,
        config.lookback_window(),
        &settings,
        config.request_timeout(),
    );
    let default_tenant = config.general.tenant.clone();

    match command {
        Commands::Analyze {
            tenant,
            json,
            refresh,
            ..
        } => {
            let tenant = tenant.unwrap_or(default_tenant);
            run_analyze(&service, &tenant, refresh, json).await?;
        }
        Commands::Show { tenant, json } => {
            let tenant = tenant.unwrap_or(default_tenant);
            run_show(&service, &tenant, json)?;
        }
        Commands::Import { file, tenant } => {
            let tenant = tenant.unwrap_or(default_tenant);
            run_import(&store, &file, &tenant)?;
        }
        Commands::Schedule { tenant, interval } => {
            let tenant = tenant.unwrap_or(default_tenant);
            let interval_secs = interval.unwrap_or(config.general.interval_secs);
            print_banner();
            run_schedule(&service, &tenant, interval_secs).await?;
        }
        Commands::Config => run_config(&config)?,
    }

    Ok(())
}
