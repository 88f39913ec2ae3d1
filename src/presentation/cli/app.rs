use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// stockpulse: inventory risk and demand forecasting
///
/// Turns a shop's sales, stock and orders into a seven-day forecast,
/// stockout and overstock risk, a health score, alerts and ranked
/// recommendations.
#[derive(Parser, Debug)]
#[command(name = "stockpulse")]
#[command(version, about, long_about)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to custom config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the analysis once and print the snapshot
    #[command(alias = "a")]
    Analyze {
        /// Tenant to analyze (default: config)
        #[arg(short, long)]
        tenant: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Recompute even when the cached snapshot is current
        #[arg(long)]
        refresh: bool,

        /// Days of sales history to read (default: config)
        #[arg(long)]
        sales_days: Option<u32>,

        /// Number of recent orders to read (default: config)
        #[arg(long)]
        order_limit: Option<usize>,
    },

    /// Print the last cached snapshot
    #[command(alias = "s")]
    Show {
        /// Tenant to show (default: config)
        #[arg(short, long)]
        tenant: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Load a JSON dataset into the local store
    #[command(alias = "i")]
    Import {
        /// Dataset file with sales, products, orders and externalFactors
        file: PathBuf,

        /// Tenant to import into (default: config)
        #[arg(short, long)]
        tenant: Option<String>,
    },

    /// Refresh the snapshot periodically until interrupted
    Schedule {
        /// Tenant to refresh (default: config)
        #[arg(short, long)]
        tenant: Option<String>,

        /// Refresh interval in seconds (default: config)
        #[arg(short, long)]
        interval: Option<u64>,
    },

    /// Print the effective configuration
    #[command(alias = "c")]
    Config,
}
