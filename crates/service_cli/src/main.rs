//! Margin CLI - PAIRS Initial Margin and MVA
//!
//! # Commands
//!
//! - `margin run` - Base, floor and PAIRS initial margin for a date or range
//! - `margin mva` - Margin valuation adjustment of the configured portfolio
//! - `margin check` - Validate configuration, history and trades
//!
//! # Architecture
//!
//! As part of the **S**ervice layer, this crate wires the loaders, the
//! zero-rate model and the margin engine behind one command-line interface.

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;

pub use error::{CliError, Result};

use config::{CliConfig, LogLevel};

/// PAIRS initial margin engine
#[derive(Parser)]
#[command(name = "margin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "margin.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute base, floor and PAIRS initial margin
    Run {
        /// Evaluation date (YYYY-MM-DD); defaults to the reference date
        #[arg(short, long)]
        date: Option<String>,

        /// Last evaluation date of a business-day range
        #[arg(short, long)]
        end: Option<String>,

        /// Output format (json, table)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Compute the margin valuation adjustment
    Mva {
        /// Funding spread over the numeraire rate
        #[arg(short, long, default_value = "0.0")]
        spread: f64,

        /// Margin figure to fund (base, floor, pairs)
        #[arg(short, long, default_value = "pairs")]
        kind: String,

        /// Output format (json, table)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Check configuration, history and trades
    Check,
}

fn init_tracing(level: LogLevel) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.as_filter_str())),
        )
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = CliConfig::load(&cli.config)?.with_env_override()?;
    let level = match (&cli.log_level, cli.verbose) {
        (Some(level), _) => level.parse()?,
        (None, true) => LogLevel::Debug,
        (None, false) => config.general.log_level,
    };
    init_tracing(level);

    if cli.verbose {
        info!("Verbose mode enabled");
    }
    info!(config = %cli.config, "configuration loaded");

    match cli.command {
        Commands::Run { date, end, format } => {
            commands::run::run(&config, date.as_deref(), end.as_deref(), &format)?
        }
        Commands::Mva {
            spread,
            kind,
            format,
        } => commands::mva::run(&config, spread, &kind, &format)?,
        Commands::Check => commands::check::run(&config)?,
    }
    Ok(())
}
