//! Check command implementation
//!
//! Validates the configuration, the history and the trades.

use tracing::info;

use crate::config::CliConfig;
use crate::Result;

/// Run the check command
pub fn run(config: &CliConfig) -> Result<()> {
    info!("Checking configuration...");

    println!("Margin Engine Check");
    println!("===================\n");

    config.validate()?;
    println!("Configuration:");
    println!("  Reference date: {}", config.model.reference_date);
    println!("  Paths: {}", config.model.paths);
    println!(
        "  Grid: {} years at {} steps/year",
        config.model.horizon_years, config.model.steps_per_year
    );
    println!();

    let history = config.load_history()?;
    println!("History:");
    println!("  Dates: {}", history.len());
    if let (Some(first), Some(last)) = (history.first_date(), history.last_date()) {
        println!("  Range: {} .. {}", first, last);
    }
    println!();

    let portfolio = config.build_portfolio()?;
    println!("Portfolio:");
    println!("  Currency: {}", portfolio.currency());
    println!("  Curve: {}", portfolio.curve_name());
    println!("  Legs: {}", portfolio.len());
    if let Some(last) = portfolio.last_payment_date() {
        println!("  Last payment: {}", last);
    }
    println!();

    println!("Parallelisation:");
    println!("  Rayon threads: {}", rayon::current_num_threads());
    println!(
        "  Parallel threshold: {}",
        config.margin.parallel_threshold
    );
    println!();

    println!("All checks passed!");
    Ok(())
}
