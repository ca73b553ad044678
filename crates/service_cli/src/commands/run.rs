//! Run command implementation
//!
//! Computes base, floor and PAIRS initial margin for one date or a range
//! of business days.

use margin_core::types::Date;
use margin_risk::PairsInitialMargin;
use serde::Serialize;
use tracing::info;

use super::OutputFormat;
use crate::config::CliConfig;
use crate::{CliError, Result};

/// Margin figures of one evaluation date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarginRow {
    /// Evaluation date
    pub date: String,
    /// Expected shortfall (ES6)
    pub base: f64,
    /// Value-at-risk (13th worst)
    pub floor: f64,
    /// max(base, floor)
    pub pairs: f64,
}

/// Run the margin command
pub fn run(config: &CliConfig, date: Option<&str>, end: Option<&str>, format: &str) -> Result<()> {
    let format: OutputFormat = format.parse()?;
    let dates = evaluation_dates(config.reference_date()?, date, end)?;
    info!("Computing initial margin...");
    info!("  Evaluation dates: {}", dates.len());
    info!("  Monte Carlo paths: {}", config.model.paths);

    let rows = margin_rows(config, &dates)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Table => {
            println!("\n┌────────────┬──────────────────┬──────────────────┬──────────────────┐");
            println!("│ Date       │ Base             │ Floor            │ Pairs            │");
            println!("├────────────┼──────────────────┼──────────────────┼──────────────────┤");
            for row in &rows {
                println!(
                    "│ {} │ {:>16.2} │ {:>16.2} │ {:>16.2} │",
                    row.date, row.base, row.floor, row.pairs
                );
            }
            println!("└────────────┴──────────────────┴──────────────────┴──────────────────┘");
        }
    }

    info!("Initial margin complete");
    Ok(())
}

/// `date` alone, or every business day from `date` to `end`.
///
/// `date` defaults to the model reference date.
pub fn evaluation_dates(reference: Date, date: Option<&str>, end: Option<&str>) -> Result<Vec<Date>> {
    let start = match date {
        Some(s) => s.parse()?,
        None => reference,
    };
    match end {
        None => Ok(vec![start]),
        Some(s) => {
            let end: Date = s.parse()?;
            if end < start {
                return Err(CliError::InvalidArgument(format!(
                    "End date {} is before {}",
                    end, start
                )));
            }
            Ok(Date::business_days(start, end)?)
        }
    }
}

/// Base, floor and pairs margin, averaged over paths, per date.
pub fn margin_rows(config: &CliConfig, dates: &[Date]) -> Result<Vec<MarginRow>> {
    let model = config.build_model()?;
    let portfolio = config.build_portfolio()?;
    let engine = PairsInitialMargin::new(&model, &portfolio, config.margin_config());

    dates
        .iter()
        .map(|&date| -> Result<MarginRow> {
            let margins = engine.margins(date)?;
            Ok(MarginRow {
                date: date.to_string(),
                base: margins.base.average(),
                floor: margins.floor.average(),
                pairs: margins.pairs.average(),
            })
        })
        .collect()
}
