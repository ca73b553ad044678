//! MVA command implementation
//!
//! Funds the configured margin figure over the life of the portfolio.

use margin_risk::{MarginKind, MarginValuationAdjustment, PairsInitialMargin};
use serde::Serialize;
use tracing::info;

use super::OutputFormat;
use crate::config::CliConfig;
use crate::{CliError, Result};

/// MVA report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MvaReport {
    /// Margin figure funded
    pub kind: String,
    /// Funding spread
    pub funding_spread: f64,
    /// Adjustment
    pub mva: f64,
    /// `(date, average margin)` per grid date
    pub profile: Vec<(String, f64)>,
}

/// Run the MVA command
pub fn run(config: &CliConfig, funding_spread: f64, kind: &str, format: &str) -> Result<()> {
    let format: OutputFormat = format.parse()?;
    let kind: MarginKind = kind
        .parse()
        .map_err(|e| CliError::InvalidArgument(format!("{}", e)))?;
    info!("Computing MVA...");
    info!("  Margin: {}", kind);
    info!("  Funding spread: {}", funding_spread);

    let report = mva_report(config, funding_spread, kind)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table => {
            println!("\n┌────────────────┬──────────────────┐");
            println!("│ Margin         │ {:>16} │", report.kind);
            println!("│ Funding spread │ {:>16.6} │", report.funding_spread);
            println!("│ Grid dates     │ {:>16} │", report.profile.len());
            println!("│ MVA            │ {:>16.2} │", report.mva);
            println!("└────────────────┴──────────────────┘");
        }
    }

    info!("MVA complete");
    Ok(())
}

/// MVA of the configured portfolio and its margin profile.
pub fn mva_report(config: &CliConfig, funding_spread: f64, kind: MarginKind) -> Result<MvaReport> {
    let model = config.build_model()?;
    let portfolio = config.build_portfolio()?;
    let engine = PairsInitialMargin::new(&model, &portfolio, config.margin_config());

    let valuation = MarginValuationAdjustment::new(funding_spread, kind)?.valuation(&engine)?;
    Ok(MvaReport {
        kind: kind.to_string(),
        funding_spread,
        mva: valuation.mva,
        profile: valuation
            .profile
            .into_iter()
            .map(|(date, im)| (date.to_string(), im.average()))
            .collect(),
    })
}
