//! Swap trade-list loader.
//!
//! One vanilla swap per row:
//!
//! ```text
//! currency,curve,notional,start,end,fixed_rate,frequency,payer
//! EUR,EUR-6M,10000000,2024-01-02,2034-01-02,0.025,semiannual,true
//! ```
//!
//! `payer = true` means the fixed leg is paid.

use std::io::Read;
use std::path::Path;

use margin_core::types::{Currency, Date};
use margin_models::products::{CurveName, GlobalPortfolio, Swap};
use margin_models::schedules::{Frequency, ScheduleBuilder};
use serde::Deserialize;
use tracing::info;

use crate::error::LoaderError;

/// A vanilla swap as written in a trade file or configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TradeRecord {
    /// ISO currency code
    pub currency: String,
    /// Discount/forward curve name
    pub curve: String,
    /// Notional amount
    pub notional: f64,
    /// Effective date (YYYY-MM-DD)
    pub start: String,
    /// Maturity date (YYYY-MM-DD)
    pub end: String,
    /// Fixed coupon
    pub fixed_rate: f64,
    /// Coupon frequency of both legs
    pub frequency: String,
    /// `true` when the fixed leg is paid
    pub payer: bool,
}

impl TradeRecord {
    /// Builds the swap; `row` is reported in errors.
    pub fn build(&self, row: usize) -> Result<Swap, LoaderError> {
        let currency: Currency = self
            .currency
            .parse()
            .map_err(|e| LoaderError::invalid(row, e))?;
        let start: Date = self.start.parse().map_err(|e| LoaderError::invalid(row, e))?;
        let end: Date = self.end.parse().map_err(|e| LoaderError::invalid(row, e))?;
        let frequency: Frequency = self
            .frequency
            .parse()
            .map_err(|e| LoaderError::invalid(row, e))?;

        let schedule = ScheduleBuilder::new()
            .start(start)
            .end(end)
            .frequency(frequency)
            .build()
            .map_err(|e| LoaderError::invalid(row, e))?;

        Swap::vanilla(
            currency,
            CurveName::new(self.curve.as_str()),
            self.notional,
            &schedule,
            self.fixed_rate,
            self.payer,
        )
        .map_err(|e| LoaderError::invalid(row, e))
    }
}

/// CSV loader for swap trade lists.
pub struct TradeLoader;

impl TradeLoader {
    /// Loads the swaps stored at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<Swap>, LoaderError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(LoaderError::FileNotFound(path.to_path_buf()));
        }
        let swaps = Self::from_reader(std::fs::File::open(path)?)?;
        info!(path = %path.display(), trades = swaps.len(), "trade list loaded");
        Ok(swaps)
    }

    /// Parses swaps from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Swap>, LoaderError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        reader
            .deserialize::<TradeRecord>()
            .enumerate()
            .map(|(idx, result)| result?.build(idx + 2))
            .collect()
    }

    /// Loads the swaps at `path` grouped into one portfolio per currency.
    pub fn load_portfolios<P: AsRef<Path>>(path: P) -> Result<GlobalPortfolio, LoaderError> {
        Self::group(Self::load(path)?)
    }

    /// Groups swaps into one portfolio per currency.
    pub fn group(swaps: Vec<Swap>) -> Result<GlobalPortfolio, LoaderError> {
        let mut portfolios = GlobalPortfolio::new();
        for swap in swaps {
            portfolios.add_swap(swap)?;
        }
        Ok(portfolios)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "currency,curve,notional,start,end,fixed_rate,frequency,payer\n";

    // ========================================
    // Parsing
    // ========================================

    #[test]
    fn test_parse_trades() {
        let data = format!(
            "{}{}{}",
            HEADER,
            "EUR,EUR,10000000,2024-01-02,2029-01-02,0.025,semiannual,true\n",
            "USD,USD,5000000,2024-01-02,2026-01-02,0.04,annual,false\n",
        );
        let swaps = TradeLoader::from_reader(data.as_bytes()).unwrap();
        assert_eq!(swaps.len(), 2);
        assert_eq!(swaps[0].currency(), Currency::EUR);
        assert_eq!(swaps[0].payer().periods().len(), 10);
        assert_eq!(swaps[1].currency(), Currency::USD);
        assert_eq!(swaps[1].receiver().periods().len(), 2);
        assert_eq!(
            swaps[1].last_payment_date(),
            Some(Date::from_ymd(2026, 1, 2).unwrap())
        );
    }

    #[test]
    fn test_group_by_currency() {
        let data = format!(
            "{}{}{}{}",
            HEADER,
            "EUR,EUR,1000000,2024-01-02,2025-01-02,0.02,annual,true\n",
            "USD,USD,1000000,2024-01-02,2025-01-02,0.03,annual,true\n",
            "EUR,EUR,2000000,2024-01-02,2026-01-02,0.02,annual,false\n",
        );
        let swaps = TradeLoader::from_reader(data.as_bytes()).unwrap();
        let portfolios = TradeLoader::group(swaps).unwrap();
        // Two legs per swap
        assert_eq!(portfolios.portfolio(Currency::EUR).unwrap().len(), 4);
        assert_eq!(portfolios.portfolio(Currency::USD).unwrap().len(), 2);
    }

    // ========================================
    // Errors
    // ========================================

    #[test]
    fn test_unknown_currency_reports_row() {
        let data = format!(
            "{}{}{}",
            HEADER,
            "EUR,EUR,1000000,2024-01-02,2025-01-02,0.02,annual,true\n",
            "XXX,EUR,1000000,2024-01-02,2025-01-02,0.02,annual,true\n",
        );
        assert!(matches!(
            TradeLoader::from_reader(data.as_bytes()),
            Err(LoaderError::InvalidFormat { row: 3, .. })
        ));
    }

    #[test]
    fn test_inverted_dates_rejected() {
        let data = format!(
            "{}{}",
            HEADER, "EUR,EUR,1000000,2025-01-02,2024-01-02,0.02,annual,true\n"
        );
        assert!(matches!(
            TradeLoader::from_reader(data.as_bytes()),
            Err(LoaderError::InvalidFormat { row: 2, .. })
        ));
    }

    #[test]
    fn test_negative_notional_rejected() {
        let data = format!(
            "{}{}",
            HEADER, "EUR,EUR,-5,2024-01-02,2025-01-02,0.02,annual,true\n"
        );
        assert!(matches!(
            TradeLoader::from_reader(data.as_bytes()),
            Err(LoaderError::InvalidFormat { row: 2, .. })
        ));
    }

    #[test]
    fn test_malformed_payer_flag() {
        let data = format!(
            "{}{}",
            HEADER, "EUR,EUR,1000000,2024-01-02,2025-01-02,0.02,annual,maybe\n"
        );
        assert!(matches!(
            TradeLoader::from_reader(data.as_bytes()),
            Err(LoaderError::Csv(_))
        ));
    }

    #[test]
    fn test_file_not_found() {
        let result = TradeLoader::load("nonexistent.csv");
        assert!(matches!(result, Err(LoaderError::FileNotFound(_))));
    }
}
