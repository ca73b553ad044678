//! Zero-curve history loader.
//!
//! The file has one header row `maturity,<date>,<date>,…` followed by one
//! row per maturity `<years>,<rate>,<rate>,…`. Dates may appear in any
//! order; empty cells are treated as missing observations.

use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use margin_core::types::Date;
use margin_models::zero_rate::ZeroCurveHistory;
use tracing::{debug, info};

use crate::error::LoaderError;

/// CSV loader for [`ZeroCurveHistory`].
pub struct HistoryLoader;

impl HistoryLoader {
    /// Loads the history stored at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<ZeroCurveHistory, LoaderError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(LoaderError::FileNotFound(path.to_path_buf()));
        }
        let history = Self::from_reader(std::fs::File::open(path)?)?;
        info!(
            path = %path.display(),
            dates = history.len(),
            "zero-curve history loaded"
        );
        Ok(history)
    }

    /// Parses a history from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<ZeroCurveHistory, LoaderError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        if headers.is_empty() {
            return Err(LoaderError::MissingColumn("maturity".to_string()));
        }

        let mut seen = BTreeSet::new();
        let mut dates = Vec::with_capacity(headers.len().saturating_sub(1));
        for field in headers.iter().skip(1) {
            let date: Date = field.parse().map_err(|e| LoaderError::invalid(1, e))?;
            if !seen.insert(date) {
                return Err(LoaderError::invalid(1, format!("duplicate date {}", date)));
            }
            dates.push(date);
        }
        if dates.is_empty() {
            return Err(LoaderError::MissingColumn("date".to_string()));
        }

        let mut observations = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let row = idx + 2;
            let record = result?;
            let maturity: f64 = record
                .get(0)
                .unwrap_or_default()
                .parse()
                .map_err(|e| LoaderError::invalid(row, format!("maturity: {}", e)))?;
            if !maturity.is_finite() || maturity <= 0.0 {
                return Err(LoaderError::invalid(
                    row,
                    format!("maturity must be positive, got {}", maturity),
                ));
            }

            for (date, cell) in dates.iter().zip(record.iter().skip(1)) {
                if cell.is_empty() {
                    continue;
                }
                let rate: f64 = cell
                    .parse()
                    .map_err(|e| LoaderError::invalid(row, format!("rate on {}: {}", date, e)))?;
                observations.push((*date, maturity, rate));
            }
        }
        debug!(
            dates = dates.len(),
            observations = observations.len(),
            "history parsed"
        );

        Ok(ZeroCurveHistory::from_rates(observations))
    }
}
