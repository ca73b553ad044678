//! Errors raised by the zero-rate model.

use margin_core::market_data::CurveError;
use margin_core::types::{Date, DateError, SeriesError};
use thiserror::Error;

use crate::simulation::ModelError;

/// Historical data does not cover a requested date.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataGap {
    /// The date precedes the first historical record.
    #[error("{date} is before the first historical curve ({first})")]
    BeforeHistory {
        /// Requested date
        date: Date,
        /// First date with a historical curve
        first: Date,
    },

    /// The date lies after the end of history but before the model reference date.
    #[error("{date} falls between the end of history ({last}) and the model reference date ({reference})")]
    ContinuityGap {
        /// Requested date
        date: Date,
        /// Last date with a historical curve
        last: Date,
        /// Model reference date
        reference: Date,
    },

    /// No curve is recorded for a date inside the historical range.
    #[error("No historical curve for {0}")]
    MissingDate(Date),
}

/// Zero-rate model errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ZeroRateError {
    /// Historical data gap.
    #[error("Data gap: {0}")]
    DataGap(#[from] DataGap),

    /// Path simulation failure.
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// Curve lookup failure.
    #[error("Curve error: {0}")]
    Curve(#[from] CurveError),

    /// Series lookup failure.
    #[error("Series error: {0}")]
    Series(#[from] SeriesError),

    /// Date arithmetic failure.
    #[error("Date error: {0}")]
    Date(#[from] DateError),
}
