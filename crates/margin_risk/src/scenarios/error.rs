//! Scenario construction errors.

use margin_core::types::{Date, SeriesError};
use margin_models::zero_rate::ZeroRateError;
use thiserror::Error;

use crate::transformations::TransformationError;

/// Errors raised while building scenario series.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScenarioError {
    /// The rolling window asks for at least as many dates as exist.
    #[error("Rolling window of {requested} days needs more than the {available} dates up to {cutoff}")]
    InsufficientHistory {
        /// Window length
        requested: usize,
        /// Dates on or before the cutoff
        available: usize,
        /// Window end
        cutoff: Date,
    },

    /// A rolling window of zero days.
    #[error("Rolling window length must be positive")]
    EmptyWindow,

    /// The stress interval ends before it starts.
    #[error("Stress window {start}..{end} is empty")]
    InvalidStressWindow {
        /// First stress date
        start: Date,
        /// Last stress date
        end: Date,
    },

    /// Unknown simulation name.
    #[error("Unknown simulation: {0}")]
    UnknownSimulation(String),

    /// Transformation pipeline failure.
    #[error("Transformation error: {0}")]
    Transformation(#[from] TransformationError),

    /// Zero-rate model failure while reading the rate history.
    #[error("Zero rate error: {0}")]
    ZeroRate(#[from] ZeroRateError),

    /// Series lookup failure.
    #[error("Series error: {0}")]
    Series(#[from] SeriesError),
}
