//! Margin aggregation errors.

use margin_core::types::{DateError, SeriesError};
use margin_models::zero_rate::ZeroRateError;
use thiserror::Error;

use crate::scenarios::ScenarioError;
use crate::sensitivities::SensitivityError;

/// Errors raised while computing initial margin.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MarginError {
    /// A sensitivity fixing has no scenario series.
    #[error("No scenarios for fixing {fixing}")]
    MissingScenario {
        /// Fixing in years
        fixing: f64,
    },

    /// Unknown margin kind name.
    #[error("Unknown margin kind: {0}")]
    UnknownMarginKind(String),

    /// Scenario construction failure.
    #[error("Scenario error: {0}")]
    Scenario(#[from] ScenarioError),

    /// Sensitivity computation failure.
    #[error("Sensitivity error: {0}")]
    Sensitivity(#[from] SensitivityError),

    /// Zero-rate model failure during revaluation.
    #[error("Zero rate error: {0}")]
    ZeroRate(#[from] ZeroRateError),

    /// Series combination failure.
    #[error("Series error: {0}")]
    Series(#[from] SeriesError),

    /// Date arithmetic failure.
    #[error("Date error: {0}")]
    Date(#[from] DateError),
}
