//! Sensitivity engine errors.

use margin_models::zero_rate::ZeroRateError;
use thiserror::Error;

/// Errors raised while computing sensitivities.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SensitivityError {
    /// Unknown sensitivity type name.
    #[error("Unknown sensitivity type: {0}")]
    UnknownType(String),

    /// Unknown sensitivity order name.
    #[error("Unknown sensitivity order: {0}")]
    UnknownOrder(String),

    /// Zero-rate model failure.
    #[error("Zero rate error: {0}")]
    ZeroRate(#[from] ZeroRateError),
}
