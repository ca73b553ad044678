//! MVA error types.

use margin_core::types::DateError;
use margin_models::zero_rate::ZeroRateError;
use thiserror::Error;

use crate::aggregation::MarginError;

/// Errors that can occur during MVA calculations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MvaError {
    /// Funding spread is not a finite number.
    #[error("Invalid funding spread: {0}")]
    InvalidFundingSpread(f64),

    /// Discount factor count does not match the margin profile.
    #[error("Discount factor count ({actual}) doesn't match margin profile ({expected})")]
    DiscountFactorMismatch {
        /// Expected count.
        expected: usize,
        /// Actual count.
        actual: usize,
    },

    /// Margin evaluation failed.
    #[error(transparent)]
    Margin(#[from] MarginError),

    /// Numeraire lookup failed.
    #[error(transparent)]
    ZeroRate(#[from] ZeroRateError),

    /// Business-day grid could not be built.
    #[error(transparent)]
    Date(#[from] DateError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            MvaError::InvalidFundingSpread(f64::NAN).to_string(),
            "Invalid funding spread: NaN"
        );
        assert_eq!(
            MvaError::DiscountFactorMismatch { expected: 3, actual: 2 }.to_string(),
            "Discount factor count (2) doesn't match margin profile (3)"
        );
    }
}
