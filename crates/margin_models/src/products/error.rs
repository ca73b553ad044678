//! Product construction errors.

use margin_core::types::Currency;
use thiserror::Error;

use super::portfolio::CurveName;
use crate::schedules::ScheduleError;

/// Errors raised while building swaps and portfolios.
///
/// # Examples
/// ```
/// use margin_models::products::ProductError;
///
/// let err = ProductError::InvalidNotional { notional: -1.0 };
/// assert!(format!("{}", err).contains("-1"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProductError {
    /// Notional is zero, negative or not finite.
    #[error("Invalid notional: N = {notional}")]
    InvalidNotional {
        /// The invalid notional value
        notional: f64,
    },

    /// A swap does not belong to the portfolio's currency and curve.
    #[error("Swap in {currency}/{curve} cannot join portfolio {expected_currency}/{expected_curve}")]
    PortfolioMismatch {
        /// Portfolio currency
        expected_currency: Currency,
        /// Portfolio curve
        expected_curve: CurveName,
        /// Swap currency
        currency: Currency,
        /// Swap curve
        curve: CurveName,
    },

    /// Schedule generation failed.
    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),
}
