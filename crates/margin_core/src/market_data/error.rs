//! Market data error types.

use thiserror::Error;

/// Zero curve errors.
///
/// # Examples
///
/// ```
/// use margin_core::market_data::CurveError;
///
/// let err = CurveError::NonFiniteMaturity { maturity: f64::NAN };
/// assert!(format!("{}", err).contains("NaN"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// A rate was requested from a curve without pillars.
    #[error("Curve has no rates")]
    EmptyCurve,

    /// Maturity is NaN or infinite.
    #[error("Invalid maturity: {maturity}")]
    NonFiniteMaturity {
        /// The rejected maturity
        maturity: f64,
    },
}

/// Tenor grid errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Unknown grid type name.
    #[error("Unknown tenor grid type: {0}")]
    UnknownGridType(String),

    /// Tenor name not present on the grid.
    #[error("Unknown tenor: {0}")]
    UnknownTenor(String),
}
