//! Path simulation errors.

use thiserror::Error;

/// Errors raised by path simulation models.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Model parameter outside its admissible range.
    #[error("Invalid parameter {name} = {value}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Rejected value
        value: f64,
    },

    /// Time grid is empty or not strictly increasing.
    #[error("Invalid time discretization: {0}")]
    InvalidDiscretization(String),

    /// Forward period with non-positive length.
    #[error("Invalid forward period [{start}, {end}]")]
    InvalidPeriod {
        /// Period start time
        start: f64,
        /// Period end time
        end: f64,
    },
}
