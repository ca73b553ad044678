//! Transformation pipeline errors.

use margin_core::types::{Date, SeriesError};
use thiserror::Error;

/// Errors raised while applying a rate transformation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformationError {
    /// The input series is too short for the transformation.
    #[error("{id}: {required} observations required, {available} available")]
    InsufficientData {
        /// Transformation id
        id: &'static str,
        /// Minimum number of observations
        required: usize,
        /// Observations in the primary data
        available: usize,
    },

    /// EWMA seed window must exceed one observation.
    #[error("EWMA seed window must be greater than 1, got {0}")]
    InvalidSeedWindow(usize),

    /// EWMA decay outside (0, 1).
    #[error("EWMA decay must lie in (0, 1), got {0}")]
    InvalidDecay(f64),

    /// A referenced transformation result is not in the context.
    #[error("No transformation result stored under '{0}'")]
    MissingReference(String),

    /// The referenced series lacks a date of the primary data.
    #[error("Transformation result '{id}' has no value for {date}")]
    MissingObservation {
        /// Referenced transformation id
        id: String,
        /// Missing date
        date: Date,
    },

    /// Unknown return type name.
    #[error("Unknown return type: {0}")]
    UnknownReturnType(String),

    /// Series lookup failure.
    #[error("Series error: {0}")]
    Series(#[from] SeriesError),
}
