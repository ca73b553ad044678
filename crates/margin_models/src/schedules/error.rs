//! Error types for schedule generation.

use margin_core::types::{Date, DateError};
use thiserror::Error;

/// Errors raised while building a coupon schedule.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// Start date is not before end date.
    #[error("Start date {start} must be before end date {end}")]
    InvalidDateRange {
        /// Schedule start date
        start: Date,
        /// Schedule end date
        end: Date,
    },

    /// Required builder field missing.
    #[error("Missing required field: {field}")]
    MissingField {
        /// Name of the missing field
        field: &'static str,
    },

    /// Unknown frequency name.
    #[error("Unknown frequency: {0}")]
    UnknownFrequency(String),

    /// Date arithmetic failed.
    #[error("Date arithmetic failed: {0}")]
    Date(#[from] DateError),
}
