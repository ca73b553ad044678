//! Error types for structured error handling.
//!
//! This module provides:
//! - `DateError`: Errors from date construction and parsing
//! - `CurrencyError`: Errors from currency parsing
//! - `SeriesError`: Errors from combining date-keyed random variable series

use thiserror::Error;

use super::time::Date;

/// Date-related errors.
///
/// # Examples
/// ```
/// use margin_core::types::DateError;
///
/// let err = DateError::InvalidDate { year: 2024, month: 2, day: 30 };
/// assert_eq!(format!("{}", err), "Invalid date: 2024-2-30");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    /// Invalid date components (e.g., February 30th).
    #[error("Invalid date: {year}-{month}-{day}")]
    InvalidDate {
        /// Year component
        year: i32,
        /// Month component (1-12)
        month: u32,
        /// Day component (1-31)
        day: u32,
    },

    /// Failed to parse date string.
    #[error("Date parse error: {0}")]
    ParseError(String),

    /// Date arithmetic left the representable range.
    #[error("Date out of range: {0}")]
    OutOfRange(String),
}

/// Currency-related errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurrencyError {
    /// Unknown ISO 4217 currency code.
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),
}

/// Errors raised when combining or querying date-keyed series.
///
/// # Examples
/// ```
/// use margin_core::types::SeriesError;
///
/// let err = SeriesError::MismatchedDates { left: 10, right: 9 };
/// assert!(format!("{}", err).contains("different dates"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeriesError {
    /// Two series with different key sets were summed.
    #[error("Can't add rate series with different dates ({left} vs {right} entries)")]
    MismatchedDates {
        /// Number of dates in the accumulating series
        left: usize,
        /// Number of dates in the added series
        right: usize,
    },

    /// A series had no observations where at least one was required.
    #[error("Series is empty")]
    EmptySeries,

    /// No observation exists for the requested date.
    #[error("No observation for {0}")]
    MissingDate(Date),
}
