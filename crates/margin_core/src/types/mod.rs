//! Core date, currency and error types.
//!
//! This module provides:
//! - `time`: `Date`, ACT/365 year fractions, day count and business day conventions
//! - `currency`: Cleared currencies
//! - `error`: Structured error types for dates, currencies and series
//!
//! # Re-exports
//!
//! For convenience, commonly used types are re-exported at this module level.

pub mod currency;
pub mod error;
pub mod time;

pub use currency::Currency;
pub use error::{CurrencyError, DateError, SeriesError};
pub use time::{
    date_from_year_fraction, year_fraction, BusinessDayConvention, Date, DayCountConvention,
    DAYS_PER_YEAR,
};
