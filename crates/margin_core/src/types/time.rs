//! Dates, day counts and business-day handling.
//!
//! This module provides:
//! - `Date`: Type-safe date wrapper around chrono::NaiveDate with weekend-aware stepping
//! - `year_fraction`: The ACT/365 floating-point time used for every model time
//! - `DayCountConvention`: Accrual conventions for coupon periods
//! - `BusinessDayConvention`: Adjustment of schedule dates falling on weekends
//!
//! # Examples
//!
//! ```
//! use margin_core::types::time::{year_fraction, Date};
//!
//! let reference = Date::from_ymd(2024, 1, 1).unwrap();
//! let later = Date::from_ymd(2024, 1, 31).unwrap();
//! assert!((year_fraction(reference, later) - 30.0 / 365.0).abs() < 1e-15);
//! ```

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

use super::error::DateError;

/// Days per year of the floating-point date convention.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Type-safe date wrapper around chrono::NaiveDate.
///
/// # Examples
///
/// ```
/// use margin_core::types::time::Date;
///
/// let date = Date::from_ymd(2024, 6, 14).unwrap();
/// let parsed: Date = "2024-06-14".parse().unwrap();
/// assert_eq!(date, parsed);
///
/// // Friday rolls over the weekend
/// let next = date.next_business_day().unwrap();
/// assert_eq!(next, Date::from_ymd(2024, 6, 17).unwrap());
/// assert_eq!(next - date, 3);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a Date from year, month, and day components.
    ///
    /// Returns `Err(DateError::InvalidDate)` for impossible dates such as
    /// February 30th.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or(DateError::InvalidDate { year, month, day })
    }

    /// Const constructor for dates fixed by methodology.
    ///
    /// # Panics
    ///
    /// Panics for impossible dates; in a `const` item this is a compile
    /// error.
    pub const fn from_ymd_const(year: i32, month: u32, day: u32) -> Self {
        match NaiveDate::from_ymd_opt(year, month, day) {
            Some(date) => Date(date),
            None => panic!("invalid calendar date"),
        }
    }

    /// Parses a date from ISO 8601 format string (YYYY-MM-DD).
    pub fn parse(s: &str) -> Result<Self, DateError> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Date)
            .map_err(|e| DateError::ParseError(format!("{}: {}", s, e)))
    }

    /// Returns the underlying NaiveDate.
    pub fn into_inner(self) -> NaiveDate {
        self.0
    }

    /// Returns the year component.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1-12).
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the day component (1-31).
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Returns the day of the week.
    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// Shifts the date by a signed number of calendar days.
    pub fn add_days(self, days: i64) -> Result<Self, DateError> {
        let shifted = if days >= 0 {
            self.0.checked_add_days(Days::new(days.unsigned_abs()))
        } else {
            self.0.checked_sub_days(Days::new(days.unsigned_abs()))
        };
        shifted
            .map(Date)
            .ok_or_else(|| DateError::OutOfRange(format!("{} {:+} days", self, days)))
    }

    /// Shifts the date by a signed number of months, clamping to month end.
    pub fn add_months(self, months: i32) -> Result<Self, DateError> {
        let shifted = if months >= 0 {
            self.0.checked_add_months(Months::new(months.unsigned_abs()))
        } else {
            self.0.checked_sub_months(Months::new(months.unsigned_abs()))
        };
        shifted
            .map(Date)
            .ok_or_else(|| DateError::OutOfRange(format!("{} {:+} months", self, months)))
    }

    /// Returns `true` from Monday to Friday.
    ///
    /// Holidays are not modelled; historical data sources are expected to
    /// carry exactly the days on which curves were published.
    pub fn is_business_day(&self) -> bool {
        !matches!(self.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// Returns the first business day strictly after this date.
    pub fn next_business_day(self) -> Result<Self, DateError> {
        let mut date = self.add_days(1)?;
        while !date.is_business_day() {
            date = date.add_days(1)?;
        }
        Ok(date)
    }

    /// Returns the last business day strictly before this date.
    pub fn previous_business_day(self) -> Result<Self, DateError> {
        let mut date = self.add_days(-1)?;
        while !date.is_business_day() {
            date = date.add_days(-1)?;
        }
        Ok(date)
    }

    /// Returns all business days in `[start, end]`.
    pub fn business_days(start: Date, end: Date) -> Result<Vec<Date>, DateError> {
        let mut days = Vec::new();
        let mut date = start;
        while date <= end {
            if date.is_business_day() {
                days.push(date);
            }
            date = date.add_days(1)?;
        }
        Ok(days)
    }
}

impl Sub for Date {
    type Output = i64;

    /// Returns the number of days between two dates.
    fn sub(self, other: Self) -> i64 {
        (self.0 - other.0).num_days()
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Date(date)
    }
}

impl FromStr for Date {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, DateError> {
        Date::parse(s)
    }
}

impl fmt::Display for Date {
    /// Formats the date as ISO 8601 (YYYY-MM-DD).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Floating-point time between two dates: calendar days / 365.
///
/// Negative when `end` precedes `start`.
#[inline]
pub fn year_fraction(start: Date, end: Date) -> f64 {
    (end - start) as f64 / DAYS_PER_YEAR
}

/// Inverse of [`year_fraction`], rounded to the nearest calendar day.
pub fn date_from_year_fraction(reference: Date, time: f64) -> Result<Date, DateError> {
    reference.add_days((time * DAYS_PER_YEAR).round() as i64)
}

/// Day Count Convention used for coupon accrual.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DayCountConvention {
    /// Actual/365 Fixed.
    #[default]
    ActualActual365,

    /// Actual/360.
    ActualActual360,

    /// 30/360 US Bond Basis.
    Thirty360,
}

impl DayCountConvention {
    /// Returns the standard convention name.
    pub fn name(&self) -> &'static str {
        match self {
            DayCountConvention::ActualActual365 => "ACT/365",
            DayCountConvention::ActualActual360 => "ACT/360",
            DayCountConvention::Thirty360 => "30/360",
        }
    }

    /// Year fraction between two dates, negative if `start > end`.
    ///
    /// # Examples
    ///
    /// ```
    /// use margin_core::types::time::{Date, DayCountConvention};
    ///
    /// let start = Date::from_ymd(2024, 1, 1).unwrap();
    /// let end = Date::from_ymd(2024, 7, 1).unwrap();
    /// let yf = DayCountConvention::ActualActual360.year_fraction(start, end);
    /// assert!((yf - 182.0 / 360.0).abs() < 1e-12);
    /// ```
    pub fn year_fraction(&self, start: Date, end: Date) -> f64 {
        match self {
            DayCountConvention::ActualActual365 => (end - start) as f64 / 365.0,
            DayCountConvention::ActualActual360 => (end - start) as f64 / 360.0,
            DayCountConvention::Thirty360 => {
                let (first, second, sign) = if start <= end {
                    (start, end, 1.0)
                } else {
                    (end, start, -1.0)
                };
                let d1 = if first.day() == 31 { 30 } else { first.day() };
                let d2 = if second.day() == 31 && d1 == 30 {
                    30
                } else {
                    second.day()
                };
                let days = 360 * (second.year() - first.year())
                    + 30 * (second.month() as i32 - first.month() as i32)
                    + (d2 as i32 - d1 as i32);
                sign * days as f64 / 360.0
            }
        }
    }
}

impl FromStr for DayCountConvention {
    type Err = String;

    /// Parses day count convention from string (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace(['/', ' '], "").as_str() {
            "ACT365" | "ACTUAL365" | "A365" => Ok(DayCountConvention::ActualActual365),
            "ACT360" | "ACTUAL360" | "A360" => Ok(DayCountConvention::ActualActual360),
            "30360" | "THIRTY360" => Ok(DayCountConvention::Thirty360),
            _ => Err(format!("Unknown day count convention: {}", s)),
        }
    }
}

impl fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Business Day Convention for date adjustments.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BusinessDayConvention {
    /// Move to the next business day.
    Following,

    /// Move to the next business day, unless it crosses a month boundary.
    #[default]
    ModifiedFollowing,

    /// Move to the previous business day.
    Preceding,

    /// Do not adjust the date.
    Unadjusted,
}

impl BusinessDayConvention {
    /// Adjusts `date` onto a business day.
    ///
    /// # Examples
    ///
    /// ```
    /// use margin_core::types::time::{BusinessDayConvention, Date};
    ///
    /// // Saturday 2024-08-31: following would leave August
    /// let saturday = Date::from_ymd(2024, 8, 31).unwrap();
    /// let adjusted = BusinessDayConvention::ModifiedFollowing.adjust(saturday).unwrap();
    /// assert_eq!(adjusted, Date::from_ymd(2024, 8, 30).unwrap());
    /// ```
    pub fn adjust(&self, date: Date) -> Result<Date, DateError> {
        if date.is_business_day() {
            return Ok(date);
        }
        match self {
            BusinessDayConvention::Following => date.next_business_day(),
            BusinessDayConvention::ModifiedFollowing => {
                let following = date.next_business_day()?;
                if following.month() == date.month() {
                    Ok(following)
                } else {
                    date.previous_business_day()
                }
            }
            BusinessDayConvention::Preceding => date.previous_business_day(),
            BusinessDayConvention::Unadjusted => Ok(date),
        }
    }
}

impl FromStr for BusinessDayConvention {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace([' ', '_', '-'], "").as_str() {
            "following" | "f" => Ok(BusinessDayConvention::Following),
            "modifiedfollowing" | "mf" => Ok(BusinessDayConvention::ModifiedFollowing),
            "preceding" | "p" => Ok(BusinessDayConvention::Preceding),
            "unadjusted" | "u" | "none" => Ok(BusinessDayConvention::Unadjusted),
            _ => Err(format!("Unknown business day convention: {}", s)),
        }
    }
}
