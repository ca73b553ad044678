//! Coupon schedules and their builder.

use margin_core::types::{BusinessDayConvention, Date, DayCountConvention};

use super::error::ScheduleError;
use super::frequency::Frequency;
use super::period::SchedulePeriod;

/// Ordered list of accrual periods.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    periods: Vec<SchedulePeriod>,
    frequency: Frequency,
}

impl Schedule {
    /// Periods in chronological order.
    pub fn periods(&self) -> &[SchedulePeriod] {
        &self.periods
    }

    /// Coupon frequency the schedule was generated with.
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Number of periods.
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    /// Returns `true` if the schedule has no periods.
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Iterates over the periods.
    pub fn iter(&self) -> impl Iterator<Item = &SchedulePeriod> {
        self.periods.iter()
    }

    /// Payment date of the final period.
    pub fn last_payment_date(&self) -> Option<Date> {
        self.periods.last().map(SchedulePeriod::payment)
    }
}

/// Builder for regular coupon schedules.
///
/// Unadjusted period boundaries are rolled forward from the start date in
/// whole months (a short final stub ends on the end date) and then adjusted
/// with the business day convention.
///
/// # Examples
///
/// ```
/// use margin_core::types::Date;
/// use margin_models::schedules::{Frequency, ScheduleBuilder};
///
/// let schedule = ScheduleBuilder::new()
///     .start(Date::from_ymd(2024, 1, 15).unwrap())
///     .end(Date::from_ymd(2026, 1, 15).unwrap())
///     .frequency(Frequency::SemiAnnual)
///     .build()
///     .unwrap();
///
/// assert_eq!(schedule.len(), 4);
/// // 2024-07-15 is a Monday, 2025-01-15 a Wednesday
/// assert_eq!(schedule.periods()[1].start(), Date::from_ymd(2024, 7, 15).unwrap());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScheduleBuilder {
    start_date: Option<Date>,
    end_date: Option<Date>,
    frequency: Option<Frequency>,
    day_count: DayCountConvention,
    business_day_convention: BusinessDayConvention,
}

impl ScheduleBuilder {
    /// Creates a builder with ACT/365 and modified following.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the start date of the schedule.
    pub fn start(mut self, date: Date) -> Self {
        self.start_date = Some(date);
        self
    }

    /// Sets the end date of the schedule.
    pub fn end(mut self, date: Date) -> Self {
        self.end_date = Some(date);
        self
    }

    /// Sets the coupon frequency.
    pub fn frequency(mut self, freq: Frequency) -> Self {
        self.frequency = Some(freq);
        self
    }

    /// Sets the day count convention.
    pub fn day_count(mut self, dc: DayCountConvention) -> Self {
        self.day_count = dc;
        self
    }

    /// Sets the business day convention.
    pub fn business_day_convention(mut self, bdc: BusinessDayConvention) -> Self {
        self.business_day_convention = bdc;
        self
    }

    /// Builds the schedule.
    ///
    /// # Errors
    ///
    /// Missing start, end or frequency, or start not before end.
    pub fn build(self) -> Result<Schedule, ScheduleError> {
        let start = self
            .start_date
            .ok_or(ScheduleError::MissingField { field: "start" })?;
        let end = self
            .end_date
            .ok_or(ScheduleError::MissingField { field: "end" })?;
        let frequency = self
            .frequency
            .ok_or(ScheduleError::MissingField { field: "frequency" })?;

        if start >= end {
            return Err(ScheduleError::InvalidDateRange { start, end });
        }

        let mut boundaries = vec![start];
        let mut k = 1;
        loop {
            let next = start.add_months((k * frequency.months()) as i32)?;
            if next >= end {
                boundaries.push(end);
                break;
            }
            boundaries.push(next);
            k += 1;
        }

        let bdc = self.business_day_convention;
        let mut periods = Vec::with_capacity(boundaries.len() - 1);
        for pair in boundaries.windows(2) {
            let period_start = bdc.adjust(pair[0])?;
            let period_end = bdc.adjust(pair[1])?;
            if period_end <= period_start {
                continue;
            }
            periods.push(SchedulePeriod::new(
                period_start,
                period_end,
                period_end,
                self.day_count,
            ));
        }

        Ok(Schedule { periods, frequency })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_missing_fields() {
        match ScheduleBuilder::new().start(date(2024, 1, 1)).build() {
            Err(ScheduleError::MissingField { field }) => assert_eq!(field, "end"),
            _ => panic!("Expected MissingField error"),
        }
    }

    #[test]
    fn test_invalid_range() {
        let result = ScheduleBuilder::new()
            .start(date(2025, 1, 1))
            .end(date(2024, 1, 1))
            .frequency(Frequency::Annual)
            .build();
        assert!(matches!(result, Err(ScheduleError::InvalidDateRange { .. })));
    }

    #[test]
    fn test_periods_are_contiguous_and_adjusted() {
        let schedule = ScheduleBuilder::new()
            .start(date(2024, 3, 1))
            .end(date(2029, 3, 1))
            .frequency(Frequency::Quarterly)
            .build()
            .unwrap();

        assert_eq!(schedule.len(), 20);
        for pair in schedule.periods().windows(2) {
            assert_eq!(pair[0].end(), pair[1].start());
        }
        assert!(schedule.iter().all(|p| p.payment().is_business_day()));
        // 2029-03-01 is a Thursday
        assert_eq!(schedule.last_payment_date(), Some(date(2029, 3, 1)));
    }

    #[test]
    fn test_short_final_stub() {
        let schedule = ScheduleBuilder::new()
            .start(date(2024, 1, 10))
            .end(date(2025, 3, 10))
            .frequency(Frequency::Annual)
            .build()
            .unwrap();
        assert_eq!(schedule.len(), 2);
        assert_eq!(schedule.periods()[1].start(), date(2025, 1, 10));
        assert_eq!(schedule.periods()[1].end(), date(2025, 3, 10));
    }

    proptest! {
        #[test]
        fn prop_periods_cover_start_to_end(
            year in 2020i32..2030,
            month in 1u32..=12,
            day in 1u32..=28,
            years in 1i32..10,
            freq in 0usize..4,
        ) {
            let frequency = [
                Frequency::Annual,
                Frequency::SemiAnnual,
                Frequency::Quarterly,
                Frequency::Monthly,
            ][freq];
            let start = date(year, month, day);
            let end = start.add_months(12 * years).unwrap();
            let schedule = ScheduleBuilder::new()
                .start(start)
                .end(end)
                .frequency(frequency)
                .build()
                .unwrap();

            let bdc = BusinessDayConvention::default();
            prop_assert!(!schedule.is_empty());
            prop_assert_eq!(schedule.periods()[0].start(), bdc.adjust(start).unwrap());
            prop_assert_eq!(schedule.last_payment_date(), Some(bdc.adjust(end).unwrap()));
            for pair in schedule.periods().windows(2) {
                prop_assert_eq!(pair[0].end(), pair[1].start());
            }
            prop_assert!(schedule.iter().all(|p| p.payment().is_business_day()));
        }
    }
}
