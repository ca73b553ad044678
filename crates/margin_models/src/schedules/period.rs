//! Schedule period.

use margin_core::types::{Date, DayCountConvention};

/// One accrual period of a schedule.
///
/// The fixing date of the period's index coincides with the adjusted
/// accrual start; the payment falls on the adjusted accrual end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchedulePeriod {
    fixing: Date,
    start: Date,
    end: Date,
    payment: Date,
    day_count_fraction: f64,
}

impl SchedulePeriod {
    /// Creates a period and computes its day count fraction.
    pub fn new(start: Date, end: Date, payment: Date, day_count: DayCountConvention) -> Self {
        Self {
            fixing: start,
            start,
            end,
            payment,
            day_count_fraction: day_count.year_fraction(start, end),
        }
    }

    /// Index fixing date.
    pub fn fixing(&self) -> Date {
        self.fixing
    }

    /// Accrual start date.
    pub fn start(&self) -> Date {
        self.start
    }

    /// Accrual end date.
    pub fn end(&self) -> Date {
        self.end
    }

    /// Payment date.
    pub fn payment(&self) -> Date {
        self.payment
    }

    /// Accrual year fraction under the schedule's day count.
    pub fn day_count_fraction(&self) -> f64 {
        self.day_count_fraction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_count_fraction() {
        let start = Date::from_ymd(2024, 1, 2).unwrap();
        let end = Date::from_ymd(2024, 7, 2).unwrap();
        let p = SchedulePeriod::new(start, end, end, DayCountConvention::ActualActual360);
        assert!((p.day_count_fraction() - 182.0 / 360.0).abs() < 1e-15);
        assert_eq!(p.fixing(), start);
    }
}
