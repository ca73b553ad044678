//! Swap legs.

use margin_core::market_data::Curve;
use margin_core::stochastic::RandomVariable;
use margin_core::types::{year_fraction, Date};

use super::index::Index;
use super::period::CouponPeriod;
use crate::schedules::Schedule;
use crate::zero_rate::{ZeroRateError, ZeroRateModel};

/// Sequence of coupon periods paid or received together.
///
/// # Examples
///
/// ```
/// use margin_core::types::Date;
/// use margin_models::products::SwapLeg;
/// use margin_models::schedules::{Frequency, ScheduleBuilder};
///
/// let schedule = ScheduleBuilder::new()
///     .start(Date::from_ymd(2024, 1, 15).unwrap())
///     .end(Date::from_ymd(2026, 1, 15).unwrap())
///     .frequency(Frequency::Annual)
///     .build()
///     .unwrap();
///
/// let leg = SwapLeg::fixed(&schedule, 1_000_000.0, 0.03, true);
/// assert_eq!(leg.periods().len(), 2);
/// assert_eq!(leg.last_payment_date(), Some(Date::from_ymd(2026, 1, 15).unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SwapLeg {
    periods: Vec<CouponPeriod>,
    payer: bool,
}

impl SwapLeg {
    /// Creates a leg from its periods.
    pub fn new(periods: Vec<CouponPeriod>, payer: bool) -> Self {
        Self { periods, payer }
    }

    /// Leg paying `index` on every period of `schedule`.
    pub fn from_schedule(schedule: &Schedule, notional: f64, index: Index, payer: bool) -> Self {
        let periods = schedule
            .iter()
            .map(|p| CouponPeriod::from_schedule(p, notional, index.clone(), payer))
            .collect();
        Self::new(periods, payer)
    }

    /// Fixed-rate leg.
    pub fn fixed(schedule: &Schedule, notional: f64, rate: f64, payer: bool) -> Self {
        Self::from_schedule(schedule, notional, Index::fixed(rate), payer)
    }

    /// Floating leg on the schedule's tenor index plus `spread`.
    pub fn floating(schedule: &Schedule, notional: f64, spread: f64, payer: bool) -> Self {
        let index = Index::floating(0.0, schedule.frequency().period_length()).with_spread(spread);
        Self::from_schedule(schedule, notional, index, payer)
    }

    /// Coupon periods.
    pub fn periods(&self) -> &[CouponPeriod] {
        &self.periods
    }

    /// `true` for a paid leg.
    pub fn is_payer(&self) -> bool {
        self.payer
    }

    /// Last payment date.
    pub fn last_payment_date(&self) -> Option<Date> {
        self.periods.iter().map(CouponPeriod::payment).max()
    }

    /// Last payment as a year fraction from `reference`.
    pub fn last_payment_time(&self, reference: Date) -> Option<f64> {
        self.last_payment_date().map(|d| year_fraction(reference, d))
    }

    /// Sum of the period values seen from `evaluation`.
    pub fn value(
        &self,
        evaluation: Date,
        forward_model: &ZeroRateModel,
        forward_shift: Option<&Curve>,
        discount_model: &ZeroRateModel,
        discount_shift: Option<&Curve>,
        path: Option<usize>,
    ) -> Result<RandomVariable, ZeroRateError> {
        let mut total = RandomVariable::scalar(0.0);
        for period in &self.periods {
            total = total
                + period.value(
                    evaluation,
                    forward_model,
                    forward_shift,
                    discount_model,
                    discount_shift,
                    path,
                )?;
        }
        Ok(total)
    }
}
