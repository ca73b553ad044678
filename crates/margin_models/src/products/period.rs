//! Coupon periods.

use margin_core::market_data::Curve;
use margin_core::stochastic::RandomVariable;
use margin_core::types::{year_fraction, Date};

use super::index::Index;
use crate::schedules::SchedulePeriod;
use crate::zero_rate::{ZeroRateError, ZeroRateModel};

/// One coupon cash flow of a swap leg.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponPeriod {
    fixing: Date,
    payment: Date,
    day_count_fraction: f64,
    notional: f64,
    index: Index,
    payer: bool,
}

impl CouponPeriod {
    /// Creates a coupon period.
    pub fn new(
        fixing: Date,
        payment: Date,
        day_count_fraction: f64,
        notional: f64,
        index: Index,
        payer: bool,
    ) -> Self {
        Self {
            fixing,
            payment,
            day_count_fraction,
            notional,
            index,
            payer,
        }
    }

    /// Coupon period for a schedule period.
    pub fn from_schedule(period: &SchedulePeriod, notional: f64, index: Index, payer: bool) -> Self {
        Self::new(
            period.fixing(),
            period.payment(),
            period.day_count_fraction(),
            notional,
            index,
            payer,
        )
    }

    /// Index fixing date.
    pub fn fixing(&self) -> Date {
        self.fixing
    }

    /// Payment date.
    pub fn payment(&self) -> Date {
        self.payment
    }

    /// Accrual fraction.
    pub fn day_count_fraction(&self) -> f64 {
        self.day_count_fraction
    }

    /// Notional.
    pub fn notional(&self) -> f64 {
        self.notional
    }

    /// Coupon index.
    pub fn index(&self) -> &Index {
        &self.index
    }

    /// `true` if the period is paid.
    pub fn is_payer(&self) -> bool {
        self.payer
    }

    /// Discounted coupon seen from `evaluation`.
    ///
    /// Zero once the payment date is reached; negative for paid periods.
    pub fn value(
        &self,
        evaluation: Date,
        forward_model: &ZeroRateModel,
        forward_shift: Option<&Curve>,
        discount_model: &ZeroRateModel,
        discount_shift: Option<&Curve>,
        path: Option<usize>,
    ) -> Result<RandomVariable, ZeroRateError> {
        if self.payment <= evaluation {
            return Ok(RandomVariable::scalar(0.0));
        }
        let rate = self
            .index
            .value(evaluation, self.fixing, forward_model, forward_shift, path)?;
        let tau = year_fraction(evaluation, self.payment);
        let df = discount_model.discount_factor(evaluation, tau, discount_shift, path)?;
        let value = rate * (self.notional * self.day_count_fraction) * df;
        Ok(if self.payer { -value } else { value })
    }
}
