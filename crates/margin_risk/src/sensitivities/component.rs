//! Per-cash-flow sensitivity snapshots and their per-date cache.

use std::sync::Arc;

use margin_core::stochastic::RandomVariable;
use margin_core::types::{year_fraction, Date};
use margin_models::products::{CouponPeriod, SwapLeg};
use margin_models::zero_rate::{ZeroRateError, ZeroRateModel};
use parking_lot::Mutex;

use super::discount_factor::DiscountFactor;

/// Zero-rate bump size (one basis point).
pub const SHIFT: f64 = 1e-4;

/// Discount factors spanning the index period of an unfixed coupon.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardPeriod {
    start: DiscountFactor,
    end: DiscountFactor,
    scaling: f64,
}

impl ForwardPeriod {
    /// Discount factor at the index period start.
    pub fn start(&self) -> &DiscountFactor {
        &self.start
    }

    /// Discount factor at the index period end.
    pub fn end(&self) -> &DiscountFactor {
        &self.end
    }

    /// Weight of the forward rate in the coupon index.
    pub fn scaling(&self) -> f64 {
        self.scaling
    }

    fn length(&self) -> f64 {
        self.end.tau() - self.start.tau()
    }
}

/// Snapshot of one coupon cash flow as seen from an evaluation date.
#[derive(Debug, Clone, PartialEq)]
pub struct SensitivityComponent {
    payment: DiscountFactor,
    forward: Option<ForwardPeriod>,
    rate: RandomVariable,
    day_count_fraction: f64,
    notional: f64,
    payer: bool,
}

impl SensitivityComponent {
    /// Snapshot of `period` on `evaluation`, on every path of `model`.
    ///
    /// The index period discount factors are only kept while the floating
    /// index is still to be fixed.
    pub fn from_period(
        period: &CouponPeriod,
        evaluation: Date,
        model: &ZeroRateModel,
    ) -> Result<Self, ZeroRateError> {
        let rate = period
            .index()
            .value(evaluation, period.fixing(), model, None, None)?;
        let tau_payment = year_fraction(evaluation, period.payment());
        let payment = DiscountFactor::new(
            model.discount_factor(evaluation, tau_payment, None, None)?,
            tau_payment,
        );

        let forward = match period.index().floating_part() {
            Some((scaling, offset, length)) if period.fixing() > evaluation => {
                let tau_start = year_fraction(evaluation, period.fixing()) + offset;
                let tau_end = tau_start + length;
                Some(ForwardPeriod {
                    start: DiscountFactor::new(
                        model.discount_factor(evaluation, tau_start, None, None)?,
                        tau_start,
                    ),
                    end: DiscountFactor::new(
                        model.discount_factor(evaluation, tau_end, None, None)?,
                        tau_end,
                    ),
                    scaling,
                })
            }
            _ => None,
        };

        Ok(Self {
            payment,
            forward,
            rate,
            day_count_fraction: period.day_count_fraction(),
            notional: period.notional(),
            payer: period.is_payer(),
        })
    }

    /// Payment discount factor.
    pub fn payment(&self) -> &DiscountFactor {
        &self.payment
    }

    /// Index period discount factors of an unfixed floating coupon.
    pub fn forward(&self) -> Option<&ForwardPeriod> {
        self.forward.as_ref()
    }

    /// Coupon rate.
    pub fn rate(&self) -> &RandomVariable {
        &self.rate
    }

    /// `notional · dcf`, negated for payer cash flows.
    pub fn coefficient(&self) -> f64 {
        let coefficient = self.notional * self.day_count_fraction;
        if self.payer {
            -coefficient
        } else {
            coefficient
        }
    }

    /// Sensitivity to the payment discount factor, at `τ_payment`.
    pub fn discount_sensitivity(&self, order: i32) -> RandomVariable {
        &self.rate * self.payment.derivative(order) * (self.coefficient() * SHIFT.powi(order))
    }

    /// Sensitivity to the index period start rate, at `τ_start`.
    pub fn forward_start_sensitivity(&self, order: i32) -> Option<RandomVariable> {
        self.forward.as_ref().map(|f| {
            self.payment.value() * f.start.derivative(order) / f.end.value()
                * (self.forward_coefficient(f) * SHIFT.powi(order))
        })
    }

    /// Sensitivity to the index period end rate, at `τ_end`.
    pub fn forward_end_sensitivity(&self, order: i32) -> Option<RandomVariable> {
        self.forward.as_ref().map(|f| {
            self.payment.value() * f.start.value() * f.end.inverse_derivative(order)
                * (self.forward_coefficient(f) * SHIFT.powi(order))
        })
    }

    /// Second-order cross term at `(τ_start, τ_end)`, stored at double weight.
    pub fn forward_cross_gamma(&self) -> Option<RandomVariable> {
        self.forward.as_ref().map(|f| {
            self.payment.value() * f.start.derivative(1) * f.end.inverse_derivative(1)
                * (2.0 * self.forward_coefficient(f) * SHIFT * SHIFT)
        })
    }

    fn forward_coefficient(&self, forward: &ForwardPeriod) -> f64 {
        self.coefficient() * forward.scaling / forward.length()
    }
}

/// A swap leg with its sensitivity components cached for one evaluation date.
///
/// Asking for another date drops the cached components wholesale before
/// the new ones are built; a failed build leaves the cache empty.
#[derive(Debug)]
pub struct SensitivityComponents {
    leg: SwapLeg,
    cache: Mutex<Option<(Date, Arc<Vec<SensitivityComponent>>)>>,
}

impl SensitivityComponents {
    /// Wraps `leg` with an empty cache.
    pub fn new(leg: SwapLeg) -> Self {
        Self {
            leg,
            cache: Mutex::new(None),
        }
    }

    /// Underlying leg.
    pub fn leg(&self) -> &SwapLeg {
        &self.leg
    }

    /// Evaluation date of the cached components.
    pub fn cached_date(&self) -> Option<Date> {
        self.cache.lock().as_ref().map(|(date, _)| *date)
    }

    /// Components of the coupons paid after `evaluation`.
    pub fn components(
        &self,
        evaluation: Date,
        model: &ZeroRateModel,
    ) -> Result<Arc<Vec<SensitivityComponent>>, ZeroRateError> {
        let mut cache = self.cache.lock();
        if let Some((date, components)) = cache.as_ref() {
            if *date == evaluation {
                return Ok(Arc::clone(components));
            }
        }
        *cache = None;

        let components = Arc::new(
            self.leg
                .periods()
                .iter()
                .filter(|p| p.payment() > evaluation)
                .map(|p| SensitivityComponent::from_period(p, evaluation, model))
                .collect::<Result<Vec<_>, _>>()?,
        );
        *cache = Some((evaluation, Arc::clone(&components)));
        Ok(components)
    }
}
