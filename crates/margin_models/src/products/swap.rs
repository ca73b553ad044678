//! Fixed-for-floating swaps.

use margin_core::market_data::Curve;
use margin_core::stochastic::RandomVariable;
use margin_core::types::{Currency, Date};

use super::error::ProductError;
use super::leg::SwapLeg;
use super::portfolio::CurveName;
use crate::schedules::Schedule;
use crate::zero_rate::{ZeroRateError, ZeroRateModel};

/// Swap with one received and one paid leg.
///
/// # Example
///
/// ```
/// use margin_core::types::{Currency, Date};
/// use margin_models::products::{CurveName, Swap};
/// use margin_models::schedules::{Frequency, ScheduleBuilder};
///
/// let schedule = ScheduleBuilder::new()
///     .start(Date::from_ymd(2024, 1, 15).unwrap())
///     .end(Date::from_ymd(2029, 1, 15).unwrap())
///     .frequency(Frequency::SemiAnnual)
///     .build()
///     .unwrap();
///
/// let swap = Swap::vanilla(
///     Currency::EUR,
///     CurveName::new("EUR-6M"),
///     10_000_000.0,
///     &schedule,
///     0.025,
///     true,
/// )
/// .unwrap();
///
/// assert!(swap.payer().periods()[0].index().floating_part().is_none());
/// assert_eq!(swap.receiver().periods().len(), 10);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Swap {
    currency: Currency,
    curve_name: CurveName,
    receiver: SwapLeg,
    payer: SwapLeg,
}

impl Swap {
    /// Creates a swap from its legs.
    pub fn new(currency: Currency, curve_name: CurveName, receiver: SwapLeg, payer: SwapLeg) -> Self {
        Self {
            currency,
            curve_name,
            receiver,
            payer,
        }
    }

    /// Fixed against floating on one schedule; `pay_fixed` selects the
    /// direction.
    pub fn vanilla(
        currency: Currency,
        curve_name: CurveName,
        notional: f64,
        schedule: &Schedule,
        fixed_rate: f64,
        pay_fixed: bool,
    ) -> Result<Self, ProductError> {
        if !notional.is_finite() || notional <= 0.0 {
            return Err(ProductError::InvalidNotional { notional });
        }
        let fixed = SwapLeg::fixed(schedule, notional, fixed_rate, pay_fixed);
        let floating = SwapLeg::floating(schedule, notional, 0.0, !pay_fixed);
        let (receiver, payer) = if pay_fixed {
            (floating, fixed)
        } else {
            (fixed, floating)
        };
        Ok(Self::new(currency, curve_name, receiver, payer))
    }

    /// Settlement currency.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Forwarding and discounting curve.
    pub fn curve_name(&self) -> &CurveName {
        &self.curve_name
    }

    /// Received leg.
    pub fn receiver(&self) -> &SwapLeg {
        &self.receiver
    }

    /// Paid leg.
    pub fn payer(&self) -> &SwapLeg {
        &self.payer
    }

    /// Both legs, received first.
    pub fn legs(&self) -> [&SwapLeg; 2] {
        [&self.receiver, &self.payer]
    }

    /// Splits the swap into its legs.
    pub fn into_legs(self) -> [SwapLeg; 2] {
        [self.receiver, self.payer]
    }

    /// Last payment date over both legs.
    pub fn last_payment_date(&self) -> Option<Date> {
        self.receiver
            .last_payment_date()
            .max(self.payer.last_payment_date())
    }

    /// Net value of both legs with forwarding and discounting on `model`.
    pub fn value(
        &self,
        evaluation: Date,
        model: &ZeroRateModel,
        shift: Option<&Curve>,
        path: Option<usize>,
    ) -> Result<RandomVariable, ZeroRateError> {
        let receive = self
            .receiver
            .value(evaluation, model, shift, model, shift, path)?;
        let pay = self.payer.value(evaluation, model, shift, model, shift, path)?;
        Ok(receive + pay)
    }
}
