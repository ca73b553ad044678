//! Portfolios of swap legs.

use std::collections::BTreeMap;
use std::fmt;

use margin_core::market_data::Curve;
use margin_core::stochastic::RandomVariable;
use margin_core::types::{Currency, Date};

use super::error::ProductError;
use super::leg::SwapLeg;
use super::swap::Swap;
use crate::zero_rate::{ZeroRateError, ZeroRateModel};

/// Name of a forwarding and discounting curve.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CurveName(String);

impl CurveName {
    /// Wraps a curve name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Curve name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurveName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Legs of swaps sharing one currency and curve.
#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    currency: Currency,
    curve_name: CurveName,
    legs: Vec<SwapLeg>,
}

impl Portfolio {
    /// Creates an empty portfolio.
    pub fn new(currency: Currency, curve_name: CurveName) -> Self {
        Self {
            currency,
            curve_name,
            legs: Vec::new(),
        }
    }

    /// Adds both legs of `swap`.
    ///
    /// # Errors
    ///
    /// [`ProductError::PortfolioMismatch`] if the swap's currency or curve differs.
    pub fn add_swap(&mut self, swap: Swap) -> Result<(), ProductError> {
        if swap.currency() != self.currency || swap.curve_name() != &self.curve_name {
            return Err(ProductError::PortfolioMismatch {
                expected_currency: self.currency,
                expected_curve: self.curve_name.clone(),
                currency: swap.currency(),
                curve: swap.curve_name().clone(),
            });
        }
        self.legs.extend(swap.into_legs());
        Ok(())
    }

    /// Adds a single leg.
    pub fn add_leg(&mut self, leg: SwapLeg) {
        self.legs.push(leg);
    }

    /// Portfolio currency.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Portfolio curve.
    pub fn curve_name(&self) -> &CurveName {
        &self.curve_name
    }

    /// All legs.
    pub fn legs(&self) -> &[SwapLeg] {
        &self.legs
    }

    /// Number of legs.
    pub fn len(&self) -> usize {
        self.legs.len()
    }

    /// Returns `true` without legs.
    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    /// Last payment date over all legs.
    pub fn last_payment_date(&self) -> Option<Date> {
        self.legs.iter().filter_map(SwapLeg::last_payment_date).max()
    }

    /// Sum of the leg values, forwarding and discounting on `model`.
    pub fn value(
        &self,
        evaluation: Date,
        model: &ZeroRateModel,
        shift: Option<&Curve>,
        path: Option<usize>,
    ) -> Result<RandomVariable, ZeroRateError> {
        let mut total = RandomVariable::scalar(0.0);
        for leg in &self.legs {
            total = total + leg.value(evaluation, model, shift, model, shift, path)?;
        }
        Ok(total)
    }
}

/// Portfolios grouped by currency.
///
/// # Examples
///
/// ```
/// use margin_core::types::{Currency, Date};
/// use margin_models::products::{CurveName, GlobalPortfolio, Swap};
/// use margin_models::schedules::{Frequency, ScheduleBuilder};
///
/// let schedule = ScheduleBuilder::new()
///     .start(Date::from_ymd(2024, 1, 15).unwrap())
///     .end(Date::from_ymd(2027, 1, 15).unwrap())
///     .frequency(Frequency::Annual)
///     .build()
///     .unwrap();
/// let eur = Swap::vanilla(Currency::EUR, CurveName::new("EUR"), 1e6, &schedule, 0.02, true).unwrap();
/// let usd = Swap::vanilla(Currency::USD, CurveName::new("USD"), 1e6, &schedule, 0.04, false).unwrap();
///
/// let mut global = GlobalPortfolio::new();
/// global.add_swap(eur).unwrap();
/// global.add_swap(usd).unwrap();
/// assert_eq!(global.currencies().count(), 2);
/// assert_eq!(global.portfolio(Currency::EUR).unwrap().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GlobalPortfolio {
    portfolios: BTreeMap<Currency, Portfolio>,
}

impl GlobalPortfolio {
    /// Creates an empty global portfolio.
    pub fn new() -> Self {
        Self::default()
    }

    /// Files `swap` under its currency, opening a portfolio on first use.
    pub fn add_swap(&mut self, swap: Swap) -> Result<(), ProductError> {
        let currency = swap.currency();
        let curve_name = swap.curve_name().clone();
        self.portfolios
            .entry(currency)
            .or_insert_with(|| Portfolio::new(currency, curve_name))
            .add_swap(swap)
    }

    /// Portfolio of `currency`.
    pub fn portfolio(&self, currency: Currency) -> Option<&Portfolio> {
        self.portfolios.get(&currency)
    }

    /// Currencies with a portfolio.
    pub fn currencies(&self) -> impl Iterator<Item = Currency> + '_ {
        self.portfolios.keys().copied()
    }

    /// All portfolios in currency order.
    pub fn portfolios(&self) -> impl Iterator<Item = &Portfolio> {
        self.portfolios.values()
    }
}
