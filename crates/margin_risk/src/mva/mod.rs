//! Margin valuation adjustment.
//!
//! MVA is the cost of funding the initial margin posted over the life of a
//! portfolio. With `D(t) = e^{-s t} / N(t)` the spread-adjusted deflator
//! and `IM(t_i)` the margin on business day `t_i`,
//!
//! ```text
//! MVA = -E[ Σ_i (D(t_{i+1}) - D(t_i)) · IM(t_i) ]
//! ```
//!
//! The grid runs over business days from the model reference date up to
//! the last payment date; the final step ends on the last payment.

mod error;

pub use error::MvaError;

use margin_core::stochastic::RandomVariable;
use margin_core::types::Date;
use tracing::{debug, info};

use crate::aggregation::{MarginKind, PairsInitialMargin};
use crate::parallel::try_parallel_map;

/// MVA together with the margin profile it was computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct MarginValuation {
    /// Adjustment, averaged over paths
    pub mva: f64,
    /// Margin on each grid date
    pub profile: Vec<(Date, RandomVariable)>,
}

/// MVA calculator for one margin figure and funding spread.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarginValuationAdjustment {
    funding_spread: f64,
    margin_kind: MarginKind,
}

impl MarginValuationAdjustment {
    /// Creates a calculator funding `margin_kind` at `funding_spread`.
    pub fn new(funding_spread: f64, margin_kind: MarginKind) -> Result<Self, MvaError> {
        if !funding_spread.is_finite() {
            return Err(MvaError::InvalidFundingSpread(funding_spread));
        }
        Ok(Self {
            funding_spread,
            margin_kind,
        })
    }

    /// Funding spread over the numeraire rate.
    pub fn funding_spread(&self) -> f64 {
        self.funding_spread
    }

    /// Margin figure being funded.
    pub fn margin_kind(&self) -> MarginKind {
        self.margin_kind
    }

    /// Business days on which margin is posted.
    pub fn time_grid(engine: &PairsInitialMargin<'_>) -> Result<Vec<Date>, MvaError> {
        let start = engine.model().reference_date();
        match engine.portfolio().last_payment_date() {
            Some(last) if start < last => Ok(Date::business_days(start, last)?
                .into_iter()
                .filter(|d| *d < last)
                .collect()),
            _ => Ok(Vec::new()),
        }
    }

    /// MVA of the engine's portfolio.
    pub fn value(&self, engine: &PairsInitialMargin<'_>) -> Result<f64, MvaError> {
        Ok(self.valuation(engine)?.mva)
    }

    /// MVA and the margin profile behind it.
    pub fn valuation(&self, engine: &PairsInitialMargin<'_>) -> Result<MarginValuation, MvaError> {
        let dates = Self::time_grid(engine)?;
        let last = match engine.portfolio().last_payment_date() {
            Some(last) if !dates.is_empty() => last,
            _ => {
                return Ok(MarginValuation {
                    mva: 0.0,
                    profile: Vec::new(),
                })
            }
        };
        debug!(steps = dates.len(), kind = %self.margin_kind, "computing margin profile");

        let config = engine.config().parallel.clone();
        let kind = self.margin_kind;
        let margins = try_parallel_map(&dates, &config, |&date| {
            engine.initial_margin(date, kind)
        })?;

        let mut discounts = dates
            .iter()
            .map(|&date| self.deflator(engine, date))
            .collect::<Result<Vec<_>, _>>()?;
        discounts.push(self.deflator(engine, last)?);

        let mva = funding_value(&discounts, &margins)?;
        info!(mva, kind = %self.margin_kind, spread = self.funding_spread, "margin valuation adjustment");

        Ok(MarginValuation {
            mva,
            profile: dates.into_iter().zip(margins).collect(),
        })
    }

    fn deflator(&self, engine: &PairsInitialMargin<'_>, date: Date) -> Result<RandomVariable, MvaError> {
        let model = engine.model();
        let spread_discount = (-self.funding_spread * model.model_time(date)).exp();
        Ok(model.numeraire(date)?.invert() * spread_discount)
    }
}

/// `-E[Σ (D_{i+1} - D_i) · IM_i]` for deflators `D_0..D_n` and margins
/// `IM_0..IM_{n-1}`.
pub fn funding_value(discounts: &[RandomVariable], margins: &[RandomVariable]) -> Result<f64, MvaError> {
    if discounts.len() != margins.len() + 1 {
        return Err(MvaError::DiscountFactorMismatch {
            expected: margins.len() + 1,
            actual: discounts.len(),
        });
    }
    let total: RandomVariable = discounts
        .windows(2)
        .zip(margins)
        .map(|(d, im)| (&d[1] - &d[0]) * im)
        .sum();
    Ok(-total.average())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::MarginConfig;
    use crate::scenarios::ScenarioSettings;
    use approx::assert_relative_eq;
    use margin_core::types::Currency;
    use margin_models::products::{CurveName, Portfolio, Swap};
    use margin_models::schedules::{Frequency, ScheduleBuilder};
    use margin_models::simulation::{HullWhiteParameters, HullWhiteSimulation, TimeDiscretization};
    use margin_models::zero_rate::{ZeroCurveHistory, ZeroRateModel};
    use std::sync::Arc;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn flat_model() -> ZeroRateModel {
        let params = HullWhiteParameters::new(0.05, 0.0, 0.02).unwrap();
        let grid = TimeDiscretization::uniform(0.0, 400, 1.0 / 365.0).unwrap();
        let sim = HullWhiteSimulation::new(date(2024, 1, 2), params, grid, 1, 3).unwrap();
        let history = ZeroCurveHistory::flat(
            date(2023, 6, 1),
            date(2023, 12, 29),
            &[1.0 / 365.0, 1.0, 5.0],
            0.02,
        )
        .unwrap();
        ZeroRateModel::new(Arc::new(sim), history)
    }

    fn short_portfolio(end: Date) -> Portfolio {
        let schedule = ScheduleBuilder::new()
            .start(date(2024, 1, 2))
            .end(end)
            .frequency(Frequency::SemiAnnual)
            .build()
            .unwrap();
        let swap = Swap::vanilla(
            Currency::EUR,
            CurveName::new("EUR"),
            1_000_000.0,
            &schedule,
            0.02,
            false,
        )
        .unwrap();
        let mut portfolio = Portfolio::new(Currency::EUR, CurveName::new("EUR"));
        portfolio.add_swap(swap).unwrap();
        portfolio
    }

    fn config() -> MarginConfig {
        MarginConfig::default()
            .with_scenarios(ScenarioSettings::default().with_rolling_window_days(100))
    }

    // ========================================
    // Funding integral
    // ========================================

    #[test]
    fn test_constant_margin_telescopes() {
        let discounts: Vec<RandomVariable> = [1.0, 0.99, 0.97, 0.96]
            .into_iter()
            .map(RandomVariable::scalar)
            .collect();
        let margins = vec![RandomVariable::scalar(100.0); 3];
        let mva = funding_value(&discounts, &margins).unwrap();
        assert_relative_eq!(mva, 100.0 * (1.0 - 0.96), epsilon = 1e-12);
    }

    #[test]
    fn test_path_wise_average() {
        let discounts = vec![
            RandomVariable::scalar(1.0),
            RandomVariable::from_paths(vec![0.9, 0.8]),
        ];
        let margins = vec![RandomVariable::from_paths(vec![10.0, 20.0])];
        // -(( -0.1 * 10) + (-0.2 * 20)) / 2
        assert_relative_eq!(funding_value(&discounts, &margins).unwrap(), 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_mismatched_lengths_rejected() {
        let discounts = vec![RandomVariable::scalar(1.0)];
        let margins = vec![RandomVariable::scalar(1.0)];
        assert_eq!(
            funding_value(&discounts, &margins),
            Err(MvaError::DiscountFactorMismatch { expected: 2, actual: 1 })
        );
    }

    #[test]
    fn test_invalid_spread_rejected() {
        assert!(MarginValuationAdjustment::new(f64::INFINITY, MarginKind::Pairs).is_err());
        let mva = MarginValuationAdjustment::new(0.01, MarginKind::Floor).unwrap();
        assert_eq!(mva.funding_spread(), 0.01);
        assert_eq!(mva.margin_kind(), MarginKind::Floor);
    }

    // ========================================
    // Portfolio
    // ========================================

    #[test]
    fn test_time_grid_stops_before_last_payment() {
        let model = flat_model();
        let portfolio = short_portfolio(date(2024, 2, 2));
        let engine = PairsInitialMargin::new(&model, &portfolio, config());

        let grid = MarginValuationAdjustment::time_grid(&engine).unwrap();
        assert_eq!(grid.first(), Some(&date(2024, 1, 2)));
        assert_eq!(grid.last(), Some(&date(2024, 2, 1)));
        assert!(grid.iter().all(|d| d.is_business_day()));
    }

    #[test]
    fn test_flat_market_has_no_mva() {
        let model = flat_model();
        let portfolio = short_portfolio(date(2024, 2, 2));
        let engine = PairsInitialMargin::new(&model, &portfolio, config());

        let valuation = MarginValuationAdjustment::new(0.01, MarginKind::Floor)
            .unwrap()
            .valuation(&engine)
            .unwrap();
        assert_eq!(valuation.profile.len(), 23);
        assert!(valuation.mva.abs() < 1e-6);
    }

    #[test]
    fn test_matured_portfolio_has_no_mva() {
        let model = flat_model();
        let portfolio = Portfolio::new(Currency::EUR, CurveName::new("EUR"));
        let engine = PairsInitialMargin::new(&model, &portfolio, config());

        let mva = MarginValuationAdjustment::new(0.01, MarginKind::Pairs).unwrap();
        assert_eq!(mva.value(&engine).unwrap(), 0.0);
    }
}
