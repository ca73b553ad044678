//! Blended historical and simulated zero-rate model.

use std::collections::BTreeMap;
use std::sync::Arc;

use margin_core::market_data::Curve;
use margin_core::stochastic::{RandomVariable, RandomVariableSeries};
use margin_core::types::{Date, DAYS_PER_YEAR};
use parking_lot::RwLock;

use super::error::{DataGap, ZeroRateError};
use super::history::ZeroCurveHistory;
use crate::simulation::{ModelError, PathSimulation};

/// Model time step of one calendar day.
pub const DAILY_STEP: f64 = 1.0 / DAYS_PER_YEAR;

/// Zero rates on historical and simulated dates.
///
/// Dates with a historical curve are answered from history. Dates on or
/// after the reference date of the path simulation get a curve created on
/// first access; its rates are derived from simulated forward rates and
/// stored as pillars, so every maturity is simulated at most once per date.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use margin_core::types::Date;
/// use margin_models::simulation::{HullWhiteParameters, HullWhiteSimulation, TimeDiscretization};
/// use margin_models::zero_rate::{ZeroCurveHistory, ZeroRateModel};
///
/// let reference = Date::from_ymd(2024, 1, 2).unwrap();
/// let params = HullWhiteParameters::new(0.05, 0.0, 0.02).unwrap();
/// let grid = TimeDiscretization::uniform(0.0, 3650, 1.0 / 365.0).unwrap();
/// let sim = HullWhiteSimulation::new(reference, params, grid, 4, 1).unwrap();
///
/// let history = ZeroCurveHistory::flat(
///     Date::from_ymd(2023, 12, 1).unwrap(),
///     Date::from_ymd(2023, 12, 29).unwrap(),
///     &[0.25, 1.0, 10.0],
///     0.02,
/// )
/// .unwrap();
/// let model = ZeroRateModel::new(Arc::new(sim), history);
///
/// let future = Date::from_ymd(2024, 6, 3).unwrap();
/// let rate = model.zero_rate(future, 2.0, None, None).unwrap();
/// assert!((rate.get(0) - 0.02).abs() < 1e-10);
/// ```
pub struct ZeroRateModel {
    simulation: Arc<dyn PathSimulation>,
    history: ZeroCurveHistory,
    simulated: RwLock<BTreeMap<Date, Curve>>,
}

impl ZeroRateModel {
    /// Combines a path simulation with the observed curve history.
    pub fn new(simulation: Arc<dyn PathSimulation>, history: ZeroCurveHistory) -> Self {
        Self {
            simulation,
            history,
            simulated: RwLock::new(BTreeMap::new()),
        }
    }

    /// Date of model time 0.
    pub fn reference_date(&self) -> Date {
        self.simulation.reference_date()
    }

    /// Number of simulated paths.
    pub fn number_of_paths(&self) -> usize {
        self.simulation.number_of_paths()
    }

    /// Underlying path simulation.
    pub fn simulation(&self) -> &dyn PathSimulation {
        self.simulation.as_ref()
    }

    /// Observed history.
    pub fn history(&self) -> &ZeroCurveHistory {
        &self.history
    }

    /// Year fraction from the reference date to `date` (days/365).
    pub fn model_time(&self, date: Date) -> f64 {
        (date - self.reference_date()) as f64 / DAYS_PER_YEAR
    }

    /// Numeraire at `date`.
    pub fn numeraire(&self, date: Date) -> Result<RandomVariable, ZeroRateError> {
        Ok(self.simulation.numeraire(self.model_time(date))?)
    }

    /// Dates with a materialized simulated curve.
    pub fn simulated_dates(&self) -> Vec<Date> {
        self.simulated.read().keys().copied().collect()
    }

    /// Zero rate at `maturity` on `date`, plus the shift curve's rate at
    /// the same maturity when given.
    pub fn zero_rate(
        &self,
        date: Date,
        maturity: f64,
        shift: Option<&Curve>,
        path: Option<usize>,
    ) -> Result<RandomVariable, ZeroRateError> {
        let base = match self.history.curve(date) {
            Some(curve) => curve.rate(maturity, path)?,
            None => self.simulated_rate(date, maturity, path)?,
        };
        match shift {
            Some(shift) => Ok(base + shift.rate(maturity, path)?),
            None => Ok(base),
        }
    }

    /// `exp(-rate · maturity)`, exactly 1 at maturity 0.
    pub fn discount_factor(
        &self,
        date: Date,
        maturity: f64,
        shift: Option<&Curve>,
        path: Option<usize>,
    ) -> Result<RandomVariable, ZeroRateError> {
        if maturity == 0.0 {
            return Ok(RandomVariable::scalar(1.0));
        }
        let rate = self.zero_rate(date, maturity, shift, path)?;
        Ok(rate.map(|r| (-r * maturity).exp()))
    }

    /// Simply compounded forward rate between two maturities seen from `date`.
    pub fn forward_rate(
        &self,
        date: Date,
        period_start: f64,
        period_end: f64,
        shift: Option<&Curve>,
        path: Option<usize>,
    ) -> Result<RandomVariable, ZeroRateError> {
        let length = period_end - period_start;
        if !length.is_finite() || length <= 0.0 {
            return Err(ModelError::InvalidPeriod {
                start: period_start,
                end: period_end,
            }
            .into());
        }
        let df_start = self.discount_factor(date, period_start, shift, path)?;
        let df_end = self.discount_factor(date, period_end, shift, path)?;
        Ok((df_start / df_end - 1.0) / length)
    }

    /// Zero rates at `fixing` for every historical or materialized
    /// simulated date up to and including `date`.
    ///
    /// The fixing is clamped to the pillar range of the first historical
    /// curve. The curve of `date` itself is materialized when it lies on or
    /// after the reference date.
    pub fn rate_series(&self, date: Date, fixing: f64) -> Result<RandomVariableSeries, ZeroRateError> {
        let fixing = match self.history.first_curve() {
            Some(curve) => match (curve.smallest_maturity(), curve.largest_maturity()) {
                (Some(lo), Some(hi)) => fixing.clamp(lo, hi),
                _ => fixing,
            },
            None => fixing,
        };

        if self.history.curve(date).is_none() && date >= self.reference_date() {
            self.zero_rate(date, fixing, None, None)?;
        }

        let mut series = RandomVariableSeries::new();
        for (d, curve) in self.history.up_to(date) {
            series.insert(d, curve.rate(fixing, None)?);
        }
        let simulated: Vec<Date> = self
            .simulated
            .read()
            .range(..=date)
            .map(|(d, _)| *d)
            .filter(|d| self.history.curve(*d).is_none())
            .collect();
        for d in simulated {
            series.insert(d, self.simulated_rate(d, fixing, None)?);
        }
        Ok(series)
    }

    fn simulated_rate(
        &self,
        date: Date,
        maturity: f64,
        path: Option<usize>,
    ) -> Result<RandomVariable, ZeroRateError> {
        let reference = self.reference_date();
        if date < reference {
            return Err(self.data_gap(date, reference).into());
        }

        if let Some(curve) = self.simulated.read().get(&date) {
            if curve.contains_rate(maturity) {
                return Ok(curve.rate(maturity, path)?);
            }
        }

        let rate = self.model_rate(self.model_time(date), maturity)?;
        let mut simulated = self.simulated.write();
        let curve = simulated.entry(date).or_default();
        if !curve.contains_rate(maturity) {
            curve.add_rate(maturity, rate);
        }
        Ok(curve.rate(maturity, path)?)
    }

    fn data_gap(&self, date: Date, reference: Date) -> DataGap {
        match (self.history.first_date(), self.history.last_date()) {
            (Some(_), Some(last)) if date > last => DataGap::ContinuityGap {
                date,
                last,
                reference,
            },
            (Some(first), _) if date < first => DataGap::BeforeHistory { date, first },
            (Some(_), _) => DataGap::MissingDate(date),
            (None, _) => DataGap::BeforeHistory {
                date,
                first: reference,
            },
        }
    }

    /// Zero rate for `maturity` at model time `time`, interpolated between
    /// the bracketing simulation grid times.
    fn model_rate(&self, time: f64, maturity: f64) -> Result<RandomVariable, ZeroRateError> {
        let grid = self.simulation.time_discretization();
        let lower = grid.nearest_index_less_or_equal(time);
        let lower_time = grid.time(lower);
        if (time - lower_time).abs() < DAILY_STEP / 2.0 {
            return self.grid_rate(lower_time, maturity);
        }

        let upper = lower + 1;
        if upper >= grid.len() || grid.time(upper) + maturity > self.simulation.model_maturity() {
            return self.grid_rate(lower_time, maturity);
        }
        let upper_time = grid.time(upper);
        let w = (time - lower_time) / (upper_time - lower_time);
        let lo = self.grid_rate(lower_time, maturity)?;
        let hi = self.grid_rate(upper_time, maturity)?;
        Ok(lo * (1.0 - w) + hi * w)
    }

    /// `-ln(1 / (1 + L(t, t, t + m) · m)) / m`
    fn grid_rate(&self, time: f64, maturity: f64) -> Result<RandomVariable, ZeroRateError> {
        let libor = self.simulation.forward_rate(time, time, time + maturity)?;
        Ok(libor.map(|l| -(1.0 / (1.0 + l * maturity)).ln() / maturity))
    }
}

impl std::fmt::Debug for ZeroRateModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZeroRateModel")
            .field("reference_date", &self.reference_date())
            .field("number_of_paths", &self.number_of_paths())
            .field("history_dates", &self.history.len())
            .field("simulated_dates", &self.simulated.read().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{HullWhiteParameters, HullWhiteSimulation, TimeDiscretization};
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn model(volatility: f64) -> ZeroRateModel {
        let reference = date(2024, 1, 2);
        let params = HullWhiteParameters::new(0.05, volatility, 0.03).unwrap();
        let grid = TimeDiscretization::uniform(0.0, 40, 0.25).unwrap();
        let sim = HullWhiteSimulation::new(reference, params, grid, 16, 3)
            .unwrap()
            .with_model_maturity(40.0);
        let history = ZeroCurveHistory::from_rates([
            (date(2023, 12, 27), 1.0, 0.01),
            (date(2023, 12, 27), 5.0, 0.02),
            (date(2023, 12, 29), 1.0, 0.011),
            (date(2023, 12, 29), 5.0, 0.021),
        ]);
        ZeroRateModel::new(Arc::new(sim), history)
    }

    // ========================================
    // Historical dates
    // ========================================

    #[test]
    fn test_historical_rate_interpolated() {
        let m = model(0.0);
        let rate = m.zero_rate(date(2023, 12, 27), 3.0, None, None).unwrap();
        assert_relative_eq!(rate.get(0), 0.015, epsilon = 1e-15);
        let flat = m.zero_rate(date(2023, 12, 27), 30.0, None, None).unwrap();
        assert_eq!(flat.get(0), 0.02);
    }

    #[test]
    fn test_shift_is_added() {
        let m = model(0.0);
        let shift = Curve::from_scalars(&[(1.0, 0.001)]);
        let rate = m
            .zero_rate(date(2023, 12, 29), 1.0, Some(&shift), None)
            .unwrap();
        assert_relative_eq!(rate.get(0), 0.012, epsilon = 1e-15);
    }

    // ========================================
    // Data gaps
    // ========================================

    #[test]
    fn test_before_history() {
        let err = model(0.0).zero_rate(date(2023, 12, 1), 1.0, None, None);
        assert!(matches!(
            err,
            Err(ZeroRateError::DataGap(DataGap::BeforeHistory { .. }))
        ));
    }

    #[test]
    fn test_missing_historical_date() {
        let err = model(0.0).zero_rate(date(2023, 12, 28), 1.0, None, None);
        assert_eq!(
            err,
            Err(ZeroRateError::DataGap(DataGap::MissingDate(date(2023, 12, 28))))
        );
    }

    #[test]
    fn test_continuity_gap() {
        let err = model(0.0).zero_rate(date(2024, 1, 1), 1.0, None, None);
        assert!(matches!(
            err,
            Err(ZeroRateError::DataGap(DataGap::ContinuityGap { .. }))
        ));
    }

    // ========================================
    // Simulated dates
    // ========================================

    #[test]
    fn test_simulated_rate_flat_without_volatility() {
        let m = model(0.0);
        for maturity in [0.5, 2.0, 10.0] {
            let rate = m.zero_rate(date(2024, 3, 1), maturity, None, None).unwrap();
            assert_relative_eq!(rate.get(5), 0.03, epsilon = 1e-12);
        }
        assert_eq!(m.simulated_dates(), vec![date(2024, 3, 1)]);
    }

    #[test]
    fn test_simulated_rate_is_memoized() {
        let m = model(0.01);
        let first = m.zero_rate(date(2024, 5, 7), 2.0, None, None).unwrap();
        let second = m.zero_rate(date(2024, 5, 7), 2.0, None, None).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.number_of_paths(), 16);
        let single = m.zero_rate(date(2024, 5, 7), 2.0, None, Some(3)).unwrap();
        assert_eq!(single.get(0), first.get(3));
    }

    #[test]
    fn test_discount_and_forward() {
        let m = model(0.0);
        let d = date(2024, 3, 1);
        assert_eq!(m.discount_factor(d, 0.0, None, None).unwrap().get(0), 1.0);
        let df = m.discount_factor(d, 2.0, None, None).unwrap();
        assert_relative_eq!(df.get(0), (-0.06_f64).exp(), epsilon = 1e-12);
        let fwd = m.forward_rate(d, 1.0, 2.0, None, None).unwrap();
        assert_relative_eq!(fwd.get(0), 0.03_f64.exp() - 1.0, epsilon = 1e-10);
        assert!(m.forward_rate(d, 2.0, 1.0, None, None).is_err());
    }

    #[test]
    fn test_rate_series_clamps_and_materializes() {
        let m = model(0.0);
        let series = m.rate_series(date(2024, 1, 3), 30.0).unwrap();
        assert_eq!(series.len(), 3);
        // Clamped to the 5y pillar of the first historical curve
        assert_eq!(series.get(&date(2023, 12, 27)).unwrap().get(0), 0.02);
        assert_relative_eq!(
            series.get(&date(2024, 1, 3)).unwrap().get(0),
            0.03,
            epsilon = 1e-12
        );
        assert_eq!(m.simulated_dates(), vec![date(2024, 1, 3)]);
    }
}
