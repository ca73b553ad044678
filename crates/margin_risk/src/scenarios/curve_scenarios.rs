//! Per-tenor scenario series and the shift curves built from them.

use std::collections::{BTreeMap, BTreeSet};

use margin_core::market_data::{Curve, Maturity};
use margin_core::stochastic::RandomVariableSeries;
use margin_core::types::{Date, SeriesError};

/// Scenario shift series keyed by tenor fixing.
///
/// # Examples
///
/// ```
/// use margin_core::stochastic::{RandomVariable, RandomVariableSeries};
/// use margin_core::types::Date;
/// use margin_risk::scenarios::CurveScenarios;
///
/// let d = Date::from_ymd(2024, 1, 2).unwrap();
/// let mut one_year = RandomVariableSeries::new();
/// one_year.insert(d, RandomVariable::scalar(0.001));
/// let mut five_years = RandomVariableSeries::new();
/// five_years.insert(d, RandomVariable::scalar(0.003));
///
/// let mut scenarios = CurveScenarios::new();
/// scenarios.insert(1.0, one_year);
/// scenarios.insert(5.0, five_years);
///
/// let shift = scenarios.curve_shifts(d).unwrap();
/// assert!((shift.rate(3.0, None).unwrap().get(0) - 0.002).abs() < 1e-15);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurveScenarios {
    scenarios: BTreeMap<Maturity, RandomVariableSeries>,
}

impl CurveScenarios {
    /// Creates an empty set of scenarios.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the scenario series of `fixing`.
    pub fn insert(&mut self, fixing: f64, series: RandomVariableSeries) {
        self.scenarios.insert(Maturity::new(fixing), series);
    }

    /// Scenario series of `fixing`.
    pub fn get(&self, fixing: f64) -> Option<&RandomVariableSeries> {
        self.scenarios.get(&Maturity::new(fixing))
    }

    /// Fixings in ascending order.
    pub fn fixings(&self) -> impl Iterator<Item = f64> + '_ {
        self.scenarios.keys().map(|m| m.years())
    }

    /// `(fixing, series)` pairs in ascending fixing order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, &RandomVariableSeries)> {
        self.scenarios.iter().map(|(m, s)| (m.years(), s))
    }

    /// Number of fixings.
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    /// Returns `true` without fixings.
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Every scenario date across the fixings.
    pub fn dates(&self) -> Vec<Date> {
        self.scenarios
            .values()
            .flat_map(|s| s.dates().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Shift curve of scenario `date`: each fixing's value on that date.
    pub fn curve_shifts(&self, date: Date) -> Result<Curve, SeriesError> {
        let mut curve = Curve::new();
        for (fixing, series) in self.iter() {
            curve.add_rate(fixing, series.value_at(date)?.clone());
        }
        Ok(curve)
    }
}

impl FromIterator<(f64, RandomVariableSeries)> for CurveScenarios {
    fn from_iter<I: IntoIterator<Item = (f64, RandomVariableSeries)>>(iter: I) -> Self {
        let mut scenarios = Self::new();
        for (fixing, series) in iter {
            scenarios.insert(fixing, series);
        }
        scenarios
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use margin_core::stochastic::RandomVariable;

    fn day(d: u32) -> Date {
        Date::from_ymd(2024, 1, d).unwrap()
    }

    fn scenarios() -> CurveScenarios {
        [(0.5, 1.0), (2.0, 3.0)]
            .into_iter()
            .map(|(fixing, scale)| {
                let series = (2..=4)
                    .map(|d| (day(d), RandomVariable::from_paths(vec![scale * d as f64, 0.0])))
                    .collect();
                (fixing, series)
            })
            .collect()
    }

    #[test]
    fn test_curve_shifts_read_each_fixing() {
        let curve = scenarios().curve_shifts(day(3)).unwrap();
        assert_eq!(curve.maturities(), vec![0.5, 2.0]);
        assert_eq!(curve.rate(0.5, Some(0)).unwrap().get(0), 3.0);
        assert_eq!(curve.rate(2.0, Some(0)).unwrap().get(0), 9.0);
        assert_eq!(curve.rate(2.0, Some(1)).unwrap().get(0), 0.0);
    }

    #[test]
    fn test_curve_shifts_missing_date() {
        assert!(matches!(
            scenarios().curve_shifts(day(9)),
            Err(SeriesError::MissingDate(d)) if d == day(9)
        ));
    }

    #[test]
    fn test_dates_and_fixings() {
        let s = scenarios();
        assert_eq!(s.dates(), vec![day(2), day(3), day(4)]);
        assert_eq!(s.fixings().collect::<Vec<_>>(), vec![0.5, 2.0]);
        assert!(s.get(1.0).is_none());
    }
}
