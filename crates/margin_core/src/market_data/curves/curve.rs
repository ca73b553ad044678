//! Zero-rate curve with memoized interpolation.

use parking_lot::RwLock;
use std::collections::BTreeMap;

use super::maturity::Maturity;
use crate::market_data::error::CurveError;
use crate::stochastic::RandomVariable;

/// Sorted map from maturity to a path-wise zero rate.
///
/// Pillars are the sampled rates. Rates at other maturities are obtained
/// by constant extrapolation outside the pillar range and by linear
/// interpolation of zero rates inside it. Each computed rate is stored in
/// an interpolation cache owned by the curve, so repeated queries return
/// the identical value; adding a pillar clears the cache.
///
/// # Example
///
/// ```
/// use margin_core::market_data::Curve;
/// use margin_core::stochastic::RandomVariable;
///
/// let curve = Curve::from_scalars(&[(1.0, 0.01), (3.0, 0.03)]);
///
/// let mid = curve.rate(2.0, None).unwrap();
/// assert!((mid.get(0) - 0.02).abs() < 1e-15);
/// assert_eq!(curve.cached_maturities(), vec![2.0]);
///
/// // Flat beyond the last pillar
/// assert_eq!(curve.rate(10.0, None).unwrap(), RandomVariable::scalar(0.03));
/// ```
#[derive(Debug, Default)]
pub struct Curve {
    pillars: BTreeMap<Maturity, RandomVariable>,
    interpolated: RwLock<BTreeMap<Maturity, RandomVariable>>,
}

impl Curve {
    /// Creates an empty curve.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a curve of deterministic pillars.
    pub fn from_scalars(points: &[(f64, f64)]) -> Self {
        points
            .iter()
            .map(|&(m, r)| (m, RandomVariable::scalar(r)))
            .collect()
    }

    /// Adds or replaces a pillar and clears the interpolation cache.
    pub fn add_rate(&mut self, maturity: f64, rate: RandomVariable) {
        self.pillars.insert(Maturity::new(maturity), rate);
        self.interpolated.get_mut().clear();
    }

    /// Returns `true` if `maturity` is a pillar.
    pub fn contains_rate(&self, maturity: f64) -> bool {
        self.pillars.contains_key(&Maturity::new(maturity))
    }

    /// Zero rate at `maturity`, restricted to `path` when given.
    pub fn rate(&self, maturity: f64, path: Option<usize>) -> Result<RandomVariable, CurveError> {
        if !maturity.is_finite() {
            return Err(CurveError::NonFiniteMaturity { maturity });
        }
        let key = Maturity::new(maturity);
        if let Some(rate) = self.pillars.get(&key) {
            return Ok(rate.at_path(path));
        }
        if let Some(rate) = self.interpolated.read().get(&key) {
            return Ok(rate.at_path(path));
        }

        let rate = self.interpolate(key)?;
        let mut cache = self.interpolated.write();
        let stored = cache.entry(key).or_insert(rate);
        Ok(stored.at_path(path))
    }

    fn interpolate(&self, key: Maturity) -> Result<RandomVariable, CurveError> {
        let below = self.pillars.range(..key).next_back();
        let above = self.pillars.range(key..).next();
        match (below, above) {
            (None, None) => Err(CurveError::EmptyCurve),
            (None, Some((_, hi))) => Ok(hi.clone()),
            (Some((_, lo)), None) => Ok(lo.clone()),
            (Some((m_lo, lo)), Some((m_hi, hi))) => {
                let w = (key.years() - m_lo.years()) / (m_hi.years() - m_lo.years());
                Ok(lo * (1.0 - w) + hi * w)
            }
        }
    }

    /// Smallest pillar maturity.
    pub fn smallest_maturity(&self) -> Option<f64> {
        self.pillars.keys().next().map(|m| m.years())
    }

    /// Largest pillar maturity.
    pub fn largest_maturity(&self) -> Option<f64> {
        self.pillars.keys().next_back().map(|m| m.years())
    }

    /// Pillar maturities in ascending order.
    pub fn maturities(&self) -> Vec<f64> {
        self.pillars.keys().map(|m| m.years()).collect()
    }

    /// Pillars in ascending maturity order.
    pub fn pillars(&self) -> impl Iterator<Item = (f64, &RandomVariable)> {
        self.pillars.iter().map(|(m, r)| (m.years(), r))
    }

    /// Maturities currently held in the interpolation cache.
    pub fn cached_maturities(&self) -> Vec<f64> {
        self.interpolated.read().keys().map(|m| m.years()).collect()
    }

    /// Number of pillars.
    pub fn len(&self) -> usize {
        self.pillars.len()
    }

    /// Returns `true` if the curve has no pillars.
    pub fn is_empty(&self) -> bool {
        self.pillars.is_empty()
    }
}

impl Clone for Curve {
    fn clone(&self) -> Self {
        Self {
            pillars: self.pillars.clone(),
            interpolated: RwLock::new(self.interpolated.read().clone()),
        }
    }
}

impl FromIterator<(f64, RandomVariable)> for Curve {
    fn from_iter<I: IntoIterator<Item = (f64, RandomVariable)>>(iter: I) -> Self {
        Self {
            pillars: iter
                .into_iter()
                .map(|(m, r)| (Maturity::new(m), r))
                .collect(),
            interpolated: RwLock::new(BTreeMap::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn sample_curve() -> Curve {
        Curve::from_scalars(&[(0.5, 0.010), (1.0, 0.015), (5.0, 0.030), (10.0, 0.035)])
    }

    // ========================================
    // Lookup
    // ========================================

    #[test]
    fn test_empty_curve_errors() {
        match Curve::new().rate(1.0, None) {
            Err(CurveError::EmptyCurve) => {}
            _ => panic!("Expected EmptyCurve error"),
        }
    }

    #[test]
    fn test_non_finite_maturity_errors() {
        assert!(matches!(
            sample_curve().rate(f64::INFINITY, None),
            Err(CurveError::NonFiniteMaturity { .. })
        ));
    }

    #[test]
    fn test_pillar_hit_does_not_cache() {
        let curve = sample_curve();
        assert_relative_eq!(curve.rate(1.0, None).unwrap().get(0), 0.015);
        assert!(curve.cached_maturities().is_empty());
    }

    #[test]
    fn test_interpolation_is_memoized_and_matches_formula() {
        let curve = sample_curve();
        let first = curve.rate(3.0, None).unwrap();
        let second = curve.rate(3.0, None).unwrap();
        assert_eq!(first, second);

        let w = (3.0 - 1.0) / (5.0 - 1.0);
        assert_relative_eq!(first.get(0), 0.015 * (1.0 - w) + 0.030 * w, epsilon = 1e-15);
        assert_eq!(curve.cached_maturities(), vec![3.0]);
        assert_eq!(curve.len(), 4);
    }

    #[test]
    fn test_extrapolation_is_flat() {
        let curve = sample_curve();
        assert_eq!(curve.rate(0.0, None).unwrap().get(0), 0.010);
        assert_eq!(curve.rate(0.1, None).unwrap().get(0), 0.010);
        assert_eq!(curve.rate(60.0, None).unwrap().get(0), 0.035);
    }

    #[test]
    fn test_path_filtering() {
        let mut curve = Curve::new();
        curve.add_rate(1.0, RandomVariable::from_paths(vec![0.01, 0.02]));
        curve.add_rate(2.0, RandomVariable::from_paths(vec![0.03, 0.04]));

        let full = curve.rate(1.5, None).unwrap();
        assert_eq!(full.number_of_paths(), 2);
        let one = curve.rate(1.5, Some(1)).unwrap();
        assert!(one.is_scalar());
        assert_relative_eq!(one.get(0), 0.03, epsilon = 1e-15);
    }

    #[test]
    fn test_add_rate_clears_cache() {
        let mut curve = sample_curve();
        let _ = curve.rate(2.0, None).unwrap();
        curve.add_rate(2.0, RandomVariable::scalar(0.5));
        assert!(curve.cached_maturities().is_empty());
        assert_eq!(curve.rate(2.0, None).unwrap().get(0), 0.5);
        assert!(curve.contains_rate(2.0));
    }

    #[test]
    fn test_clone_keeps_cache() {
        let curve = sample_curve();
        let _ = curve.rate(7.0, None).unwrap();
        assert_eq!(curve.clone().cached_maturities(), vec![7.0]);
    }

    proptest! {
        #[test]
        fn prop_interpolated_rate_stays_between_neighbours(m in 1.0f64..5.0) {
            let curve = sample_curve();
            let r = curve.rate(m, None).unwrap().get(0);
            prop_assert!((0.015 - 1e-15..=0.030 + 1e-15).contains(&r));
            prop_assert_eq!(curve.rate(m, None).unwrap().get(0), r);
        }

        #[test]
        fn prop_flat_outside_range(m in 10.0f64..100.0) {
            prop_assert_eq!(sample_curve().rate(m, None).unwrap().get(0), 0.035);
        }
    }
}
