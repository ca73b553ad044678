//! Hull-White one-factor Monte Carlo simulation.
//!
//! The short rate follows
//! ```text
//! dr(t) = [theta(t) - a * r(t)] * dt + sigma * dW(t)
//! ```
//! with theta fitted to a flat initial curve at `initial_rate`. Writing
//! `r(t) = x(t) + alpha(t)`, the Ornstein-Uhlenbeck factor `x` is sampled
//! exactly on the time grid and
//! ```text
//! alpha(t) = r0 + sigma^2 / (2 a^2) * (1 - exp(-a t))^2
//! ```
//! Zero-coupon bonds are analytic in the state:
//! ```text
//! P(t, T) = exp(-r0 (T - t) + B (r0 - r(t)) - sigma^2 / (4a) (1 - exp(-2at)) B^2)
//! B(t, T) = (1 - exp(-a (T - t))) / a
//! ```
//! The numeraire is the discretely integrated bank account.
//!
//! ## Usage
//!
//! ```
//! use margin_core::types::Date;
//! use margin_models::simulation::{
//!     HullWhiteParameters, HullWhiteSimulation, PathSimulation, TimeDiscretization,
//! };
//!
//! let params = HullWhiteParameters::new(0.05, 0.0, 0.02).unwrap();
//! let grid = TimeDiscretization::uniform(0.0, 20, 0.5).unwrap();
//! let reference = Date::from_ymd(2024, 1, 2).unwrap();
//! let model = HullWhiteSimulation::new(reference, params, grid, 8, 42).unwrap();
//!
//! // Zero volatility reproduces the flat initial curve
//! let fwd = model.forward_rate(1.0, 1.0, 2.0).unwrap();
//! assert!((fwd.get(3) - (0.02_f64.exp() - 1.0)).abs() < 1e-12);
//! ```

use margin_core::stochastic::RandomVariable;
use margin_core::types::Date;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};

use super::error::ModelError;
use super::path_simulation::PathSimulation;
use super::time_discretization::TimeDiscretization;

/// Hull-White model parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HullWhiteParameters {
    /// Mean reversion speed (a > 0)
    pub mean_reversion: f64,
    /// Short rate volatility (sigma ≥ 0; zero gives a deterministic model)
    pub volatility: f64,
    /// Level of the flat initial zero curve
    pub initial_rate: f64,
}

impl HullWhiteParameters {
    /// Creates validated parameters.
    ///
    /// # Examples
    ///
    /// ```
    /// use margin_models::simulation::HullWhiteParameters;
    ///
    /// assert!(HullWhiteParameters::new(0.05, 0.01, 0.03).is_ok());
    /// assert!(HullWhiteParameters::new(-0.05, 0.01, 0.03).is_err());
    /// ```
    pub fn new(mean_reversion: f64, volatility: f64, initial_rate: f64) -> Result<Self, ModelError> {
        if !mean_reversion.is_finite() || mean_reversion <= 0.0 {
            return Err(ModelError::InvalidParameter {
                name: "mean_reversion",
                value: mean_reversion,
            });
        }
        if !volatility.is_finite() || volatility < 0.0 {
            return Err(ModelError::InvalidParameter {
                name: "volatility",
                value: volatility,
            });
        }
        if !initial_rate.is_finite() {
            return Err(ModelError::InvalidParameter {
                name: "initial_rate",
                value: initial_rate,
            });
        }
        Ok(Self {
            mean_reversion,
            volatility,
            initial_rate,
        })
    }

    fn alpha(&self, t: f64) -> f64 {
        let a = self.mean_reversion;
        let s = self.volatility;
        let decay = 1.0 - (-a * t).exp();
        self.initial_rate + s * s / (2.0 * a * a) * decay * decay
    }

    fn b(&self, t: f64, maturity: f64) -> f64 {
        let a = self.mean_reversion;
        (1.0 - (-a * (maturity - t)).exp()) / a
    }

    /// Bond price `P(t, maturity)` given the short rate at `t`.
    fn bond(&self, t: f64, maturity: f64, short_rate: f64) -> f64 {
        let a = self.mean_reversion;
        let s = self.volatility;
        let r0 = self.initial_rate;
        let b = self.b(t, maturity);
        let convexity = s * s / (4.0 * a) * (1.0 - (-2.0 * a * t).exp()) * b * b;
        (-r0 * (maturity - t) + b * (r0 - short_rate) - convexity).exp()
    }
}

/// Simulated Hull-White short-rate paths on a time grid.
#[derive(Clone, Debug)]
pub struct HullWhiteSimulation {
    reference_date: Date,
    params: HullWhiteParameters,
    discretization: TimeDiscretization,
    model_maturity: f64,
    number_of_paths: usize,
    /// Short rates indexed `[time index][path]`
    short_rates: Vec<Vec<f64>>,
    /// Integrated short rate `∫_0^t r(s) ds` indexed `[time index][path]`
    integrated: Vec<Vec<f64>>,
}

impl HullWhiteSimulation {
    /// Simulates `number_of_paths` paths with a seeded generator.
    ///
    /// The model maturity defaults to the last grid time.
    pub fn new(
        reference_date: Date,
        params: HullWhiteParameters,
        discretization: TimeDiscretization,
        number_of_paths: usize,
        seed: u64,
    ) -> Result<Self, ModelError> {
        if number_of_paths == 0 {
            return Err(ModelError::InvalidParameter {
                name: "number_of_paths",
                value: 0.0,
            });
        }

        let a = params.mean_reversion;
        let sigma = params.volatility;
        let times = discretization.times();
        let mut rng = StdRng::seed_from_u64(seed);

        let mut factor = vec![0.0; number_of_paths];
        let mut short_rates = Vec::with_capacity(times.len());
        let mut integrated = Vec::with_capacity(times.len());

        let first: Vec<f64> = factor.iter().map(|x| x + params.alpha(times[0])).collect();
        integrated.push(vec![0.0; number_of_paths]);
        short_rates.push(first);

        for i in 1..times.len() {
            let dt = times[i] - times[i - 1];
            let decay = (-a * dt).exp();
            let std_dev = sigma * ((1.0 - (-2.0 * a * dt).exp()) / (2.0 * a)).sqrt();
            let alpha = params.alpha(times[i]);

            for x in factor.iter_mut() {
                let z: f64 = StandardNormal.sample(&mut rng);
                *x = *x * decay + std_dev * z;
            }
            let rates: Vec<f64> = factor.iter().map(|x| x + alpha).collect();
            let bank: Vec<f64> = integrated[i - 1]
                .iter()
                .zip(short_rates[i - 1].iter().zip(&rates))
                .map(|(acc, (r_prev, r_next))| acc + 0.5 * (r_prev + r_next) * dt)
                .collect();

            short_rates.push(rates);
            integrated.push(bank);
        }

        let model_maturity = discretization.last_time();
        Ok(Self {
            reference_date,
            params,
            discretization,
            model_maturity,
            number_of_paths,
            short_rates,
            integrated,
        })
    }

    /// Overrides the last time of the forward-rate tenor structure.
    pub fn with_model_maturity(mut self, model_maturity: f64) -> Self {
        self.model_maturity = model_maturity;
        self
    }

    /// Model parameters.
    pub fn params(&self) -> &HullWhiteParameters {
        &self.params
    }

    /// Simulated short rates at a grid index.
    pub fn short_rate(&self, index: usize) -> RandomVariable {
        RandomVariable::from_paths(self.short_rates[index].clone())
    }
}

impl PathSimulation for HullWhiteSimulation {
    fn reference_date(&self) -> Date {
        self.reference_date
    }

    fn number_of_paths(&self) -> usize {
        self.number_of_paths
    }

    fn time_discretization(&self) -> &TimeDiscretization {
        &self.discretization
    }

    fn model_maturity(&self) -> f64 {
        self.model_maturity
    }

    fn forward_rate(
        &self,
        time: f64,
        period_start: f64,
        period_end: f64,
    ) -> Result<RandomVariable, ModelError> {
        let length = period_end - period_start;
        if !length.is_finite() || length <= 0.0 {
            return Err(ModelError::InvalidPeriod {
                start: period_start,
                end: period_end,
            });
        }
        let index = self.discretization.nearest_index_less_or_equal(time);
        let t = self.discretization.time(index);
        let forwards = self.short_rates[index]
            .iter()
            .map(|&r| {
                let ratio =
                    self.params.bond(t, period_start, r) / self.params.bond(t, period_end, r);
                (ratio - 1.0) / length
            })
            .collect();
        Ok(RandomVariable::from_paths(forwards))
    }

    fn numeraire(&self, time: f64) -> Result<RandomVariable, ModelError> {
        let index = self.discretization.nearest_index_less_or_equal(time);
        let values = self.integrated[index].iter().map(|x| x.exp()).collect();
        Ok(RandomVariable::from_paths(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reference() -> Date {
        Date::from_ymd(2024, 1, 2).unwrap()
    }

    fn model(vol: f64, paths: usize) -> HullWhiteSimulation {
        let params = HullWhiteParameters::new(0.1, vol, 0.03).unwrap();
        let grid = TimeDiscretization::uniform(0.0, 40, 0.25).unwrap();
        HullWhiteSimulation::new(reference(), params, grid, paths, 7).unwrap()
    }

    // ========================================
    // Parameters
    // ========================================

    #[test]
    fn test_invalid_parameters() {
        match HullWhiteParameters::new(0.1, -0.01, 0.02) {
            Err(ModelError::InvalidParameter { name, .. }) => assert_eq!(name, "volatility"),
            _ => panic!("Expected InvalidParameter error"),
        }
        assert!(HullWhiteParameters::new(0.1, 0.01, f64::NAN).is_err());
    }

    #[test]
    fn test_zero_paths_rejected() {
        let params = HullWhiteParameters::new(0.1, 0.01, 0.03).unwrap();
        let grid = TimeDiscretization::uniform(0.0, 4, 0.25).unwrap();
        assert!(HullWhiteSimulation::new(reference(), params, grid, 0, 1).is_err());
    }

    // ========================================
    // Deterministic limit
    // ========================================

    #[test]
    fn test_zero_volatility_is_flat() {
        let m = model(0.0, 4);
        let fwd = m.forward_rate(2.0, 2.0, 2.5).unwrap();
        let expected = ((0.03_f64 * 0.5).exp() - 1.0) / 0.5;
        for p in 0..4 {
            assert_relative_eq!(fwd.get(p), expected, epsilon = 1e-12);
        }
        let n = m.numeraire(4.0).unwrap();
        assert_relative_eq!(n.get(0), (0.03_f64 * 4.0).exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_period_rejected() {
        assert!(matches!(
            model(0.0, 1).forward_rate(0.0, 1.0, 1.0),
            Err(ModelError::InvalidPeriod { .. })
        ));
    }

    // ========================================
    // Stochastic behaviour
    // ========================================

    #[test]
    fn test_paths_disperse_with_volatility() {
        let m = model(0.01, 64);
        let rates = m.short_rate(20);
        let spread = rates
            .realizations()
            .iter()
            .fold((f64::MAX, f64::MIN), |(lo, hi), &r| (lo.min(r), hi.max(r)));
        assert!(spread.1 - spread.0 > 1e-4);
        // Every path starts at the initial rate
        assert!(m.short_rate(0).realizations().iter().all(|&r| r == 0.03));
    }

    #[test]
    fn test_seed_is_reproducible() {
        assert_eq!(model(0.01, 8).short_rate(10), model(0.01, 8).short_rate(10));
    }

    #[test]
    fn test_model_maturity_override() {
        let m = model(0.0, 1).with_model_maturity(30.0);
        assert_eq!(m.model_maturity(), 30.0);
        assert_eq!(model(0.0, 1).model_maturity(), 10.0);
    }
}
