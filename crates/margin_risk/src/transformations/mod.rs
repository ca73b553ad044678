//! Scenario transformation pipeline.
//!
//! A pipeline is a sequence of [`RateTransformation`]s applied in order to a
//! [`TransformationContext`]. Each step reads the context's primary data,
//! stores its output under its id and makes it the new primary data, so
//! later steps can refer back to earlier results by id.
//!
//! # Example
//!
//! ```
//! use margin_core::stochastic::{RandomVariable, RandomVariableSeries};
//! use margin_core::types::Date;
//! use margin_risk::transformations::{
//!     apply_pipeline, RateTransformation, ReturnType, TransformationContext,
//! };
//!
//! let rates: RandomVariableSeries = [(2, 0.01), (3, 0.015), (4, 0.02)]
//!     .into_iter()
//!     .map(|(d, r)| (Date::from_ymd(2024, 1, d).unwrap(), RandomVariable::scalar(r)))
//!     .collect();
//!
//! let mut context = TransformationContext::new(rates);
//! apply_pipeline(&[RateTransformation::returns(1, ReturnType::Absolute)], &mut context).unwrap();
//! assert_eq!(context.primary_data().len(), 2);
//! assert!(context.result("Returns").is_some());
//! ```

mod context;
mod error;
mod ewma;
mod mid_volatility;
mod returns;

pub use context::{TransformationContext, INITIAL_DATA_INPUT};
pub use error::TransformationError;
pub use returns::ReturnType;

use tracing::trace;

/// A named, stateless step of the scenario pipeline.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RateTransformation {
    /// Returns over a margin period of risk of `lag` observations.
    Returns {
        /// Lag in observations
        lag: usize,
        /// Absolute or relative returns
        return_type: ReturnType,
    },
    /// EWMA dispersion with a sample standard deviation seed.
    Ewma {
        /// Observations in the seed
        seed_window: usize,
        /// Decay factor λ
        decay: f64,
    },
    /// Rescales a referenced return series by the dispersion ratio.
    MidVolatilityScaling {
        /// Id of the return series to rescale
        reference_id: String,
    },
}

impl RateTransformation {
    /// Returns transformation.
    pub fn returns(lag: usize, return_type: ReturnType) -> Self {
        RateTransformation::Returns { lag, return_type }
    }

    /// EWMA transformation with a validated decay.
    pub fn ewma(seed_window: usize, decay: f64) -> Result<Self, TransformationError> {
        if !(decay > 0.0 && decay < 1.0) {
            return Err(TransformationError::InvalidDecay(decay));
        }
        Ok(RateTransformation::Ewma { seed_window, decay })
    }

    /// Mid-volatility scaling of the result stored under `reference_id`.
    pub fn mid_volatility_scaling(reference_id: impl Into<String>) -> Self {
        RateTransformation::MidVolatilityScaling {
            reference_id: reference_id.into(),
        }
    }

    /// Id under which the output is stored.
    pub fn id(&self) -> &'static str {
        match self {
            RateTransformation::Returns { .. } => "Returns",
            RateTransformation::Ewma { .. } => "EWMA",
            RateTransformation::MidVolatilityScaling { .. } => "MidVolatilityScaling",
        }
    }

    /// Transforms the context's primary data.
    pub fn apply(&self, context: &mut TransformationContext) -> Result<(), TransformationError> {
        let output = match self {
            RateTransformation::Returns { lag, return_type } => {
                returns::returns(context.primary_data(), *lag, *return_type)?
            }
            RateTransformation::Ewma { seed_window, decay } => {
                ewma::ewma(context.primary_data(), *seed_window, *decay)?
            }
            RateTransformation::MidVolatilityScaling { reference_id } => {
                let referenced = context
                    .result(reference_id)
                    .ok_or_else(|| TransformationError::MissingReference(reference_id.clone()))?;
                mid_volatility::mid_volatility_scaling(
                    context.primary_data(),
                    referenced,
                    reference_id,
                )?
            }
        };
        trace!(id = self.id(), len = output.len(), "transformation applied");
        context.push_result(self.id(), output);
        Ok(())
    }
}

/// Applies `transformations` in order.
pub fn apply_pipeline(
    transformations: &[RateTransformation],
    context: &mut TransformationContext,
) -> Result<(), TransformationError> {
    transformations.iter().try_for_each(|t| t.apply(context))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use margin_core::stochastic::{RandomVariable, RandomVariableSeries};
    use margin_core::types::Date;

    fn day(d: u32) -> Date {
        Date::from_ymd(2024, 1, d).unwrap()
    }

    fn series(values: &[f64]) -> RandomVariableSeries {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| (day(i as u32 + 1), RandomVariable::scalar(v)))
            .collect()
    }

    fn run(t: &RateTransformation, input: RandomVariableSeries) -> RandomVariableSeries {
        let mut context = TransformationContext::new(input);
        t.apply(&mut context).unwrap();
        context.into_primary_data()
    }

    // ========================================
    // Returns
    // ========================================

    #[test]
    fn test_absolute_returns() {
        let out = run(
            &RateTransformation::returns(1, ReturnType::Absolute),
            series(&[0.01, 0.015, 0.02]),
        );
        assert_eq!(out.len(), 2);
        assert_relative_eq!(out.get(&day(1)).unwrap().get(0), 0.005, epsilon = 1e-15);
        assert_relative_eq!(out.get(&day(2)).unwrap().get(0), 0.005, epsilon = 1e-15);
        assert!(out.get(&day(3)).is_none());
    }

    #[test]
    fn test_relative_returns_with_lag() {
        let out = run(
            &RateTransformation::returns(2, ReturnType::Relative),
            series(&[0.01, 0.02, 0.015, 0.04]),
        );
        assert_eq!(out.len(), 2);
        assert_relative_eq!(out.get(&day(1)).unwrap().get(0), 0.5, epsilon = 1e-12);
        assert_relative_eq!(out.get(&day(2)).unwrap().get(0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_returns_require_more_than_lag() {
        let mut context = TransformationContext::new(series(&[0.01, 0.02]));
        let err = RateTransformation::returns(2, ReturnType::Absolute).apply(&mut context);
        assert!(matches!(
            err,
            Err(TransformationError::InsufficientData { required: 3, available: 2, .. })
        ));
    }

    #[test]
    fn test_return_type_from_str() {
        assert_eq!("ABSOLUTE".parse::<ReturnType>().unwrap(), ReturnType::Absolute);
        assert_eq!("rel".parse::<ReturnType>().unwrap(), ReturnType::Relative);
        assert!("log".parse::<ReturnType>().is_err());
    }

    // ========================================
    // EWMA
    // ========================================

    #[test]
    fn test_ewma_seed_is_sample_deviation() {
        let out = run(&RateTransformation::ewma(3, 0.9).unwrap(), series(&[1.0, 2.0, 3.0]));
        // (14 - 36/3) / 2 = 1
        assert_relative_eq!(out.get(&day(1)).unwrap().get(0), 1.0, epsilon = 1e-15);
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn test_ewma_recursion() {
        let out = run(
            &RateTransformation::ewma(3, 0.9).unwrap(),
            series(&[1.0, 2.0, 3.0, 4.0]),
        );
        let s1 = 0.9 * 1.0 + 0.1 * 4.0;
        let s2 = 0.9 * s1 + 0.1 * 9.0;
        let s3 = 0.9 * s2 + 0.1 * 16.0;
        assert_relative_eq!(out.get(&day(2)).unwrap().get(0), f64::sqrt(s1), epsilon = 1e-14);
        assert_relative_eq!(out.get(&day(3)).unwrap().get(0), f64::sqrt(s2), epsilon = 1e-14);
        assert_relative_eq!(out.get(&day(4)).unwrap().get(0), f64::sqrt(s3), epsilon = 1e-14);
    }

    #[test]
    fn test_ewma_rejects_bad_configuration() {
        let mut context = TransformationContext::new(series(&[1.0, 2.0]));
        assert_eq!(
            RateTransformation::Ewma { seed_window: 1, decay: 0.9 }.apply(&mut context),
            Err(TransformationError::InvalidSeedWindow(1))
        );
        assert!(matches!(
            RateTransformation::ewma(3, 0.9).unwrap().apply(&mut context),
            Err(TransformationError::InsufficientData { id: "EWMA", .. })
        ));
        assert!(RateTransformation::ewma(60, 1.0).is_err());
    }

    #[test]
    fn test_ewma_is_path_wise() {
        let input: RandomVariableSeries = (1..=3)
            .map(|d| {
                let x = d as f64;
                (day(d), RandomVariable::from_paths(vec![x, 2.0 * x]))
            })
            .collect();
        let out = run(&RateTransformation::ewma(3, 0.9).unwrap(), input);
        let seed = out.get(&day(1)).unwrap();
        assert_relative_eq!(seed.get(0), 1.0, epsilon = 1e-15);
        assert_relative_eq!(seed.get(1), 2.0, epsilon = 1e-15);
    }

    // ========================================
    // Mid-volatility scaling
    // ========================================

    #[test]
    fn test_mid_volatility_scaling() {
        let mut context = TransformationContext::new(series(&[0.1, 0.2]));
        context.push_result("Returns", series(&[0.1, 0.2]));
        context.push_result("EWMA", series(&[1.0, 2.0]));
        RateTransformation::mid_volatility_scaling("Returns")
            .apply(&mut context)
            .unwrap();
        let out = context.primary_data();
        assert_relative_eq!(out.get(&day(1)).unwrap().get(0), 0.15, epsilon = 1e-15);
        assert_relative_eq!(out.get(&day(2)).unwrap().get(0), 0.2, epsilon = 1e-15);
        assert!(context.result("MidVolatilityScaling").is_some());
    }

    #[test]
    fn test_mid_volatility_requires_reference() {
        let mut context = TransformationContext::new(series(&[1.0]));
        assert_eq!(
            RateTransformation::mid_volatility_scaling("Missing").apply(&mut context),
            Err(TransformationError::MissingReference("Missing".to_string()))
        );
    }

    #[test]
    fn test_flat_history_gives_zero_scenarios() {
        let mut context = TransformationContext::new(series(&[0.02; 12]));
        let pipeline = [
            RateTransformation::returns(2, ReturnType::Absolute),
            RateTransformation::ewma(4, 0.9).unwrap(),
            RateTransformation::mid_volatility_scaling("Returns"),
        ];
        apply_pipeline(&pipeline, &mut context).unwrap();
        assert_eq!(context.primary_data().len(), 10);
        assert!(context.primary_data().values().all(|v| v.get(0) == 0.0));
    }

    #[test]
    fn test_pipeline_keeps_initial_input() {
        let input = series(&[0.01, 0.02, 0.04, 0.03, 0.05]);
        let mut context = TransformationContext::new(input.clone());
        let pipeline = [
            RateTransformation::returns(1, ReturnType::Absolute),
            RateTransformation::ewma(2, 0.5).unwrap(),
            RateTransformation::mid_volatility_scaling("Returns"),
        ];
        apply_pipeline(&pipeline, &mut context).unwrap();
        assert_eq!(context.result(INITIAL_DATA_INPUT), Some(&input));
        assert_eq!(context.primary_data().len(), 4);
        assert_eq!(
            context.result("MidVolatilityScaling"),
            Some(context.primary_data())
        );
    }
}
