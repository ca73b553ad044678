//! Pipeline plus window for one tenor point.

use margin_core::stochastic::RandomVariableSeries;
use margin_core::types::Date;

use super::error::ScenarioError;
use super::settings::ScenarioSettings;
use super::simulation::Simulation;
use super::window::ScenarioWindow;
use crate::transformations::{apply_pipeline, RateTransformation, TransformationContext};

/// Turns a rate history into scenario shifts.
///
/// # Examples
///
/// ```
/// use margin_core::stochastic::{RandomVariable, RandomVariableSeries};
/// use margin_core::types::Date;
/// use margin_risk::scenarios::{ScenarioBuilder, ScenarioWindow};
/// use margin_risk::transformations::{RateTransformation, ReturnType};
///
/// let rates: RandomVariableSeries = (1..=6)
///     .map(|d| (Date::from_ymd(2024, 1, d).unwrap(), RandomVariable::scalar(0.01 * d as f64)))
///     .collect();
/// let builder = ScenarioBuilder::new(
///     vec![RateTransformation::returns(1, ReturnType::Absolute)],
///     ScenarioWindow::Rolling { days: 3 },
/// );
/// let shifts = builder.build(rates, Date::from_ymd(2024, 1, 6).unwrap()).unwrap();
/// assert_eq!(shifts.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioBuilder {
    transformations: Vec<RateTransformation>,
    window: ScenarioWindow,
}

impl ScenarioBuilder {
    /// Creates a builder from an ordered pipeline and a window.
    pub fn new(transformations: Vec<RateTransformation>, window: ScenarioWindow) -> Self {
        Self {
            transformations,
            window,
        }
    }

    /// Methodology pipeline and window of `simulation`.
    pub fn for_simulation(simulation: Simulation, settings: &ScenarioSettings, cutoff: Date) -> Self {
        Self::new(simulation.pipeline(), simulation.window(settings, cutoff))
    }

    /// Transformations in application order.
    pub fn transformations(&self) -> &[RateTransformation] {
        &self.transformations
    }

    /// Window applied to the pipeline output.
    pub fn window(&self) -> ScenarioWindow {
        self.window
    }

    /// Runs the pipeline on `rates` and windows the result at `cutoff`.
    pub fn build(
        &self,
        rates: RandomVariableSeries,
        cutoff: Date,
    ) -> Result<RandomVariableSeries, ScenarioError> {
        let mut context = TransformationContext::new(rates);
        apply_pipeline(&self.transformations, &mut context)?;
        self.window.select(context.primary_data(), cutoff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transformations::{ReturnType, TransformationError};
    use approx::assert_relative_eq;
    use margin_core::stochastic::RandomVariable;

    fn rates(n: u32) -> RandomVariableSeries {
        let start = Date::from_ymd(2023, 1, 2).unwrap();
        (0..n)
            .map(|i| {
                let d = start.add_days(i as i64).unwrap();
                (d, RandomVariable::scalar(0.02 + 0.0001 * ((i * 37) % 11) as f64))
            })
            .collect()
    }

    #[test]
    fn test_var_builder_yields_lagged_returns() {
        let input = rates(20);
        let cutoff = *input.last().unwrap().0;
        let settings = ScenarioSettings::default().with_rolling_window_days(10);
        let builder = ScenarioBuilder::for_simulation(Simulation::ValueAtRisk, &settings, cutoff);
        let out = builder.build(input.clone(), cutoff).unwrap();

        // 15 returns, the last 10 kept; the stress interval lies outside the data
        assert_eq!(out.len(), 10);
        let (date, value) = out.last().unwrap();
        let later = input.iter().nth(19).unwrap().1;
        assert_relative_eq!(
            value.get(0),
            later.get(0) - input.get(date).unwrap().get(0),
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_pipeline_errors_propagate() {
        let builder = ScenarioBuilder::new(
            vec![RateTransformation::returns(30, ReturnType::Absolute)],
            ScenarioWindow::FullHistory,
        );
        let cutoff = Date::from_ymd(2024, 1, 1).unwrap();
        assert!(matches!(
            builder.build(rates(10), cutoff),
            Err(ScenarioError::Transformation(TransformationError::InsufficientData { .. }))
        ));
    }

    #[test]
    fn test_expected_shortfall_needs_seed_history() {
        let input = rates(40);
        let cutoff = *input.last().unwrap().0;
        let builder = ScenarioBuilder::for_simulation(
            Simulation::ExpectedShortfall4,
            &ScenarioSettings::default(),
            cutoff,
        );
        assert!(matches!(
            builder.build(input, cutoff),
            Err(ScenarioError::Transformation(TransformationError::InsufficientData {
                id: "EWMA",
                ..
            }))
        ));
    }
}
