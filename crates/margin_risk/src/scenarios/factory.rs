//! Scenario series for tenor points read from the zero-rate model.

use std::collections::BTreeSet;

use margin_core::market_data::Maturity;
use margin_core::stochastic::RandomVariableSeries;
use margin_core::types::Date;
use margin_models::zero_rate::ZeroRateModel;
use tracing::debug;

use super::builder::ScenarioBuilder;
use super::curve_scenarios::CurveScenarios;
use super::error::ScenarioError;
use super::settings::ScenarioSettings;
use super::simulation::Simulation;
use crate::parallel::{try_parallel_map, ParallelConfig};

/// Builds scenario shifts from the rate history of a zero-rate model.
#[derive(Debug, Clone)]
pub struct ScenarioFactory<'a> {
    model: &'a ZeroRateModel,
    settings: ScenarioSettings,
    parallel: ParallelConfig,
}

impl<'a> ScenarioFactory<'a> {
    /// Creates a factory over `model`.
    pub fn new(model: &'a ZeroRateModel, settings: ScenarioSettings) -> Self {
        Self {
            model,
            settings,
            parallel: ParallelConfig::default(),
        }
    }

    /// Sets the parallel configuration of [`curve_scenarios`](Self::curve_scenarios).
    pub fn with_parallel_config(mut self, parallel: ParallelConfig) -> Self {
        self.parallel = parallel;
        self
    }

    /// Window settings.
    pub fn settings(&self) -> &ScenarioSettings {
        &self.settings
    }

    /// Scenario shifts of the tenor point `fixing` as seen on `date`.
    pub fn tenor_point_scenarios(
        &self,
        date: Date,
        fixing: f64,
        simulation: Simulation,
    ) -> Result<RandomVariableSeries, ScenarioError> {
        let rates = self.model.rate_series(date, fixing)?;
        ScenarioBuilder::for_simulation(simulation, &self.settings, date).build(rates, date)
    }

    /// Scenario shifts of every distinct fixing, each built once.
    pub fn curve_scenarios(
        &self,
        date: Date,
        fixings: impl IntoIterator<Item = f64>,
        simulation: Simulation,
    ) -> Result<CurveScenarios, ScenarioError> {
        let unique: Vec<f64> = fixings
            .into_iter()
            .map(Maturity::new)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(Maturity::years)
            .collect();
        debug!(%date, %simulation, fixings = unique.len(), "building curve scenarios");

        let series = try_parallel_map(&unique, &self.parallel, |&fixing| {
            self.tenor_point_scenarios(date, fixing, simulation)
        })?;
        Ok(unique.into_iter().zip(series).collect())
    }
}
