//! Intermediate artifacts of a margin evaluation.

use std::collections::BTreeMap;

use margin_core::stochastic::{RandomVariable, RandomVariableSeries};
use margin_core::types::Date;

use crate::scenarios::{CurveScenarios, Simulation};
use crate::sensitivities::SensitivityMatrix;

/// Artifacts of one simulation at one evaluation date.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationArtifacts {
    /// Scenario shift series per fixing
    pub curve_scenarios: CurveScenarios,
    /// Taylor PnL per scenario date
    pub pnl: RandomVariableSeries,
    /// Fully revalued scenario dates, worst first; one list per path in
    /// path-wise mode
    pub worst_dates: Vec<Vec<Date>>,
    /// Resulting margin
    pub margin: RandomVariable,
}

/// Sensitivities and per-simulation artifacts of one evaluation date.
#[derive(Debug, Clone, PartialEq)]
pub struct InitialMarginContainer {
    evaluation: Date,
    delta: SensitivityMatrix,
    gamma: SensitivityMatrix,
    simulations: BTreeMap<Simulation, SimulationArtifacts>,
}

impl InitialMarginContainer {
    /// Creates a container holding the sensitivities of `evaluation`.
    pub fn new(evaluation: Date, delta: SensitivityMatrix, gamma: SensitivityMatrix) -> Self {
        Self {
            evaluation,
            delta,
            gamma,
            simulations: BTreeMap::new(),
        }
    }

    /// Evaluation date.
    pub fn evaluation(&self) -> Date {
        self.evaluation
    }

    /// Bucketed delta.
    pub fn delta(&self) -> &SensitivityMatrix {
        &self.delta
    }

    /// Bucketed gamma.
    pub fn gamma(&self) -> &SensitivityMatrix {
        &self.gamma
    }

    /// Stores the artifacts of `simulation`.
    pub fn insert(&mut self, simulation: Simulation, artifacts: SimulationArtifacts) {
        self.simulations.insert(simulation, artifacts);
    }

    /// Artifacts of `simulation`.
    pub fn simulation(&self, simulation: Simulation) -> Option<&SimulationArtifacts> {
        self.simulations.get(&simulation)
    }

    /// Margin of `simulation`.
    pub fn margin(&self, simulation: Simulation) -> Option<&RandomVariable> {
        self.simulation(simulation).map(|a| &a.margin)
    }

    /// Simulations evaluated so far.
    pub fn simulations(&self) -> impl Iterator<Item = Simulation> + '_ {
        self.simulations.keys().copied()
    }
}
