//! Margin simulations and their scenario pipelines.

use std::fmt;
use std::str::FromStr;

use margin_core::types::Date;

use super::error::ScenarioError;
use super::settings::ScenarioSettings;
use super::window::ScenarioWindow;
use crate::transformations::{RateTransformation, ReturnType};

/// Margin period of risk in observations.
pub const RETURN_LAG: usize = 5;

/// Observations in the EWMA seed.
pub const EWMA_SEED_WINDOW: usize = 60;

/// EWMA decay factor.
pub const EWMA_DECAY: f64 = 0.992;

/// Historical simulation variant.
///
/// # Examples
///
/// ```
/// use margin_risk::scenarios::Simulation;
///
/// let floor: Simulation = "VaR".parse().unwrap();
/// assert_eq!(floor, Simulation::ValueAtRisk);
/// assert_eq!(floor.worst_count(), 13);
/// assert_eq!(floor.pipeline().len(), 1);
/// assert_eq!(Simulation::ExpectedShortfall6.pipeline().len(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Simulation {
    /// Average of the 4 worst losses over the full history.
    ExpectedShortfall4,
    /// Average of the 6 worst losses over the rolling window (Base IM).
    ExpectedShortfall6,
    /// 13th worst loss over the rolling window plus stress (Floor IM).
    ValueAtRisk,
}

impl Simulation {
    /// Every simulation.
    pub const ALL: [Simulation; 3] = [
        Simulation::ExpectedShortfall4,
        Simulation::ExpectedShortfall6,
        Simulation::ValueAtRisk,
    ];

    /// Number of worst losses entering the aggregate.
    pub fn worst_count(&self) -> usize {
        match self {
            Simulation::ExpectedShortfall4 => 4,
            Simulation::ExpectedShortfall6 => 6,
            Simulation::ValueAtRisk => 13,
        }
    }

    /// `true` for the expected shortfall variants.
    pub fn is_expected_shortfall(&self) -> bool {
        !matches!(self, Simulation::ValueAtRisk)
    }

    /// Transformations applied to each tenor point's rate history.
    pub fn pipeline(&self) -> Vec<RateTransformation> {
        let returns = RateTransformation::returns(RETURN_LAG, ReturnType::Absolute);
        if self.is_expected_shortfall() {
            vec![
                returns,
                RateTransformation::Ewma {
                    seed_window: EWMA_SEED_WINDOW,
                    decay: EWMA_DECAY,
                },
                RateTransformation::mid_volatility_scaling("Returns"),
            ]
        } else {
            vec![returns]
        }
    }

    /// Window over the transformed series ending at `cutoff`.
    pub fn window(&self, settings: &ScenarioSettings, cutoff: Date) -> ScenarioWindow {
        match self {
            Simulation::ExpectedShortfall4 => ScenarioWindow::FullHistory,
            Simulation::ExpectedShortfall6 => settings.rolling(),
            Simulation::ValueAtRisk => settings.rolling_with_stress(cutoff),
        }
    }

    /// Short name.
    pub fn name(&self) -> &'static str {
        match self {
            Simulation::ExpectedShortfall4 => "ES4",
            Simulation::ExpectedShortfall6 => "ES6",
            Simulation::ValueAtRisk => "VaR",
        }
    }
}

impl FromStr for Simulation {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self, ScenarioError> {
        match s.to_lowercase().replace(['_', '-', ' '], "").as_str() {
            "es4" | "expectedshortfall4" => Ok(Simulation::ExpectedShortfall4),
            "es6" | "expectedshortfall6" | "expectedshortfall" | "base" => {
                Ok(Simulation::ExpectedShortfall6)
            }
            "var" | "valueatrisk" | "var13" | "floor" => Ok(Simulation::ValueAtRisk),
            _ => Err(ScenarioError::UnknownSimulation(s.to_string())),
        }
    }
}

impl fmt::Display for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
