//! Margin engine configuration.

use std::fmt;
use std::str::FromStr;

use super::error::MarginError;
use crate::parallel::ParallelConfig;
use crate::scenarios::{ScenarioSettings, Simulation};

/// Margin figure reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MarginKind {
    /// Expected shortfall over the 6 worst losses.
    Base,
    /// Value-at-risk at the 13th worst loss, with stress.
    Floor,
    /// Larger of base and floor.
    #[default]
    Pairs,
}

impl MarginKind {
    /// Every kind.
    pub const ALL: [MarginKind; 3] = [MarginKind::Base, MarginKind::Floor, MarginKind::Pairs];

    /// Simulation behind a single-simulation kind.
    pub fn simulation(&self) -> Option<Simulation> {
        match self {
            MarginKind::Base => Some(Simulation::ExpectedShortfall6),
            MarginKind::Floor => Some(Simulation::ValueAtRisk),
            MarginKind::Pairs => None,
        }
    }
}

impl FromStr for MarginKind {
    type Err = MarginError;

    fn from_str(s: &str) -> Result<Self, MarginError> {
        match s.trim().to_lowercase().as_str() {
            "base" => Ok(MarginKind::Base),
            "floor" => Ok(MarginKind::Floor),
            "pairs" => Ok(MarginKind::Pairs),
            _ => Err(MarginError::UnknownMarginKind(s.to_string())),
        }
    }
}

impl fmt::Display for MarginKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarginKind::Base => write!(f, "Base"),
            MarginKind::Floor => write!(f, "Floor"),
            MarginKind::Pairs => write!(f, "Pairs"),
        }
    }
}

/// Configuration of [`PairsInitialMargin`](super::PairsInitialMargin).
///
/// # Examples
///
/// ```
/// use margin_risk::aggregation::MarginConfig;
///
/// let config = MarginConfig::default().with_path_wise(true).with_moving_window(false);
/// assert!(config.path_wise);
/// assert!(!config.moving_window);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarginConfig {
    /// Scenarios as of each evaluation date; otherwise as of the model
    /// reference date
    pub moving_window: bool,
    /// One margin per simulation path instead of cross-path ranking
    pub path_wise: bool,
    /// Scenario window settings
    pub scenarios: ScenarioSettings,
    /// Parallel execution settings
    pub parallel: ParallelConfig,
}

impl Default for MarginConfig {
    fn default() -> Self {
        Self {
            moving_window: true,
            path_wise: false,
            scenarios: ScenarioSettings::default(),
            parallel: ParallelConfig::default(),
        }
    }
}

impl MarginConfig {
    /// Sets the moving window flag.
    pub fn with_moving_window(mut self, moving_window: bool) -> Self {
        self.moving_window = moving_window;
        self
    }

    /// Sets the path-wise flag.
    pub fn with_path_wise(mut self, path_wise: bool) -> Self {
        self.path_wise = path_wise;
        self
    }

    /// Sets the scenario settings.
    pub fn with_scenarios(mut self, scenarios: ScenarioSettings) -> Self {
        self.scenarios = scenarios;
        self
    }

    /// Sets the parallel configuration.
    pub fn with_parallel(mut self, parallel: ParallelConfig) -> Self {
        self.parallel = parallel;
        self
    }
}
