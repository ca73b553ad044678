//! Historical scenario generation.
//!
//! Each tenor point's zero-rate history is run through the transformation
//! pipeline of a [`Simulation`] and restricted to its [`ScenarioWindow`].
//! The per-tenor results form [`CurveScenarios`], from which a shift curve
//! is rebuilt for every scenario date.
//!
//! | Simulation | Pipeline | Window | Worst count |
//! |------------|----------|--------|-------------|
//! | ES4 | Returns, EWMA, MidVolatilityScaling | full history | 4 |
//! | ES6 | Returns, EWMA, MidVolatilityScaling | rolling 2500 | 6 |
//! | VaR | Returns | rolling 2500 + 2008-01-01..2010-06-30 | 13 |

mod builder;
mod curve_scenarios;
mod error;
mod factory;
mod settings;
mod simulation;
mod window;

pub use builder::ScenarioBuilder;
pub use curve_scenarios::CurveScenarios;
pub use error::ScenarioError;
pub use factory::ScenarioFactory;
pub use settings::{ScenarioSettings, ROLLING_WINDOW_DAYS, STRESS_END, STRESS_START};
pub use simulation::{Simulation, EWMA_DECAY, EWMA_SEED_WINDOW, RETURN_LAG};
pub use window::ScenarioWindow;
