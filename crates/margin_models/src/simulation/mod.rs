//! Path simulation models.
//!
//! - [`PathSimulation`]: interface of a calibrated multi-path rate model
//! - [`TimeDiscretization`]: simulation time grid
//! - [`HullWhiteSimulation`]: one-factor Hull-White Monte Carlo implementation

mod error;
mod hull_white;
mod path_simulation;
mod time_discretization;

pub use error::ModelError;
pub use hull_white::{HullWhiteParameters, HullWhiteSimulation};
pub use path_simulation::PathSimulation;
pub use time_discretization::TimeDiscretization;
