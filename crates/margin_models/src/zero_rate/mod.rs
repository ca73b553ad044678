//! Zero-rate curve model over history and simulation.
//!
//! - [`ZeroCurveHistory`]: observed daily curves
//! - [`ZeroRateModel`]: zero rates, discount factors, forward rates and
//!   per-fixing rate series on historical and simulated dates

mod error;
mod history;
mod model;

pub use error::{DataGap, ZeroRateError};
pub use history::ZeroCurveHistory;
pub use model::{ZeroRateModel, DAILY_STEP};
