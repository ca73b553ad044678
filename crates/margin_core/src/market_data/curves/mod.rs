//! Zero-rate curves.
//!
//! - [`Curve`]: pillar map with flat extrapolation and memoized linear interpolation
//! - [`Maturity`]: totally ordered year-fraction key

mod curve;
mod maturity;

pub use curve::Curve;
pub use maturity::Maturity;
