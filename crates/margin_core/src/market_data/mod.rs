//! Market data: zero curves and standardized tenor grids.

pub mod curves;
mod error;
pub mod tenor_grid;

pub use curves::{Curve, Maturity};
pub use error::{CurveError, GridError};
pub use tenor_grid::{GridType, TenorGrid};
