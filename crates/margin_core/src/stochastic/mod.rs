//! Path-wise values and date-keyed series.
//!
//! - [`RandomVariable`]: one realization per simulation path, scalars broadcast
//! - [`RandomVariableSeries`]: date → `RandomVariable` with summation and worst-value selection

pub mod random_variable;
pub mod series;

pub use random_variable::RandomVariable;
pub use series::RandomVariableSeries;
