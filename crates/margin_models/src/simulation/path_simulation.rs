//! Interface of a calibrated multi-path rate model.

use margin_core::stochastic::RandomVariable;
use margin_core::types::Date;

use super::error::ModelError;
use super::time_discretization::TimeDiscretization;

/// Multi-path generator of forward rates and numeraires.
///
/// Times are year fractions (days/365) from [`reference_date`](Self::reference_date).
/// Returned values carry one realization per path, or a scalar for
/// deterministic quantities.
pub trait PathSimulation: Send + Sync {
    /// Date corresponding to model time 0.
    fn reference_date(&self) -> Date;

    /// Number of Monte Carlo paths.
    fn number_of_paths(&self) -> usize;

    /// Simulation time grid.
    fn time_discretization(&self) -> &TimeDiscretization;

    /// Last time of the model's forward-rate tenor structure.
    fn model_maturity(&self) -> f64;

    /// Simply compounded forward rate for `[period_start, period_end]`
    /// observed at `time`.
    fn forward_rate(
        &self,
        time: f64,
        period_start: f64,
        period_end: f64,
    ) -> Result<RandomVariable, ModelError>;

    /// Numeraire (bank account) at `time`.
    fn numeraire(&self, time: f64) -> Result<RandomVariable, ModelError>;
}
