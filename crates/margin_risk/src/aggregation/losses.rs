//! Taylor PnL and loss aggregation.

use std::collections::BTreeSet;

use margin_core::market_data::Maturity;
use margin_core::stochastic::{RandomVariable, RandomVariableSeries};

use super::error::MarginError;
use crate::scenarios::{CurveScenarios, Simulation};
use crate::sensitivities::SensitivityMatrix;

/// Conversion of a decimal rate shift into basis points.
pub const DECIMAL_TO_BP: f64 = 10_000.0;

/// Worst Taylor scenarios that are fully revalued.
pub const FULL_REVALUATIONS: usize = 20;

/// Second-order Taylor PnL of every scenario date.
///
/// Each delta row contributes `s_r · 10⁴ · Δ[r][r]` and each gamma cell
/// `½ · s_r · s_c · 10⁸ · Γ[r][c]`, with `s` the scenario shift of a fixing.
/// Without sensitivities the series is empty.
pub fn taylor_pnl(
    delta: &SensitivityMatrix,
    gamma: &SensitivityMatrix,
    scenarios: &CurveScenarios,
) -> Result<RandomVariableSeries, MarginError> {
    let rows: BTreeSet<Maturity> = delta
        .row_fixings()
        .chain(gamma.row_fixings())
        .map(Maturity::new)
        .collect();
    let shifts = |fixing: f64| {
        scenarios
            .get(fixing)
            .ok_or(MarginError::MissingScenario { fixing })
    };

    let mut pnl = RandomVariableSeries::new();
    for row in rows.into_iter().map(Maturity::years) {
        let row_shifts = shifts(row)?;
        if let Some(sensitivity) = delta.diagonal(row) {
            let scale = sensitivity * DECIMAL_TO_BP;
            pnl.sum(&row_shifts.map(|s| s * &scale))?;
        }
        for (col, sensitivity) in gamma.row(row) {
            let col_shifts = shifts(col)?;
            let scale = sensitivity * (0.5 * DECIMAL_TO_BP * DECIMAL_TO_BP);
            let mut term = RandomVariableSeries::new();
            for (date, s_row) in row_shifts {
                term.insert(*date, s_row * col_shifts.value_at(*date)? * &scale);
            }
            pnl.sum(&term)?;
        }
    }
    Ok(pnl)
}

/// `|Σ worst k / k|`, ranking on `path` or the cross-path average.
///
/// The sum is divided by `k` even when fewer losses are available.
pub fn expected_shortfall(
    losses: &RandomVariableSeries,
    k: usize,
    path: Option<usize>,
) -> RandomVariable {
    if k == 0 {
        return RandomVariable::scalar(0.0);
    }
    let worst: RandomVariable = losses
        .n_lowest_dates(k, path)
        .iter()
        .filter_map(|d| losses.get(d))
        .map(|v| v.at_path(path))
        .sum();
    (worst / k as f64).abs()
}

/// `|k-th worst|`: the least severe loss among the worst `k`.
pub fn value_at_risk(losses: &RandomVariableSeries, k: usize, path: Option<usize>) -> RandomVariable {
    losses
        .n_lowest_dates(k, path)
        .last()
        .and_then(|d| losses.get(d))
        .map(|v| v.at_path(path).abs())
        .unwrap_or_else(|| RandomVariable::scalar(0.0))
}

/// Margin of `simulation` from its full-revaluation losses.
pub fn aggregate_losses(
    losses: &RandomVariableSeries,
    simulation: Simulation,
    path: Option<usize>,
) -> RandomVariable {
    let k = simulation.worst_count();
    if simulation.is_expected_shortfall() {
        expected_shortfall(losses, k, path)
    } else {
        value_at_risk(losses, k, path)
    }
}
