//! Exponentially weighted dispersion.

use margin_core::stochastic::{RandomVariable, RandomVariableSeries};

use super::error::TransformationError;

/// EWMA volatility of `returns`.
///
/// The first `seed_window` observations give the seed variance
/// `(Σx² - (Σx)²/S) / (S - 1)`, reported on the first date. Each later date
/// updates `σ²_t = λ σ²_{t-1} + (1 - λ) x_t²`.
pub(crate) fn ewma(
    returns: &RandomVariableSeries,
    seed_window: usize,
    decay: f64,
) -> Result<RandomVariableSeries, TransformationError> {
    if seed_window <= 1 {
        return Err(TransformationError::InvalidSeedWindow(seed_window));
    }
    if returns.len() < seed_window {
        return Err(TransformationError::InsufficientData {
            id: "EWMA",
            required: seed_window,
            available: returns.len(),
        });
    }

    let mut sum = RandomVariable::scalar(0.0);
    let mut sum_of_squares = RandomVariable::scalar(0.0);
    for value in returns.values().take(seed_window) {
        sum = sum + value;
        sum_of_squares = sum_of_squares + value.squared();
    }
    let s = seed_window as f64;
    let seed = ((sum_of_squares - sum.squared() / s) / (s - 1.0)).map(|v| v.max(0.0));

    let mut entries = returns.iter();
    let mut out = RandomVariableSeries::new();
    if let Some((first, _)) = entries.next() {
        out.insert(*first, seed.sqrt());
    }
    let mut variance = seed;
    for (date, value) in entries {
        variance = &variance * decay + value.squared() * (1.0 - decay);
        out.insert(*date, variance.sqrt());
    }
    Ok(out)
}
