//! Mid-volatility scaling of returns.

use margin_core::stochastic::RandomVariableSeries;

use super::error::TransformationError;

/// `r_t / 2 · (1 + d_latest / d_t)` for every date of `dispersion`.
///
/// A zero dispersion only follows zero returns, so the return is kept
/// unscaled there.
pub(crate) fn mid_volatility_scaling(
    dispersion: &RandomVariableSeries,
    returns: &RandomVariableSeries,
    reference_id: &str,
) -> Result<RandomVariableSeries, TransformationError> {
    let latest = match dispersion.last() {
        Some((_, value)) => value.clone(),
        None => return Ok(RandomVariableSeries::new()),
    };
    let mut out = RandomVariableSeries::new();
    for (date, current) in dispersion {
        let ret = returns
            .get(date)
            .ok_or_else(|| TransformationError::MissingObservation {
                id: reference_id.to_string(),
                date: *date,
            })?;
        let ratio = latest.zip_with(current, |l, d| if d == 0.0 { 1.0 } else { l / d });
        out.insert(*date, ret * 0.5 * (ratio + 1.0));
    }
    Ok(out)
}
