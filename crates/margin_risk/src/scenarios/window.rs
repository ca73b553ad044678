//! Date windows over transformed scenario series.

use margin_core::stochastic::RandomVariableSeries;
use margin_core::types::Date;

use super::error::ScenarioError;

/// Scenario dates retained after the transformation pipeline.
///
/// # Examples
///
/// ```
/// use margin_core::stochastic::{RandomVariable, RandomVariableSeries};
/// use margin_core::types::Date;
/// use margin_risk::scenarios::ScenarioWindow;
///
/// let series: RandomVariableSeries = (1..=5)
///     .map(|d| (Date::from_ymd(2024, 1, d).unwrap(), RandomVariable::scalar(d as f64)))
///     .collect();
/// let cutoff = Date::from_ymd(2024, 1, 4).unwrap();
///
/// let window = ScenarioWindow::Rolling { days: 2 }.select(&series, cutoff).unwrap();
/// let dates: Vec<u32> = window.dates().map(|d| d.day()).collect();
/// assert_eq!(dates, vec![3, 4]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScenarioWindow {
    /// Every transformed date.
    FullHistory,
    /// The `days` most recent dates up to the cutoff.
    Rolling {
        /// Window length in observations
        days: usize,
    },
    /// A rolling window plus every date of a fixed stress interval.
    RollingWithStress {
        /// Window length in observations
        days: usize,
        /// First stress date
        stress_start: Date,
        /// Last stress date
        stress_end: Date,
    },
}

impl ScenarioWindow {
    /// Restricts `series` to the window ending at `cutoff`.
    pub fn select(
        &self,
        series: &RandomVariableSeries,
        cutoff: Date,
    ) -> Result<RandomVariableSeries, ScenarioError> {
        match *self {
            ScenarioWindow::FullHistory => Ok(series.clone()),
            ScenarioWindow::Rolling { days } => rolling(series, days, cutoff),
            ScenarioWindow::RollingWithStress {
                days,
                stress_start,
                stress_end,
            } => {
                if stress_end < stress_start {
                    return Err(ScenarioError::InvalidStressWindow {
                        start: stress_start,
                        end: stress_end,
                    });
                }
                let mut selected = rolling(series, days, cutoff)?;
                selected.extend_from(&series.between(stress_start, stress_end));
                Ok(selected)
            }
        }
    }
}

fn rolling(
    series: &RandomVariableSeries,
    days: usize,
    cutoff: Date,
) -> Result<RandomVariableSeries, ScenarioError> {
    if days == 0 {
        return Err(ScenarioError::EmptyWindow);
    }
    let available: Vec<&Date> = series.dates().filter(|d| **d <= cutoff).collect();
    if days >= available.len() {
        return Err(ScenarioError::InsufficientHistory {
            requested: days,
            available: available.len(),
            cutoff,
        });
    }
    let start = *available[available.len() - days];
    Ok(series.between(start, cutoff))
}
