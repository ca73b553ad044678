//! Simulation time grid.

use super::error::ModelError;

/// Strictly increasing simulation times in years from the reference date.
///
/// # Example
///
/// ```
/// use margin_models::simulation::TimeDiscretization;
///
/// let grid = TimeDiscretization::uniform(0.0, 4, 0.25).unwrap();
/// assert_eq!(grid.len(), 5);
/// assert_eq!(grid.nearest_index_less_or_equal(0.6), 2);
/// assert_eq!(grid.nearest_index_less_or_equal(-1.0), 0);
/// assert_eq!(grid.nearest_index_less_or_equal(9.0), 4);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TimeDiscretization {
    times: Vec<f64>,
}

impl TimeDiscretization {
    /// Wraps an explicit grid.
    pub fn new(times: Vec<f64>) -> Result<Self, ModelError> {
        if times.is_empty() {
            return Err(ModelError::InvalidDiscretization("empty grid".to_string()));
        }
        if times.iter().any(|t| !t.is_finite()) || times.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ModelError::InvalidDiscretization(
                "times must be finite and strictly increasing".to_string(),
            ));
        }
        Ok(Self { times })
    }

    /// `steps + 1` equidistant times starting at `start`.
    pub fn uniform(start: f64, steps: usize, dt: f64) -> Result<Self, ModelError> {
        if dt.is_nan() || dt <= 0.0 {
            return Err(ModelError::InvalidParameter { name: "dt", value: dt });
        }
        Self::new((0..=steps).map(|i| start + i as f64 * dt).collect())
    }

    /// Number of grid times.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Never `true` for a constructed grid.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Grid time at `index`.
    pub fn time(&self, index: usize) -> f64 {
        self.times[index]
    }

    /// All grid times.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Last grid time.
    pub fn last_time(&self) -> f64 {
        self.times[self.times.len() - 1]
    }

    /// Index of the largest grid time `≤ time`, or 0 if none.
    pub fn nearest_index_less_or_equal(&self, time: f64) -> usize {
        self.times.partition_point(|&t| t <= time).saturating_sub(1)
    }
}
