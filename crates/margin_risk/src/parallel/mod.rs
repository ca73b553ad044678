//! Rayon-based parallelisation utilities.
//!
//! Scenario construction is independent across tenor fixings and path-wise
//! margin evaluation is independent across paths. Both go through the
//! helpers here, which fall back to a sequential loop below a configurable
//! item count.

use rayon::prelude::*;

/// Item count from which work is spread over the rayon pool.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 8;

/// Configuration for parallel execution.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParallelConfig {
    /// Minimum items before using parallelism
    pub parallel_threshold: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl ParallelConfig {
    /// Creates a new parallel configuration.
    pub fn new(parallel_threshold: usize) -> Self {
        Self { parallel_threshold }
    }

    /// Never parallelises.
    pub fn sequential() -> Self {
        Self {
            parallel_threshold: usize::MAX,
        }
    }

    /// Sets the parallel threshold.
    pub fn with_parallel_threshold(mut self, parallel_threshold: usize) -> Self {
        self.parallel_threshold = parallel_threshold;
        self
    }

    /// Returns whether to use parallel processing for the given item count.
    #[inline]
    pub fn should_parallelize(&self, n_items: usize) -> bool {
        n_items >= self.parallel_threshold
    }
}

/// Maps each item, in parallel when the configuration allows.
///
/// Results keep the order of `items`.
pub fn parallel_map<T, R, F>(items: &[T], config: &ParallelConfig, mapper: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync + Send,
{
    if config.should_parallelize(items.len()) {
        items.par_iter().map(mapper).collect()
    } else {
        items.iter().map(mapper).collect()
    }
}

/// Fallible [`parallel_map`]; returns the first error encountered.
pub fn try_parallel_map<T, R, E, F>(
    items: &[T],
    config: &ParallelConfig,
    mapper: F,
) -> Result<Vec<R>, E>
where
    T: Sync,
    R: Send,
    E: Send,
    F: Fn(&T) -> Result<R, E> + Sync + Send,
{
    if config.should_parallelize(items.len()) {
        items.par_iter().map(mapper).collect()
    } else {
        items.iter().map(mapper).collect()
    }
}
