//! Caller-owned state of a transformation pipeline.

use std::collections::HashMap;

use margin_core::stochastic::RandomVariableSeries;

/// Id under which the untransformed input is stored.
pub const INITIAL_DATA_INPUT: &str = "InitialDataInput";

/// Current output of a pipeline plus every intermediate result by id.
///
/// # Examples
///
/// ```
/// use margin_core::stochastic::RandomVariableSeries;
/// use margin_risk::transformations::{TransformationContext, INITIAL_DATA_INPUT};
///
/// let context = TransformationContext::new(RandomVariableSeries::new());
/// assert!(context.result(INITIAL_DATA_INPUT).is_some());
/// ```
#[derive(Debug, Clone)]
pub struct TransformationContext {
    primary_data: RandomVariableSeries,
    results: HashMap<String, RandomVariableSeries>,
}

impl TransformationContext {
    /// Seeds the context with `initial`, also stored as [`INITIAL_DATA_INPUT`].
    pub fn new(initial: RandomVariableSeries) -> Self {
        let mut results = HashMap::new();
        results.insert(INITIAL_DATA_INPUT.to_string(), initial.clone());
        Self {
            primary_data: initial,
            results,
        }
    }

    /// Output of the last applied transformation.
    pub fn primary_data(&self) -> &RandomVariableSeries {
        &self.primary_data
    }

    /// Stored result of transformation `id`.
    pub fn result(&self, id: &str) -> Option<&RandomVariableSeries> {
        self.results.get(id)
    }

    /// Stores `series` under `id` and makes it the primary data.
    pub fn push_result(&mut self, id: &str, series: RandomVariableSeries) {
        self.results.insert(id.to_string(), series.clone());
        self.primary_data = series;
    }

    /// Consumes the context, returning the primary data.
    pub fn into_primary_data(self) -> RandomVariableSeries {
        self.primary_data
    }
}
