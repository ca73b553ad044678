//! Upper-triangular sensitivity accumulator.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use margin_core::market_data::{Maturity, TenorGrid};
use margin_core::stochastic::RandomVariable;

use super::allocation::{allocate_delta, allocate_gamma};

/// Sensitivities keyed by `(maturity1, maturity2)` with `maturity1 ≤ maturity2`.
///
/// Deltas live on the diagonal. Gammas fill the upper triangle, with cross
/// terms stored once at double weight, so the plain sum over all cells
/// equals the symmetric bilinear form.
///
/// # Examples
///
/// ```
/// use margin_core::stochastic::RandomVariable;
/// use margin_risk::sensitivities::SensitivityMatrix;
///
/// let mut matrix = SensitivityMatrix::new();
/// matrix.add_value(5.0, 2.0, &RandomVariable::scalar(1.0));
/// matrix.add_value(2.0, 5.0, &RandomVariable::scalar(0.5));
///
/// assert_eq!(matrix.get(2.0, 5.0).unwrap().get(0), 1.5);
/// assert!(matrix.get(5.0, 2.0).is_none());
/// assert_eq!(matrix.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensitivityMatrix {
    values: BTreeMap<Maturity, BTreeMap<Maturity, RandomVariable>>,
}

impl SensitivityMatrix {
    /// Creates an empty matrix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `value` at `(min(i, j), max(i, j))`.
    pub fn add_value(&mut self, i: f64, j: f64, value: &RandomVariable) {
        let (row, col) = if j < i { (j, i) } else { (i, j) };
        let cell = self
            .values
            .entry(Maturity::new(row))
            .or_default()
            .entry(Maturity::new(col));
        match cell {
            Entry::Occupied(mut e) => {
                let sum = e.get() + value;
                e.insert(sum);
            }
            Entry::Vacant(e) => {
                e.insert(value.clone());
            }
        }
    }

    /// Buckets a delta at `maturity` onto `grid`.
    pub fn add_delta(&mut self, grid: &TenorGrid, maturity: f64, value: &RandomVariable) {
        for (fixing, weight) in allocate_delta(grid, maturity) {
            self.add_value(fixing, fixing, &(value * weight));
        }
    }

    /// Buckets a gamma at `(maturity1, maturity2)` onto `grid`.
    pub fn add_gamma(
        &mut self,
        grid: &TenorGrid,
        maturity1: f64,
        maturity2: f64,
        value: &RandomVariable,
    ) {
        for (row, col, weight) in allocate_gamma(grid, maturity1, maturity2) {
            self.add_value(row, col, &(value * weight));
        }
    }

    /// Value at `(row, col)`; only upper-triangular cells are stored.
    pub fn get(&self, row: f64, col: f64) -> Option<&RandomVariable> {
        self.values
            .get(&Maturity::new(row))?
            .get(&Maturity::new(col))
    }

    /// Diagonal entry at `fixing`.
    pub fn diagonal(&self, fixing: f64) -> Option<&RandomVariable> {
        self.get(fixing, fixing)
    }

    /// Row fixings in ascending order.
    pub fn row_fixings(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.keys().map(|m| m.years())
    }

    /// Every fixing appearing as a row or a column.
    pub fn fixings(&self) -> Vec<f64> {
        self.values
            .iter()
            .flat_map(|(row, cols)| std::iter::once(*row).chain(cols.keys().copied()))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(Maturity::years)
            .collect()
    }

    /// Cells of `row` as `(col, value)` in ascending column order.
    pub fn row(&self, row: f64) -> impl Iterator<Item = (f64, &RandomVariable)> {
        self.values
            .get(&Maturity::new(row))
            .into_iter()
            .flat_map(|cols| cols.iter().map(|(c, v)| (c.years(), v)))
    }

    /// All cells as `(row, col, value)`.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64, &RandomVariable)> {
        self.values.iter().flat_map(|(row, cols)| {
            cols.iter()
                .map(move |(col, value)| (row.years(), col.years(), value))
        })
    }

    /// Number of stored cells.
    pub fn len(&self) -> usize {
        self.values.values().map(BTreeMap::len).sum()
    }

    /// Returns `true` without cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum over all cells.
    pub fn total(&self) -> RandomVariable {
        self.iter().map(|(_, _, v)| v).sum()
    }
}
