//! Date-keyed series of random variables.
//!
//! [`RandomVariableSeries`] is the unit of exchange for historical rates,
//! transformed scenario shifts and scenario PnL.

use std::cmp::Ordering;
use std::collections::btree_map;
use std::collections::{BTreeMap, BinaryHeap};

use super::random_variable::RandomVariable;
use crate::types::{Date, SeriesError};

/// Map from date to a path-wise value, iterated in date order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RandomVariableSeries {
    values: BTreeMap<Date, RandomVariable>,
}

impl RandomVariableSeries {
    /// Creates an empty series.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the value at `date`.
    pub fn insert(&mut self, date: Date, value: RandomVariable) -> Option<RandomVariable> {
        self.values.insert(date, value)
    }

    /// Copies every entry of `other` into this series, overwriting clashes.
    pub fn extend_from(&mut self, other: &RandomVariableSeries) {
        for (date, value) in other.iter() {
            self.values.insert(*date, value.clone());
        }
    }

    /// Value at `date`.
    pub fn get(&self, date: &Date) -> Option<&RandomVariable> {
        self.values.get(date)
    }

    /// Value at `date`, or `SeriesError::MissingDate`.
    pub fn value_at(&self, date: Date) -> Result<&RandomVariable, SeriesError> {
        self.values.get(&date).ok_or(SeriesError::MissingDate(date))
    }

    /// Number of dates.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the series has no dates.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Dates in ascending order.
    pub fn dates(&self) -> impl Iterator<Item = &Date> {
        self.values.keys()
    }

    /// Values in date order.
    pub fn values(&self) -> impl Iterator<Item = &RandomVariable> {
        self.values.values()
    }

    /// `(date, value)` pairs in date order.
    pub fn iter(&self) -> btree_map::Iter<'_, Date, RandomVariable> {
        self.values.iter()
    }

    /// Earliest entry.
    pub fn first(&self) -> Option<(&Date, &RandomVariable)> {
        self.values.first_key_value()
    }

    /// Most recent entry.
    pub fn last(&self) -> Option<(&Date, &RandomVariable)> {
        self.values.last_key_value()
    }

    /// Entries with `start <= date <= end`.
    pub fn between(&self, start: Date, end: Date) -> RandomVariableSeries {
        if start > end {
            return RandomVariableSeries::new();
        }
        self.values
            .range(start..=end)
            .map(|(d, v)| (*d, v.clone()))
            .collect()
    }

    /// Adds `other` elementwise, date by date.
    ///
    /// An empty series takes over the entries of `other`; otherwise both
    /// series must hold exactly the same dates.
    ///
    /// # Examples
    ///
    /// ```
    /// use margin_core::stochastic::{RandomVariable, RandomVariableSeries};
    /// use margin_core::types::Date;
    ///
    /// let d = Date::from_ymd(2024, 1, 2).unwrap();
    /// let mut pnl = RandomVariableSeries::new();
    /// let mut term = RandomVariableSeries::new();
    /// term.insert(d, RandomVariable::scalar(1.5));
    ///
    /// pnl.sum(&term).unwrap();
    /// pnl.sum(&term).unwrap();
    /// assert_eq!(pnl.get(&d).unwrap().get(0), 3.0);
    /// ```
    pub fn sum(&mut self, other: &RandomVariableSeries) -> Result<(), SeriesError> {
        if self.values.is_empty() {
            self.values = other.values.clone();
            return Ok(());
        }
        if self.values.len() != other.values.len()
            || !self.values.keys().eq(other.values.keys())
        {
            return Err(SeriesError::MismatchedDates {
                left: self.values.len(),
                right: other.values.len(),
            });
        }
        for (value, addend) in self.values.values_mut().zip(other.values.values()) {
            *value = &*value + addend;
        }
        Ok(())
    }

    /// Dates of the `n` lowest values, worst first.
    ///
    /// Values are ranked by their realization on `path`, or by the
    /// cross-path average when `path` is `None`. Ties are broken by date
    /// so the worst `k` are always a prefix of the worst `k + 1`.
    pub fn n_lowest_dates(&self, n: usize, path: Option<usize>) -> Vec<Date> {
        if n == 0 {
            return Vec::new();
        }
        let mut heap: BinaryHeap<Ranked> = BinaryHeap::with_capacity(n + 1);
        for (date, value) in &self.values {
            heap.push(Ranked {
                value: value.ranking_value(path),
                date: *date,
            });
            if heap.len() > n {
                heap.pop();
            }
        }
        heap.into_sorted_vec().into_iter().map(|r| r.date).collect()
    }

    /// Scalar series of the realizations on one path.
    pub fn at_path(&self, path: Option<usize>) -> RandomVariableSeries {
        self.values
            .iter()
            .map(|(d, v)| (*d, v.at_path(path)))
            .collect()
    }

    /// Applies `f` to every value.
    pub fn map(&self, f: impl Fn(&RandomVariable) -> RandomVariable) -> RandomVariableSeries {
        self.values.iter().map(|(d, v)| (*d, f(v))).collect()
    }
}

impl FromIterator<(Date, RandomVariable)> for RandomVariableSeries {
    fn from_iter<I: IntoIterator<Item = (Date, RandomVariable)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a RandomVariableSeries {
    type Item = (&'a Date, &'a RandomVariable);
    type IntoIter = btree_map::Iter<'a, Date, RandomVariable>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// Heap entry ordered by value, then date.
#[derive(Debug, Clone, Copy)]
struct Ranked {
    value: f64,
    date: Date,
}

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked {}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value
            .total_cmp(&other.value)
            .then_with(|| self.date.cmp(&other.date))
    }
}
