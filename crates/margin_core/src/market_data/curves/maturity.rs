//! Totally ordered maturity key.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Time to maturity in years, usable as a map key.
///
/// Ordering follows `f64::total_cmp`; `-0.0` is normalized to `0.0` so
/// both spellings of zero address the same entry.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Maturity(f64);

impl Maturity {
    /// Wraps a year fraction.
    #[inline]
    pub fn new(years: f64) -> Self {
        Maturity(if years == 0.0 { 0.0 } else { years })
    }

    /// Year fraction.
    #[inline]
    pub fn years(self) -> f64 {
        self.0
    }
}

impl From<f64> for Maturity {
    fn from(years: f64) -> Self {
        Maturity::new(years)
    }
}

impl PartialEq for Maturity {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Maturity {}

impl PartialOrd for Maturity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Maturity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for Maturity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl fmt::Display for Maturity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_negative_zero_is_zero() {
        assert_eq!(Maturity::new(-0.0), Maturity::new(0.0));
        let keys: HashSet<Maturity> = [Maturity::new(-0.0), Maturity::new(0.0)].into();
        assert_eq!(keys.len(), 1);
    }

    #[test]
    fn test_ordering() {
        let mut keys = vec![Maturity::new(2.0), Maturity::new(0.5), Maturity::new(1.0)];
        keys.sort();
        let years: Vec<f64> = keys.into_iter().map(Maturity::years).collect();
        assert_eq!(years, vec![0.5, 1.0, 2.0]);
    }
}
