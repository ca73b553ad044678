//! Path-wise random variables.
//!
//! A [`RandomVariable`] holds one realization per Monte Carlo path, or a
//! single value that broadcasts across every path. All arithmetic is
//! elementwise and returns a new value; nothing is mutated in place.
//!
//! # Example
//!
//! ```
//! use margin_core::stochastic::RandomVariable;
//!
//! let rates = RandomVariable::from_paths(vec![0.01, 0.02, 0.03]);
//! let shifted = &rates + 0.001;
//! let scaled = &shifted * &RandomVariable::scalar(2.0);
//!
//! assert_eq!(scaled.number_of_paths(), 3);
//! assert!((scaled.get(1) - 0.042).abs() < 1e-15);
//! assert!((rates.average() - 0.02).abs() < 1e-15);
//! ```

use num_traits::Zero;
use std::iter::Sum;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Realizations of a quantity across simulation paths.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RandomVariable {
    realizations: Vec<f64>,
}

impl RandomVariable {
    /// Creates a deterministic value that broadcasts across all paths.
    #[inline]
    pub fn scalar(value: f64) -> Self {
        Self {
            realizations: vec![value],
        }
    }

    /// Creates a random variable from per-path realizations.
    ///
    /// A single realization is treated as a scalar.
    ///
    /// # Panics
    ///
    /// Panics if `realizations` is empty.
    pub fn from_paths(realizations: Vec<f64>) -> Self {
        assert!(
            !realizations.is_empty(),
            "a random variable needs at least one realization"
        );
        Self { realizations }
    }

    /// Returns `true` if the value is deterministic.
    #[inline]
    pub fn is_scalar(&self) -> bool {
        self.realizations.len() == 1
    }

    /// Number of stored realizations (1 for scalars).
    #[inline]
    pub fn number_of_paths(&self) -> usize {
        self.realizations.len()
    }

    /// Realization on `path`; scalars return their value for every path.
    ///
    /// # Panics
    ///
    /// Panics if `path` is out of range for a non-scalar value.
    #[inline]
    pub fn get(&self, path: usize) -> f64 {
        if self.is_scalar() {
            self.realizations[0]
        } else {
            self.realizations[path]
        }
    }

    /// Raw realizations.
    #[inline]
    pub fn realizations(&self) -> &[f64] {
        &self.realizations
    }

    /// Restricts the value to one path, or keeps all paths for `None`.
    pub fn at_path(&self, path: Option<usize>) -> Self {
        match path {
            Some(p) => Self::scalar(self.get(p)),
            None => self.clone(),
        }
    }

    /// Value used for ranking: the realization on `path`, or the
    /// cross-path average for `None`.
    #[inline]
    pub fn ranking_value(&self, path: Option<usize>) -> f64 {
        match path {
            Some(p) => self.get(p),
            None => self.average(),
        }
    }

    /// Cross-path mean.
    pub fn average(&self) -> f64 {
        self.realizations.iter().sum::<f64>() / self.realizations.len() as f64
    }

    /// Applies `f` to every realization.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            realizations: self.realizations.iter().map(|&x| f(x)).collect(),
        }
    }

    /// Combines two values elementwise, broadcasting scalars.
    ///
    /// # Panics
    ///
    /// Panics if both operands are path-wise with different path counts.
    pub fn zip_with(&self, other: &Self, f: impl Fn(f64, f64) -> f64) -> Self {
        let realizations = match (self.is_scalar(), other.is_scalar()) {
            (true, true) => vec![f(self.realizations[0], other.realizations[0])],
            (true, false) => {
                let a = self.realizations[0];
                other.realizations.iter().map(|&b| f(a, b)).collect()
            }
            (false, true) => {
                let b = other.realizations[0];
                self.realizations.iter().map(|&a| f(a, b)).collect()
            }
            (false, false) => {
                assert_eq!(
                    self.realizations.len(),
                    other.realizations.len(),
                    "random variables must share the number of paths"
                );
                self.realizations
                    .iter()
                    .zip(&other.realizations)
                    .map(|(&a, &b)| f(a, b))
                    .collect()
            }
        };
        Self { realizations }
    }

    /// Natural logarithm.
    pub fn ln(&self) -> Self {
        self.map(f64::ln)
    }

    /// Exponential.
    pub fn exp(&self) -> Self {
        self.map(f64::exp)
    }

    /// Square root.
    pub fn sqrt(&self) -> Self {
        self.map(f64::sqrt)
    }

    /// Square.
    pub fn squared(&self) -> Self {
        self.map(|x| x * x)
    }

    /// Absolute value.
    pub fn abs(&self) -> Self {
        self.map(f64::abs)
    }

    /// Reciprocal.
    pub fn invert(&self) -> Self {
        self.map(|x| 1.0 / x)
    }

    /// Elementwise maximum.
    pub fn max(&self, other: &Self) -> Self {
        self.zip_with(other, f64::max)
    }

    /// The operand with the larger cross-path average (`self` on ties).
    pub fn max_by_average(&self, other: &Self) -> Self {
        if other.average() > self.average() {
            other.clone()
        } else {
            self.clone()
        }
    }
}

impl From<f64> for RandomVariable {
    fn from(value: f64) -> Self {
        Self::scalar(value)
    }
}

impl Zero for RandomVariable {
    fn zero() -> Self {
        Self::scalar(0.0)
    }

    fn is_zero(&self) -> bool {
        self.realizations.iter().all(|&x| x == 0.0)
    }
}

macro_rules! impl_binary_op {
    ($op_trait:ident, $method:ident, $op:tt) => {
        impl $op_trait<&RandomVariable> for &RandomVariable {
            type Output = RandomVariable;

            fn $method(self, rhs: &RandomVariable) -> RandomVariable {
                self.zip_with(rhs, |a, b| a $op b)
            }
        }

        impl $op_trait<RandomVariable> for RandomVariable {
            type Output = RandomVariable;

            fn $method(self, rhs: RandomVariable) -> RandomVariable {
                (&self).$method(&rhs)
            }
        }

        impl $op_trait<&RandomVariable> for RandomVariable {
            type Output = RandomVariable;

            fn $method(self, rhs: &RandomVariable) -> RandomVariable {
                (&self).$method(rhs)
            }
        }

        impl $op_trait<RandomVariable> for &RandomVariable {
            type Output = RandomVariable;

            fn $method(self, rhs: RandomVariable) -> RandomVariable {
                self.$method(&rhs)
            }
        }

        impl $op_trait<f64> for &RandomVariable {
            type Output = RandomVariable;

            fn $method(self, rhs: f64) -> RandomVariable {
                self.map(|a| a $op rhs)
            }
        }

        impl $op_trait<f64> for RandomVariable {
            type Output = RandomVariable;

            fn $method(self, rhs: f64) -> RandomVariable {
                (&self).$method(rhs)
            }
        }
    };
}

impl_binary_op!(Add, add, +);
impl_binary_op!(Sub, sub, -);
impl_binary_op!(Mul, mul, *);
impl_binary_op!(Div, div, /);

impl Neg for &RandomVariable {
    type Output = RandomVariable;

    fn neg(self) -> RandomVariable {
        self.map(|x| -x)
    }
}

impl Neg for RandomVariable {
    type Output = RandomVariable;

    fn neg(self) -> RandomVariable {
        -&self
    }
}

impl Sum for RandomVariable {
    fn sum<I: Iterator<Item = RandomVariable>>(iter: I) -> Self {
        iter.fold(RandomVariable::zero(), |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a RandomVariable> for RandomVariable {
    fn sum<I: Iterator<Item = &'a RandomVariable>>(iter: I) -> Self {
        iter.fold(RandomVariable::zero(), |acc, x| acc + x)
    }
}
