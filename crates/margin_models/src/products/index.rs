//! Coupon indices.

use margin_core::market_data::Curve;
use margin_core::stochastic::RandomVariable;
use margin_core::types::{year_fraction, Date};

use crate::zero_rate::{ZeroRateError, ZeroRateModel};

/// Rate paid by a coupon period.
///
/// # Examples
///
/// ```
/// use margin_models::products::Index;
///
/// let index = Index::floating(0.0, 0.5).with_spread(0.001);
/// assert_eq!(index.floating_part(), Some((1.0, 0.0, 0.5)));
/// assert!(Index::fixed(0.02).floating_part().is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Index {
    /// Constant coupon.
    Fixed {
        /// Coupon rate
        coupon: f64,
    },
    /// Simply compounded forward rate starting `period_start_offset` after
    /// the fixing and accruing over `period_length` years.
    Floating {
        /// Offset from the fixing to the index period start, in years
        period_start_offset: f64,
        /// Index period length in years
        period_length: f64,
    },
    /// `scaling1 · index1 + scaling2 · index2`
    LinearCombination {
        /// Weight of the first index
        scaling1: f64,
        /// First index
        index1: Box<Index>,
        /// Weight of the second index
        scaling2: f64,
        /// Second index
        index2: Box<Index>,
    },
}

impl Index {
    /// Fixed coupon index.
    pub fn fixed(coupon: f64) -> Self {
        Index::Fixed { coupon }
    }

    /// Forward-rate index.
    pub fn floating(period_start_offset: f64, period_length: f64) -> Self {
        Index::Floating {
            period_start_offset,
            period_length,
        }
    }

    /// Adds a constant spread; a zero spread leaves the index unchanged.
    pub fn with_spread(self, spread: f64) -> Self {
        if spread == 0.0 {
            return self;
        }
        Index::LinearCombination {
            scaling1: 1.0,
            index1: Box::new(self),
            scaling2: 1.0,
            index2: Box::new(Index::fixed(spread)),
        }
    }

    /// Scaling, start offset and length of the first floating component.
    pub fn floating_part(&self) -> Option<(f64, f64, f64)> {
        match self {
            Index::Fixed { .. } => None,
            Index::Floating {
                period_start_offset,
                period_length,
            } => Some((1.0, *period_start_offset, *period_length)),
            Index::LinearCombination {
                scaling1,
                index1,
                scaling2,
                index2,
            } => index1
                .floating_part()
                .map(|(s, o, l)| (s * scaling1, o, l))
                .or_else(|| index2.floating_part().map(|(s, o, l)| (s * scaling2, o, l))),
        }
    }

    /// Index value seen from `evaluation` for a period fixing on `fixing`.
    ///
    /// A floating index that has already fixed reads the forward rate from
    /// the curve of its fixing date, unshifted. Otherwise the forward rate
    /// is read from the evaluation date's curve with the shift applied.
    pub fn value(
        &self,
        evaluation: Date,
        fixing: Date,
        model: &ZeroRateModel,
        shift: Option<&Curve>,
        path: Option<usize>,
    ) -> Result<RandomVariable, ZeroRateError> {
        match self {
            Index::Fixed { coupon } => Ok(RandomVariable::scalar(*coupon)),
            Index::Floating {
                period_start_offset,
                period_length,
            } => {
                let (off, len) = (*period_start_offset, *period_length);
                if fixing <= evaluation {
                    model.forward_rate(fixing, off, off + len, None, path)
                } else {
                    let start = year_fraction(evaluation, fixing) + off;
                    model.forward_rate(evaluation, start, start + len, shift, path)
                }
            }
            Index::LinearCombination {
                scaling1,
                index1,
                scaling2,
                index2,
            } => {
                let first = index1.value(evaluation, fixing, model, shift, path)?;
                let second = index2.value(evaluation, fixing, model, shift, path)?;
                Ok(first * *scaling1 + second * *scaling2)
            }
        }
    }
}
