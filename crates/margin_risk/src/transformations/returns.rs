//! Lagged rate returns.

use std::fmt;
use std::str::FromStr;

use margin_core::stochastic::{RandomVariable, RandomVariableSeries};

use super::error::TransformationError;

/// How a return over the lag is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReturnType {
    /// `r[t + L] - r[t]`
    #[default]
    Absolute,
    /// `r[t + L] / r[t] - 1`
    Relative,
}

impl FromStr for ReturnType {
    type Err = TransformationError;

    fn from_str(s: &str) -> Result<Self, TransformationError> {
        match s.trim().to_lowercase().as_str() {
            "absolute" | "abs" => Ok(ReturnType::Absolute),
            "relative" | "rel" => Ok(ReturnType::Relative),
            _ => Err(TransformationError::UnknownReturnType(s.to_string())),
        }
    }
}

impl fmt::Display for ReturnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnType::Absolute => write!(f, "ABSOLUTE"),
            ReturnType::Relative => write!(f, "RELATIVE"),
        }
    }
}

/// Returns over `lag` observations, keyed by the earlier date.
pub(crate) fn returns(
    rates: &RandomVariableSeries,
    lag: usize,
    return_type: ReturnType,
) -> Result<RandomVariableSeries, TransformationError> {
    if rates.len() <= lag {
        return Err(TransformationError::InsufficientData {
            id: "Returns",
            required: lag + 1,
            available: rates.len(),
        });
    }
    let entries: Vec<_> = rates.iter().collect();
    Ok(entries
        .iter()
        .zip(entries.iter().skip(lag))
        .map(|((date, earlier), (_, later))| {
            let value: RandomVariable = match return_type {
                ReturnType::Absolute => *later - *earlier,
                ReturnType::Relative => *later / *earlier - 1.0,
            };
            (**date, value)
        })
        .collect())
}
