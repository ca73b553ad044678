//! Standardized tenor grids.
//!
//! Risk sensitivities are bucketed onto the 37-point initial margin risk
//! grid, running from overnight to sixty years. The 4-point spread grid
//! samples basis scenarios.

use std::fmt;
use std::str::FromStr;

use super::error::GridError;
use crate::math::{bracket, Bracket};
use crate::types::DAYS_PER_YEAR;

/// Risk grid points in calendar days.
pub const RISK_GRID_DAYS: [u32; 37] = [
    1, 7, 14, 21, 30, 60, 91, 121, 152, 182, 212, 243, 273, 304, 334, 365, 456, 547, 638, 730,
    1095, 1460, 1825, 2190, 2555, 2920, 3285, 3650, 4380, 5475, 7300, 9125, 10950, 12775, 14600,
    18250, 21900,
];

/// Risk grid tenor names, aligned with [`RISK_GRID_DAYS`].
pub const RISK_GRID_NAMES: [&str; 37] = [
    "O/N", "1w", "2w", "3w", "1m", "2m", "3m", "4m", "5m", "6m", "7m", "8m", "9m", "10m", "11m",
    "1y", "15m", "18m", "21m", "2y", "3y", "4y", "5y", "6y", "7y", "8y", "9y", "10y", "12y", "15y",
    "20y", "25y", "30y", "35y", "40y", "50y", "60y",
];

/// Spread grid points in calendar days.
pub const SPREAD_GRID_DAYS: [u32; 4] = [730, 1825, 3650, 10950];

/// Spread grid tenor names, aligned with [`SPREAD_GRID_DAYS`].
pub const SPREAD_GRID_NAMES: [&str; 4] = ["2y", "5y", "10y", "30y"];

/// Standard grid selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GridType {
    /// 37-point risk grid.
    #[default]
    InitialMarginRisk,
    /// 4-point spread grid.
    InitialMarginSpread,
}

impl FromStr for GridType {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, GridError> {
        match s.to_lowercase().replace(['_', '-', ' '], "").as_str() {
            "initialmarginrisk" | "risk" => Ok(GridType::InitialMarginRisk),
            "initialmarginspread" | "spread" => Ok(GridType::InitialMarginSpread),
            _ => Err(GridError::UnknownGridType(s.to_string())),
        }
    }
}

impl fmt::Display for GridType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridType::InitialMarginRisk => write!(f, "InitialMarginRisk"),
            GridType::InitialMarginSpread => write!(f, "InitialMarginSpread"),
        }
    }
}

/// Immutable ordered list of `(fixing, name)` pairs.
///
/// # Example
///
/// ```
/// use margin_core::market_data::{GridType, TenorGrid};
///
/// let grid = TenorGrid::standard(GridType::InitialMarginRisk);
/// assert_eq!(grid.len(), 37);
/// assert_eq!(grid.name_of(grid.fixings()[0]), Some("O/N"));
///
/// let (lo, hi) = grid.bracket(0.75);
/// assert_eq!((lo * 365.0).round(), 273.0);
/// assert_eq!((hi * 365.0).round(), 304.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TenorGrid {
    fixings: Vec<f64>,
    names: Vec<String>,
}

impl TenorGrid {
    /// One of the two standard grids.
    pub fn standard(grid_type: GridType) -> Self {
        match grid_type {
            GridType::InitialMarginRisk => Self::from_days(&RISK_GRID_DAYS, &RISK_GRID_NAMES),
            GridType::InitialMarginSpread => {
                Self::from_days(&SPREAD_GRID_DAYS, &SPREAD_GRID_NAMES)
            }
        }
    }

    fn from_days(days: &[u32], names: &[&str]) -> Self {
        Self {
            fixings: days.iter().map(|&d| d as f64 / DAYS_PER_YEAR).collect(),
            names: names.iter().map(|n| n.to_string()).collect(),
        }
    }

    /// Fixings in years, ascending.
    pub fn fixings(&self) -> &[f64] {
        &self.fixings
    }

    /// Tenor names aligned with [`fixings`](Self::fixings).
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of grid points.
    pub fn len(&self) -> usize {
        self.fixings.len()
    }

    /// Always `false` for the standard grids.
    pub fn is_empty(&self) -> bool {
        self.fixings.is_empty()
    }

    /// Name of the grid point at exactly `fixing`.
    pub fn name_of(&self, fixing: f64) -> Option<&str> {
        self.fixings
            .iter()
            .position(|&f| f == fixing)
            .map(|i| self.names[i].as_str())
    }

    /// Fixing of the named grid point.
    pub fn fixing_of(&self, name: &str) -> Result<f64, GridError> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.fixings[i])
            .ok_or_else(|| GridError::UnknownTenor(name.to_string()))
    }

    /// Returns `true` if `fixing` is a grid point.
    pub fn contains_fixing(&self, fixing: f64) -> bool {
        self.fixings.contains(&fixing)
    }

    /// Locates `maturity` between two grid points.
    pub fn locate(&self, maturity: f64) -> Bracket {
        bracket(&self.fixings, maturity).unwrap_or(Bracket {
            lower: 0,
            upper: 0,
            weight: 0.0,
        })
    }

    /// Nearest grid fixings `lo ≤ maturity ≤ hi`, clamped to the grid ends.
    pub fn bracket(&self, maturity: f64) -> (f64, f64) {
        let b = self.locate(maturity);
        (self.fixings[b.lower], self.fixings[b.upper])
    }
}

impl Default for TenorGrid {
    fn default() -> Self {
        Self::standard(GridType::InitialMarginRisk)
    }
}
