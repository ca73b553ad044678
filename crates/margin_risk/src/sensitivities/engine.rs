//! Portfolio sensitivity matrices on a tenor grid.

use std::fmt;
use std::str::FromStr;

use margin_core::market_data::{GridType, TenorGrid};
use margin_core::stochastic::RandomVariable;
use margin_core::types::Date;
use margin_models::products::{Portfolio, SwapLeg};
use margin_models::zero_rate::ZeroRateModel;
use tracing::debug;

use super::component::{SensitivityComponent, SensitivityComponents};
use super::error::SensitivityError;
use super::matrix::SensitivityMatrix;

/// Which discount factors are bumped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SensitivityType {
    /// Payment discount factors only.
    Discount,
    /// Index period discount factors only.
    Forward,
    /// Both.
    #[default]
    ForwardAndDiscount,
}

impl SensitivityType {
    fn includes_discount(self) -> bool {
        matches!(self, SensitivityType::Discount | SensitivityType::ForwardAndDiscount)
    }

    fn includes_forward(self) -> bool {
        matches!(self, SensitivityType::Forward | SensitivityType::ForwardAndDiscount)
    }
}

impl FromStr for SensitivityType {
    type Err = SensitivityError;

    fn from_str(s: &str) -> Result<Self, SensitivityError> {
        match s.to_lowercase().replace(['_', '-', ' '], "").as_str() {
            "discount" => Ok(SensitivityType::Discount),
            "forward" => Ok(SensitivityType::Forward),
            "forwardanddiscount" | "all" => Ok(SensitivityType::ForwardAndDiscount),
            _ => Err(SensitivityError::UnknownType(s.to_string())),
        }
    }
}

impl fmt::Display for SensitivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensitivityType::Discount => write!(f, "Discount"),
            SensitivityType::Forward => write!(f, "Forward"),
            SensitivityType::ForwardAndDiscount => write!(f, "ForwardAndDiscount"),
        }
    }
}

/// Derivative order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SensitivityOrder {
    /// First order.
    Delta,
    /// Second order.
    Gamma,
}

impl SensitivityOrder {
    /// 1 for delta, 2 for gamma.
    pub fn order(self) -> i32 {
        match self {
            SensitivityOrder::Delta => 1,
            SensitivityOrder::Gamma => 2,
        }
    }
}

impl FromStr for SensitivityOrder {
    type Err = SensitivityError;

    fn from_str(s: &str) -> Result<Self, SensitivityError> {
        match s.trim().to_lowercase().as_str() {
            "delta" | "1" => Ok(SensitivityOrder::Delta),
            "gamma" | "2" => Ok(SensitivityOrder::Gamma),
            _ => Err(SensitivityError::UnknownOrder(s.to_string())),
        }
    }
}

impl fmt::Display for SensitivityOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensitivityOrder::Delta => write!(f, "Delta"),
            SensitivityOrder::Gamma => write!(f, "Gamma"),
        }
    }
}

/// Delta and gamma of a set of swap legs, bucketed onto a tenor grid.
///
/// Each leg keeps its own component cache, so repeated requests for the
/// same evaluation date reuse the discount factor snapshots.
#[derive(Debug)]
pub struct SensitivityEngine {
    grid: TenorGrid,
    legs: Vec<SensitivityComponents>,
}

impl SensitivityEngine {
    /// Engine over the legs of `portfolio` on the risk grid.
    pub fn new(portfolio: &Portfolio) -> Self {
        Self::from_legs(portfolio.legs().iter().cloned())
    }

    /// Engine over arbitrary legs on the risk grid.
    pub fn from_legs(legs: impl IntoIterator<Item = SwapLeg>) -> Self {
        Self {
            grid: TenorGrid::standard(GridType::InitialMarginRisk),
            legs: legs.into_iter().map(SensitivityComponents::new).collect(),
        }
    }

    /// Replaces the tenor grid.
    pub fn with_grid(mut self, grid: TenorGrid) -> Self {
        self.grid = grid;
        self
    }

    /// Tenor grid.
    pub fn grid(&self) -> &TenorGrid {
        &self.grid
    }

    /// Legs with their component caches.
    pub fn legs(&self) -> &[SensitivityComponents] {
        &self.legs
    }

    /// Bucketed sensitivities of every cash flow paid after `evaluation`.
    pub fn sensitivity_matrix(
        &self,
        evaluation: Date,
        model: &ZeroRateModel,
        sensitivity_type: SensitivityType,
        order: SensitivityOrder,
    ) -> Result<SensitivityMatrix, SensitivityError> {
        let mut matrix = SensitivityMatrix::new();
        for leg in &self.legs {
            for component in leg.components(evaluation, model)?.iter() {
                self.accumulate(&mut matrix, component, sensitivity_type, order);
            }
        }
        debug!(%evaluation, %sensitivity_type, %order, cells = matrix.len(), "sensitivity matrix");
        Ok(matrix)
    }

    /// First-order matrix of discount and forward sensitivities.
    pub fn delta(
        &self,
        evaluation: Date,
        model: &ZeroRateModel,
    ) -> Result<SensitivityMatrix, SensitivityError> {
        self.sensitivity_matrix(
            evaluation,
            model,
            SensitivityType::ForwardAndDiscount,
            SensitivityOrder::Delta,
        )
    }

    /// Second-order matrix of discount and forward sensitivities.
    pub fn gamma(
        &self,
        evaluation: Date,
        model: &ZeroRateModel,
    ) -> Result<SensitivityMatrix, SensitivityError> {
        self.sensitivity_matrix(
            evaluation,
            model,
            SensitivityType::ForwardAndDiscount,
            SensitivityOrder::Gamma,
        )
    }

    fn accumulate(
        &self,
        matrix: &mut SensitivityMatrix,
        component: &SensitivityComponent,
        sensitivity_type: SensitivityType,
        order: SensitivityOrder,
    ) {
        let n = order.order();
        let grid = &self.grid;
        let place =
            |matrix: &mut SensitivityMatrix, m1: f64, m2: f64, value: &RandomVariable| match order {
                SensitivityOrder::Delta => matrix.add_delta(grid, m1, value),
                SensitivityOrder::Gamma => matrix.add_gamma(grid, m1, m2, value),
            };

        if sensitivity_type.includes_discount() {
            let tau = component.payment().tau();
            place(matrix, tau, tau, &component.discount_sensitivity(n));
        }
        if !sensitivity_type.includes_forward() {
            return;
        }
        if let Some(forward) = component.forward() {
            let (tau_s, tau_e) = (forward.start().tau(), forward.end().tau());
            if let Some(start) = component.forward_start_sensitivity(n) {
                place(matrix, tau_s, tau_s, &start);
            }
            if let Some(end) = component.forward_end_sensitivity(n) {
                place(matrix, tau_e, tau_e, &end);
            }
            if order == SensitivityOrder::Gamma {
                if let Some(cross) = component.forward_cross_gamma() {
                    matrix.add_gamma(grid, tau_s, tau_e, &cross);
                }
            }
        }
    }
}
