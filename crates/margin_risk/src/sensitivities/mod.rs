//! Tenor-bucketed delta and gamma of swap portfolios.
//!
//! Every coupon paid after the evaluation date contributes:
//! - a discount sensitivity at its payment time, and
//! - while its floating index is unfixed, forward sensitivities at the
//!   index period start and end, plus a cross gamma between the two.
//!
//! Sensitivities are expressed per basis point and bucketed onto the
//! 37-point risk grid in a [`SensitivityMatrix`].

mod allocation;
mod component;
mod discount_factor;
mod engine;
mod error;
mod matrix;

pub use allocation::{allocate_delta, allocate_gamma};
pub use component::{ForwardPeriod, SensitivityComponent, SensitivityComponents, SHIFT};
pub use discount_factor::DiscountFactor;
pub use engine::{SensitivityEngine, SensitivityOrder, SensitivityType};
pub use error::SensitivityError;
pub use matrix::SensitivityMatrix;
