//! Swap products and portfolios valued on a [`ZeroRateModel`](crate::zero_rate::ZeroRateModel).
//!
//! - [`Index`]: fixed, floating and combined coupon indices
//! - [`CouponPeriod`], [`SwapLeg`], [`Swap`]: cash flows and their valuation
//! - [`Portfolio`], [`GlobalPortfolio`]: legs grouped by currency and curve

mod error;
mod index;
mod leg;
mod period;
mod portfolio;
mod swap;

pub use error::ProductError;
pub use index::Index;
pub use leg::SwapLeg;
pub use period::CouponPeriod;
pub use portfolio::{CurveName, GlobalPortfolio, Portfolio};
pub use swap::Swap;
