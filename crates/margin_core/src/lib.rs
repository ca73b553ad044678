//! # margin_core: Numerical Foundation for Initial Margin
//!
//! ## Layer 1 (Foundation) Role
//!
//! margin_core is the bottom layer of the margin workspace, providing:
//! - Path-wise random variables and date-keyed series (`stochastic`)
//! - Zero-rate curves with memoized interpolation (`market_data::curves`)
//! - Standardized tenor grids (`market_data::tenor_grid`)
//! - Dates, ACT/365 model times, day count and business day conventions (`types::time`)
//! - Bracketing helpers for linear schemes (`math`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other margin_* crates:
//! - num-traits: `Zero` for path-wise accumulation
//! - chrono: Date arithmetic
//! - parking_lot: Interpolation cache locks
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use margin_core::market_data::{Curve, GridType, TenorGrid};
//! use margin_core::stochastic::RandomVariable;
//! use margin_core::types::{year_fraction, Date};
//!
//! let reference = Date::from_ymd(2024, 1, 2).unwrap();
//! let payment = Date::from_ymd(2026, 1, 2).unwrap();
//! let tau = year_fraction(reference, payment);
//!
//! let mut curve = Curve::new();
//! curve.add_rate(1.0, RandomVariable::from_paths(vec![0.020, 0.022]));
//! curve.add_rate(5.0, RandomVariable::from_paths(vec![0.030, 0.034]));
//! let rate = curve.rate(tau, None).unwrap();
//! assert_eq!(rate.number_of_paths(), 2);
//!
//! let grid = TenorGrid::standard(GridType::InitialMarginRisk);
//! let (lo, hi) = grid.bracket(tau);
//! assert!(lo <= tau && tau <= hi);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): Enable serialisation for dates, currencies and random variables

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod market_data;
pub mod math;
pub mod stochastic;
pub mod types;
