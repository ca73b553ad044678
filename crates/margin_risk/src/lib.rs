//! # Margin Risk (L3: Application)
//!
//! PAIRS initial margin for single-currency interest rate swap portfolios,
//! and the margin valuation adjustment built on top of it.
//!
//! This crate provides:
//! - Scenario transformations: returns, EWMA dispersion, mid-volatility scaling
//! - Historical scenario generation per tenor point and per simulation
//! - Delta and gamma sensitivities bucketed onto the risk grid
//! - Taylor ranking, full revaluation and ES/VaR aggregation
//! - MVA over the margin profile
//! - Rayon-based parallel helpers
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            margin_risk (L3)             │
//! ├─────────────────────────────────────────┤
//! │  transformations/ - scenario pipeline   │
//! │  scenarios/       - windows, factory    │
//! │  sensitivities/   - delta, gamma        │
//! │  aggregation/     - PAIRS margin        │
//! │  mva/             - funding adjustment  │
//! │  parallel/        - Rayon utilities     │
//! └─────────────────────────────────────────┘
//!          ↓
//! ┌─────────────────────────────────────────┐
//! │           margin_models (L2)            │
//! │  Zero-rate model, Hull-White, swaps     │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use margin_core::types::{Currency, Date};
//! use margin_models::products::{CurveName, Portfolio, Swap};
//! use margin_models::schedules::{Frequency, ScheduleBuilder};
//! use margin_models::simulation::{HullWhiteParameters, HullWhiteSimulation, TimeDiscretization};
//! use margin_models::zero_rate::{ZeroCurveHistory, ZeroRateModel};
//! use margin_risk::{MarginConfig, MarginKind, PairsInitialMargin};
//!
//! let reference = Date::from_ymd(2024, 1, 2).unwrap();
//! let params = HullWhiteParameters::new(0.05, 0.01, 0.02).unwrap();
//! let grid = TimeDiscretization::uniform(0.0, 120, 0.25).unwrap();
//! let sim = HullWhiteSimulation::new(reference, params, grid, 100, 42).unwrap();
//! let history = ZeroCurveHistory::flat(
//!     Date::from_ymd(2014, 1, 1).unwrap(),
//!     Date::from_ymd(2023, 12, 29).unwrap(),
//!     &[1.0 / 365.0, 1.0, 10.0, 30.0],
//!     0.02,
//! )
//! .unwrap();
//! let model = ZeroRateModel::new(Arc::new(sim), history);
//!
//! let schedule = ScheduleBuilder::new()
//!     .start(reference)
//!     .end(Date::from_ymd(2034, 1, 2).unwrap())
//!     .frequency(Frequency::Annual)
//!     .build()
//!     .unwrap();
//! let swap = Swap::vanilla(Currency::EUR, CurveName::new("EUR"), 1e7, &schedule, 0.02, true).unwrap();
//! let mut portfolio = Portfolio::new(Currency::EUR, CurveName::new("EUR"));
//! portfolio.add_swap(swap).unwrap();
//!
//! let engine = PairsInitialMargin::new(&model, &portfolio, MarginConfig::default());
//! let im = engine.initial_margin(reference, MarginKind::Pairs).unwrap();
//! println!("IM = {:.2}", im.average());
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod aggregation;
pub mod mva;
pub mod parallel;
pub mod scenarios;
pub mod sensitivities;
pub mod transformations;

// Re-export commonly used types
pub use aggregation::{
    InitialMarginContainer, MarginConfig, MarginError, MarginKind, PairsInitialMargin, PairsMargin,
};
pub use mva::{MarginValuation, MarginValuationAdjustment, MvaError};
pub use parallel::{ParallelConfig, DEFAULT_PARALLEL_THRESHOLD};
pub use scenarios::{ScenarioFactory, ScenarioSettings, Simulation};
pub use sensitivities::{SensitivityEngine, SensitivityMatrix, SensitivityOrder, SensitivityType};
