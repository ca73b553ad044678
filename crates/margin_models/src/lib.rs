//! # Margin Models (L2: Business Logic)
//!
//! Rate models and swap products consumed by the margin engine.
//!
//! This crate provides:
//! - Path simulation interface and a Hull-White Monte Carlo implementation
//! - Zero-rate model blending observed curve history with simulated curves
//! - Coupon schedules, swap legs, swaps and portfolios
//!
//! ## Design Principles
//!
//! - **Trait-object simulation**: the zero-rate model holds any
//!   [`PathSimulation`](simulation::PathSimulation) behind an `Arc`
//! - **Explicit caches**: simulated curves are created lazily under a
//!   lock, never by hidden mutation
//! - **Enum-based indices** for static dispatch of coupon rates

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod products;
pub mod schedules;
pub mod simulation;
pub mod zero_rate;
