//! Numerical helpers shared by curves, tenor grids and model time grids.

pub mod interpolation;

pub use interpolation::{bracket, Bracket};
