//! # adapter_loader
//!
//! Flat file loaders for the margin engine.
//!
//! - [`HistoryLoader`] reads a zero-curve history laid out with one column
//!   per observation date and one row per maturity.
//! - [`TradeLoader`] reads vanilla swap lists, one trade per row.
//!
//! ## Architecture Position
//!
//! Part of the **A**dapter layer. Depends only on `margin_core` (for types)
//! and `margin_models` (for the history and product types it builds).
//!
//! ## Example
//!
//! ```rust,ignore
//! use adapter_loader::{HistoryLoader, TradeLoader};
//!
//! let history = HistoryLoader::load("data/history.csv")?;
//! let portfolios = TradeLoader::load_portfolios("data/trades.csv")?;
//! ```

#![deny(missing_docs)]

mod error;
mod history;
mod trades;

pub use error::LoaderError;
pub use history::HistoryLoader;
pub use trades::{TradeLoader, TradeRecord};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{HistoryLoader, LoaderError, TradeLoader, TradeRecord};
}
