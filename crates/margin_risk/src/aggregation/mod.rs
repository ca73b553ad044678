//! PAIRS initial margin aggregation.
//!
//! [`PairsInitialMargin`] ties the pieces together: sensitivities are
//! bucketed onto the risk grid, scenario shifts are built per bucket, the
//! scenario dates are ranked by Taylor PnL and the worst
//! [`FULL_REVALUATIONS`] dates are revalued in full. The revalued losses
//! feed expected shortfall (base) and value-at-risk (floor); the PAIRS
//! margin is the larger of the two.

mod config;
mod container;
mod error;
mod losses;
mod pairs;

pub use config::{MarginConfig, MarginKind};
pub use container::{InitialMarginContainer, SimulationArtifacts};
pub use error::MarginError;
pub use losses::{
    aggregate_losses, expected_shortfall, taylor_pnl, value_at_risk, DECIMAL_TO_BP,
    FULL_REVALUATIONS,
};
pub use pairs::{PairsInitialMargin, PairsMargin};
