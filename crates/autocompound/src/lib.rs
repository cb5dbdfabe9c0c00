//! # Sim-Autocompound: Auto-Compounding Decision Subsystem
//!
//! Decides when folding staking rewards back into principal is worth the
//! gas, and executes the fold.
//!
//! ## Components
//!
//! - `optimizer` - trailing-window gas price analysis ([`GasOptimizer`])
//! - `strategy` - pluggable compound policies ([`CompoundStrategy`])
//! - `monitor` - orchestration, execution, history ([`RewardMonitor`])
//!
//! The strategy decides economic viability, the optimizer decides timing;
//! the monitor consults both independently against live contract state.
//! All gas quantities at this layer are gwei; the ledger keeps wei for
//! gas-cost arithmetic.

#![warn(missing_docs)]

pub mod errors;
pub mod monitor;
pub mod optimizer;
pub mod strategy;

pub use errors::AutocompoundError;
pub use monitor::{CompoundEvent, CompoundStats, RewardMonitor};
pub use optimizer::{GasOptimizer, GasStats, GasWindow};
pub use strategy::{CompoundDecision, CompoundStrategy, MarketState};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
