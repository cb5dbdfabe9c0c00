//! Autocompound error types.

use thiserror::Error;

/// Errors from strategy construction.
///
/// Runtime violations surface as
/// [`ContractError`](sim_staking::ContractError) through the monitor; the
/// polling paths report unmet preconditions as negative results, not errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AutocompoundError {
    /// Gas percentile outside 0..=100.
    #[error("gas percentile must be between 0 and 100, got {0}")]
    InvalidPercentile(u32),

    /// Gas-optimized strategy needs at least one sample of history.
    #[error("gas window must be at least 1 sample")]
    EmptyGasWindow,
}
