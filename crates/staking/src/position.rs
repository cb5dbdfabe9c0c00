//! # Staking Position
//!
//! Derived snapshot of one address's standing with the contract. Computed on
//! demand from account and contract state; never persisted independently.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared_types::Address;

/// A point-in-time staking position.
///
/// Field names `address`, `staked`, `rewards`, `apr`, `previous_apr` form
/// the stable rendering surface for external callers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StakingPosition {
    /// Position owner.
    pub address: Address,
    /// Principal currently staked, in ETH.
    pub staked: Decimal,
    /// Unclaimed rewards, in ETH (lazily accrued).
    pub rewards: Decimal,
    /// Current contract APR.
    pub apr: Decimal,
    /// APR before the most recent change, for delta reporting.
    pub previous_apr: Decimal,
}

impl StakingPosition {
    /// Returns true if there is anything at stake.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.staked > Decimal::ZERO
    }
}
