//! # Account Entity
//!
//! Ledger-owned account state. Accounts are created explicitly, mutated only
//! through transaction application or contract operations, and never deleted.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared_types::{Address, Timestamp};

/// A ledger account.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Account address.
    pub address: Address,
    /// Liquid balance in ETH.
    pub balance: Decimal,
    /// Principal currently staked, separate from the liquid balance.
    pub staked_amount: Decimal,
    /// Rewards accrued by block mining, not yet claimed.
    pub unclaimed_rewards: Decimal,
    /// Monotonic per-account transaction counter.
    pub nonce: u64,
    /// Simulated time of the most recent stake operation.
    pub last_stake_time: Option<Timestamp>,
}

impl Account {
    /// Creates an account with the given starting balance.
    #[must_use]
    pub fn new(address: Address, balance: Decimal) -> Self {
        Self {
            address,
            balance,
            staked_amount: Decimal::ZERO,
            unclaimed_rewards: Decimal::ZERO,
            nonce: 0,
            last_stake_time: None,
        }
    }

    /// Returns true if this account has an active stake.
    #[must_use]
    pub fn is_staking(&self) -> bool {
        self.staked_amount > Decimal::ZERO
    }
}

// =============================================================================
// TESTS
// =============================================================================
