//! Staking contract error types.

use rust_decimal::Decimal;
use shared_types::Address;
use sim_ledger::LedgerError;
use thiserror::Error;

/// Errors from staking contract operations.
///
/// Every operation validates fully before mutating: an error means no state
/// changed, on the contract or on the ledger.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ContractError {
    /// Stake/unstake amount was zero or negative.
    #[error("amount must be positive")]
    NonPositiveAmount,

    /// Stake amount below the contract minimum.
    #[error("minimum stake is {min} ETH, got {amount} ETH")]
    BelowMinimumStake {
        /// Requested amount.
        amount: Decimal,
        /// Contract minimum.
        min: Decimal,
    },

    /// Stake amount above the contract maximum.
    #[error("maximum stake is {max} ETH, got {amount} ETH")]
    AboveMaximumStake {
        /// Requested amount.
        amount: Decimal,
        /// Contract maximum.
        max: Decimal,
    },

    /// Address has no active stake.
    #[error("no stake found for {0}")]
    NoStake(Address),

    /// Unstake amount exceeds the recorded stake.
    #[error("insufficient stake: requested {requested} ETH, staked {available} ETH")]
    InsufficientStake {
        /// Requested amount.
        requested: Decimal,
        /// Currently staked amount.
        available: Decimal,
    },

    /// No rewards available to claim or compound.
    #[error("no rewards available for {0}")]
    NoRewards(Address),

    /// The treasury cannot return the requested principal.
    #[error("insufficient treasury: requested {requested} ETH, holds {available} ETH")]
    InsufficientTreasury {
        /// Requested amount.
        requested: Decimal,
        /// Current treasury balance.
        available: Decimal,
    },

    /// Underlying ledger violation (unknown account, insufficient funds, ...).
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
