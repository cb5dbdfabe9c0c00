//! # Sim-Staking: Staking Contract
//!
//! Stake/unstake/claim/compound semantics over the mock ledger, with lazy
//! block-based reward accrual and APR tracking.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | Staked amount never negative | `unstake` validates against the recorded stake |
//! | Validate fully before mutating | every operation applies its transaction before touching stake state |
//! | Rewards accrue lazily | `get_rewards` computes `staked * apr * blocks / blocks_per_year` on demand |
//! | Claim/compound reset accrual | banked rewards zeroed and the stake block reset together |
//!
//! The contract owns its [`Ledger`](sim_ledger::Ledger): all mutations of one
//! simulation instance are serialized through the contract.

#![warn(missing_docs)]

pub mod contract;
pub mod errors;
pub mod position;

pub use contract::{ContractConfig, StakingContract, OPERATION_GAS_LIMIT};
pub use errors::ContractError;
pub use position::StakingPosition;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
