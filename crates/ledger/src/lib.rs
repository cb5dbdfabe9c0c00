//! # Sim-Ledger: Mock Ledger & Transaction Engine
//!
//! In-memory ledger underlying the staking simulation. Maintains accounts,
//! balances, nonces, a mutable gas price, and a block clock; validates and
//! applies transactions with gas-cost arithmetic.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | Balance never negative | `Ledger::apply_transaction` validates funds before any mutation |
//! | Nonce +1 per sent transaction | `apply_transaction` / `record_transaction` check the expected nonce |
//! | Transaction hashes unique | insert paths reject duplicates |
//! | `gas_used <= gas_limit` | `Transaction::confirm` / `Transaction::fail` |
//! | Single terminal status transition | `TxStatus` state machine |
//!
//! Account lookups never auto-create; creation is always explicit via
//! [`Ledger::create_account`]. A missing account is
//! [`LedgerError::AccountNotFound`], everywhere.
//!
//! The model is synchronous and single-threaded per ledger instance: every
//! operation is a pure in-memory computation, and all mutations of one ledger
//! must be serialized through its single owner.

#![warn(missing_docs)]

pub mod account;
pub mod errors;
pub mod ledger;
pub mod transaction;

pub use account::Account;
pub use errors::LedgerError;
pub use ledger::{Ledger, DEFAULT_GAS_LIMIT, DEFAULT_GAS_PRICE_GWEI};
pub use transaction::{Transaction, TxStatus};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
