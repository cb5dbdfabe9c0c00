//! Ledger error types.

use crate::transaction::TxStatus;
use rust_decimal::Decimal;
use shared_types::{Address, TxHash};
use thiserror::Error;

/// Errors from ledger and transaction-engine operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LedgerError {
    /// Account already exists at this address.
    #[error("account {0} already exists")]
    DuplicateAccount(Address),

    /// No account at this address. Creation is always explicit.
    #[error("account {0} does not exist")]
    AccountNotFound(Address),

    /// A transaction with this hash was already stored.
    #[error("transaction {0} already exists")]
    DuplicateTransaction(TxHash),

    /// No stored transaction with this hash.
    #[error("transaction {0} not found")]
    TransactionNotFound(TxHash),

    /// Sender balance below value + gas cost.
    #[error("insufficient funds: required {required} ETH, available {available} ETH")]
    InsufficientFunds {
        /// Value plus gas cost of the rejected transaction.
        required: Decimal,
        /// Sender balance at validation time.
        available: Decimal,
    },

    /// Transaction nonce does not match the sender's next nonce.
    #[error("invalid nonce: expected {expected}, got {actual}")]
    InvalidNonce {
        /// The sender's current nonce.
        expected: u64,
        /// The nonce carried by the transaction.
        actual: u64,
    },

    /// Attempted a second status transition on a finalized transaction.
    #[error("transaction already finalized as {status}")]
    TransactionFinalized {
        /// The terminal status already reached.
        status: TxStatus,
    },

    /// Parameter validation failed (negative value, non-positive gas, ...).
    #[error("validation failed: {0}")]
    Validation(String),
}
