//! # Transaction Value Object
//!
//! A transaction is created pending, transitions exactly once to a terminal
//! status (success or failed), and is immutable afterwards. Gas is paid
//! whether or not the transaction succeeds.

use crate::errors::LedgerError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared_types::{wei_to_eth, Address, Timestamp, TxHash};
use std::fmt;

/// Fraction of the gas limit consumed by a successful transaction, in
/// percent. Failed transactions consume the full limit.
const SUCCESS_GAS_PERCENT: u64 = 95;

// =============================================================================
// STATUS STATE MACHINE
// =============================================================================

/// Transaction status: `pending -> {success, failed}`, single transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    /// Created, not yet confirmed.
    Pending,
    /// Confirmed successfully; `gas_used` fixed at 95% of the limit.
    Success,
    /// Confirmed as failed; the full gas limit is consumed.
    Failed,
}

impl TxStatus {
    /// Returns true once a terminal status has been reached.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::Success => f.write_str("success"),
            Self::Failed => f.write_str("failed"),
        }
    }
}

// =============================================================================
// TRANSACTION
// =============================================================================

/// A ledger transaction.
///
/// Field names `from`, `to`, `hash`, `value`, `gas_used`, `gas_price`, and
/// `status` form the stable rendering surface consumed by external callers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Sender address.
    #[serde(rename = "from")]
    pub from_address: Address,
    /// Recipient address.
    #[serde(rename = "to")]
    pub to_address: Address,
    /// Transferred amount in ETH.
    pub value: Decimal,
    /// Sender's transaction sequence number.
    pub nonce: u64,
    /// Price per gas unit in wei.
    pub gas_price: Decimal,
    /// Maximum gas units allowed.
    pub gas_limit: u64,
    /// Actual gas units consumed; set only at confirmation.
    pub gas_used: Option<u64>,
    /// Unique transaction id.
    pub hash: TxHash,
    /// Current status.
    pub status: TxStatus,
    /// Simulated creation time.
    pub timestamp: Timestamp,
    /// Failure reason; set iff `status == Failed`.
    pub error: Option<String>,
}

impl Transaction {
    /// Creates a pending transaction with a fresh random hash.
    ///
    /// # Errors
    /// `LedgerError::Validation` if the value is negative or the gas price
    /// or gas limit is not positive.
    pub fn new(
        from_address: Address,
        to_address: Address,
        value: Decimal,
        nonce: u64,
        gas_price: Decimal,
        gas_limit: u64,
        timestamp: Timestamp,
    ) -> Result<Self, LedgerError> {
        if value < Decimal::ZERO {
            return Err(LedgerError::Validation(
                "transaction value cannot be negative".to_string(),
            ));
        }
        if gas_price <= Decimal::ZERO {
            return Err(LedgerError::Validation(
                "gas price must be positive".to_string(),
            ));
        }
        if gas_limit == 0 {
            return Err(LedgerError::Validation(
                "gas limit must be positive".to_string(),
            ));
        }

        Ok(Self {
            from_address,
            to_address,
            value,
            nonce,
            gas_price,
            gas_limit,
            gas_used: None,
            hash: TxHash::random(),
            status: TxStatus::Pending,
            timestamp,
            error: None,
        })
    }

    /// Confirms the transaction as successful.
    ///
    /// Fixes `gas_used` at 95% of the limit, the typical consumption for a
    /// simple operation.
    ///
    /// # Errors
    /// `LedgerError::TransactionFinalized` if already terminal.
    pub fn confirm(&mut self) -> Result<(), LedgerError> {
        self.check_pending()?;
        self.status = TxStatus::Success;
        // u128 keeps the product exact for any gas limit.
        self.gas_used =
            Some((u128::from(self.gas_limit) * u128::from(SUCCESS_GAS_PERCENT) / 100) as u64);
        Ok(())
    }

    /// Confirms the transaction as failed.
    ///
    /// The full gas limit is consumed: gas is paid even on failure.
    ///
    /// # Errors
    /// `LedgerError::TransactionFinalized` if already terminal.
    pub fn fail(&mut self, reason: impl Into<String>) -> Result<(), LedgerError> {
        self.check_pending()?;
        self.status = TxStatus::Failed;
        self.gas_used = Some(self.gas_limit);
        self.error = Some(reason.into());
        Ok(())
    }

    fn check_pending(&self) -> Result<(), LedgerError> {
        if self.status.is_terminal() {
            return Err(LedgerError::TransactionFinalized {
                status: self.status,
            });
        }
        Ok(())
    }

    /// Total gas cost in ETH: `gas_used_or_limit * gas_price / 10^18`.
    ///
    /// Pending transactions cost out at the full limit (worst case).
    #[must_use]
    pub fn gas_cost(&self) -> Decimal {
        let gas = self.gas_used.unwrap_or(self.gas_limit);
        wei_to_eth(Decimal::from(gas) * self.gas_price)
    }
}

// =============================================================================
// TESTS
// =============================================================================
