//! # Ledger State
//!
//! Accounts, stored transactions, gas price, and the block clock. All
//! mutation goes through validate-then-apply paths: an operation either
//! completes fully or leaves the ledger untouched.

use crate::account::Account;
use crate::errors::LedgerError;
use crate::transaction::Transaction;
use rust_decimal::Decimal;
use shared_types::{
    gwei_to_wei, wei_to_gwei, Address, Timestamp, TxHash, GENESIS_TIME, SECONDS_PER_BLOCK,
    SECONDS_PER_YEAR,
};
use std::collections::HashMap;
use tracing::debug;

/// Standard gas limit for a plain value transfer.
pub const DEFAULT_GAS_LIMIT: u64 = 21_000;

/// Default gas price in gwei.
pub const DEFAULT_GAS_PRICE_GWEI: u64 = 20;

/// In-memory ledger for one simulation instance.
///
/// All mutating calls must be serialized through the owning instance.
/// Independent ledgers share no state.
#[derive(Clone, Debug)]
pub struct Ledger {
    chain_id: u64,
    accounts: HashMap<Address, Account>,
    transactions: HashMap<TxHash, Transaction>,
    /// Current gas price in wei.
    gas_price: Decimal,
    block_number: u64,
    block_time: Timestamp,
    /// APR applied by `mine_block` to staked balances.
    staking_apr: Decimal,
}

impl Ledger {
    /// Creates an empty ledger with default gas price and a 5% staking APR.
    #[must_use]
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            accounts: HashMap::new(),
            transactions: HashMap::new(),
            gas_price: gwei_to_wei(Decimal::from(DEFAULT_GAS_PRICE_GWEI)),
            block_number: 0,
            block_time: GENESIS_TIME,
            staking_apr: Decimal::new(5, 2), // 0.05
        }
    }

    // =========================================================================
    // ACCOUNTS
    // =========================================================================

    /// Creates a new account with an initial balance.
    ///
    /// # Errors
    /// - `DuplicateAccount` if the address already exists
    /// - `Validation` if the initial balance is negative
    pub fn create_account(
        &mut self,
        address: Address,
        balance: Decimal,
    ) -> Result<&Account, LedgerError> {
        if balance < Decimal::ZERO {
            return Err(LedgerError::Validation(
                "initial balance cannot be negative".to_string(),
            ));
        }
        if self.accounts.contains_key(&address) {
            return Err(LedgerError::DuplicateAccount(address));
        }

        debug!(address = %address, %balance, "creating account");
        let account = Account::new(address.clone(), balance);
        Ok(self.accounts.entry(address).or_insert(account))
    }

    /// Gets an account by address.
    ///
    /// # Errors
    /// `AccountNotFound` if absent; lookups never auto-create.
    pub fn get_account(&self, address: &Address) -> Result<&Account, LedgerError> {
        self.accounts
            .get(address)
            .ok_or_else(|| LedgerError::AccountNotFound(address.clone()))
    }

    /// Gets a mutable account by address.
    ///
    /// Callers are responsible for upholding the balance and stake
    /// non-negativity invariants; contract operations are the only expected
    /// users.
    ///
    /// # Errors
    /// `AccountNotFound` if absent.
    pub fn get_account_mut(&mut self, address: &Address) -> Result<&mut Account, LedgerError> {
        self.accounts
            .get_mut(address)
            .ok_or_else(|| LedgerError::AccountNotFound(address.clone()))
    }

    /// Returns true if an account exists at this address.
    #[must_use]
    pub fn has_account(&self, address: &Address) -> bool {
        self.accounts.contains_key(address)
    }

    /// Gets an account balance in ETH.
    ///
    /// # Errors
    /// `AccountNotFound` if absent.
    pub fn get_balance(&self, address: &Address) -> Result<Decimal, LedgerError> {
        Ok(self.get_account(address)?.balance)
    }

    /// Gets an account's next nonce.
    ///
    /// # Errors
    /// `AccountNotFound` if absent.
    pub fn get_nonce(&self, address: &Address) -> Result<u64, LedgerError> {
        Ok(self.get_account(address)?.nonce)
    }

    /// Overwrites an account balance (scenario setup helper).
    ///
    /// # Errors
    /// - `AccountNotFound` if absent
    /// - `Validation` if the balance is negative
    pub fn set_balance(&mut self, address: &Address, balance: Decimal) -> Result<(), LedgerError> {
        if balance < Decimal::ZERO {
            return Err(LedgerError::Validation(
                "balance cannot be negative".to_string(),
            ));
        }
        self.get_account_mut(address)?.balance = balance;
        Ok(())
    }

    // =========================================================================
    // GAS PRICE & CLOCK
    // =========================================================================

    /// Current gas price in wei.
    #[must_use]
    pub fn gas_price(&self) -> Decimal {
        self.gas_price
    }

    /// Current gas price in gwei.
    #[must_use]
    pub fn gas_price_gwei(&self) -> Decimal {
        wei_to_gwei(self.gas_price)
    }

    /// Sets the gas price, given in gwei.
    pub fn set_gas_price(&mut self, price_gwei: Decimal) {
        self.gas_price = gwei_to_wei(price_gwei);
    }

    /// Chain id.
    #[must_use]
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Current block number.
    #[must_use]
    pub fn block_number(&self) -> u64 {
        self.block_number
    }

    /// Simulated time of the last mined block.
    #[must_use]
    pub fn block_time(&self) -> Timestamp {
        self.block_time
    }

    /// APR used by block-level reward accrual.
    #[must_use]
    pub fn staking_apr(&self) -> Decimal {
        self.staking_apr
    }

    /// Sets the APR used by block-level reward accrual.
    pub fn set_staking_apr(&mut self, apr: Decimal) {
        self.staking_apr = apr;
    }

    // =========================================================================
    // TRANSACTIONS
    // =========================================================================

    /// Validates and applies a transaction.
    ///
    /// Debits the sender `value + gas_cost`, credits the recipient `value`
    /// (gas is burned, not forwarded), stores the transaction, and increments
    /// the sender nonce. All checks run before any mutation; a rejected
    /// transaction leaves the ledger untouched.
    ///
    /// # Errors
    /// - `AccountNotFound` if sender or recipient is missing
    /// - `InvalidNonce` if the nonce is not the sender's next nonce
    /// - `DuplicateTransaction` on hash reuse
    /// - `InsufficientFunds` if `balance < value + gas_cost`
    pub fn apply_transaction(&mut self, tx: Transaction) -> Result<Transaction, LedgerError> {
        let sender = self.get_account(&tx.from_address)?;
        if !self.accounts.contains_key(&tx.to_address) {
            return Err(LedgerError::AccountNotFound(tx.to_address.clone()));
        }
        if tx.nonce != sender.nonce {
            return Err(LedgerError::InvalidNonce {
                expected: sender.nonce,
                actual: tx.nonce,
            });
        }
        if self.transactions.contains_key(&tx.hash) {
            return Err(LedgerError::DuplicateTransaction(tx.hash.clone()));
        }

        let gas_cost = tx.gas_cost();
        let total_cost = tx.value + gas_cost;
        if sender.balance < total_cost {
            return Err(LedgerError::InsufficientFunds {
                required: total_cost,
                available: sender.balance,
            });
        }

        debug!(
            hash = %tx.hash,
            from = %tx.from_address,
            to = %tx.to_address,
            value = %tx.value,
            %gas_cost,
            "applying transaction"
        );

        // Checks passed; mutate.
        let sender = self
            .accounts
            .get_mut(&tx.from_address)
            .expect("sender validated above");
        sender.balance -= total_cost;
        sender.nonce += 1;

        let recipient = self
            .accounts
            .get_mut(&tx.to_address)
            .expect("recipient validated above");
        recipient.balance += tx.value;

        self.transactions.insert(tx.hash.clone(), tx.clone());
        Ok(tx)
    }

    /// Stores a balance-neutral bookkeeping transaction and increments the
    /// sender nonce. Used for receipts whose value movement happens inside
    /// the contract (e.g. compounding folds rewards into principal).
    ///
    /// # Errors
    /// - `AccountNotFound` if the sender is missing
    /// - `InvalidNonce` if the nonce is not the sender's next nonce
    /// - `DuplicateTransaction` on hash reuse
    pub fn record_transaction(&mut self, tx: Transaction) -> Result<Transaction, LedgerError> {
        let sender = self.get_account(&tx.from_address)?;
        if tx.nonce != sender.nonce {
            return Err(LedgerError::InvalidNonce {
                expected: sender.nonce,
                actual: tx.nonce,
            });
        }
        if self.transactions.contains_key(&tx.hash) {
            return Err(LedgerError::DuplicateTransaction(tx.hash.clone()));
        }

        self.accounts
            .get_mut(&tx.from_address)
            .expect("sender validated above")
            .nonce += 1;
        self.transactions.insert(tx.hash.clone(), tx.clone());
        Ok(tx)
    }

    /// Transfers ETH between two existing accounts at the current gas price.
    ///
    /// # Errors
    /// Propagates validation and funds errors from [`Self::apply_transaction`];
    /// `Validation` if the amount is negative.
    pub fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: Decimal,
    ) -> Result<Transaction, LedgerError> {
        let nonce = self.get_nonce(from)?;
        let mut tx = Transaction::new(
            from.clone(),
            to.clone(),
            amount,
            nonce,
            self.gas_price,
            DEFAULT_GAS_LIMIT,
            self.block_time,
        )?;
        tx.confirm()?;
        self.apply_transaction(tx)
    }

    /// Looks up a stored transaction by hash.
    ///
    /// # Errors
    /// `TransactionNotFound` if absent.
    pub fn get_transaction(&self, hash: &TxHash) -> Result<&Transaction, LedgerError> {
        self.transactions
            .get(hash)
            .ok_or_else(|| LedgerError::TransactionNotFound(hash.clone()))
    }

    /// Number of stored transactions.
    #[must_use]
    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    // =========================================================================
    // BLOCK CLOCK
    // =========================================================================

    /// Mines one block: advances the block counter and clock by ~12 s, then
    /// accrues rewards for every staking account.
    ///
    /// Accrual is `staked * apr * elapsed_seconds / seconds_per_year` since
    /// the account's `last_stake_time`, which is then advanced to the new
    /// block time so each interval is charged exactly once.
    pub fn mine_block(&mut self) {
        self.block_number += 1;
        self.block_time += SECONDS_PER_BLOCK;

        for account in self.accounts.values_mut() {
            if !account.is_staking() {
                continue;
            }
            let Some(last_stake_time) = account.last_stake_time else {
                continue;
            };
            let elapsed = Decimal::from(self.block_time.saturating_sub(last_stake_time));
            let reward = account.staked_amount * self.staking_apr * elapsed / SECONDS_PER_YEAR;
            account.unclaimed_rewards += reward;
            account.last_stake_time = Some(self.block_time);
        }

        debug!(block = self.block_number, time = self.block_time, "mined block");
    }

    /// Mines `n` blocks in sequence.
    pub fn mine_blocks(&mut self, n: u64) {
        for _ in 0..n {
            self.mine_block();
        }
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(1)
    }
}

// =============================================================================
// TESTS
// =============================================================================
