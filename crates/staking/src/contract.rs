//! # Staking Contract
//!
//! Stake, unstake, claim and compound over the mock ledger. Rewards accrue
//! lazily per block; nothing needs a tick. Every operation validates fully
//! and applies its ledger transaction before any stake bookkeeping changes,
//! so a failure never leaves a partial state.

use crate::errors::ContractError;
use crate::position::StakingPosition;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use shared_types::{Address, BLOCKS_PER_YEAR};
use sim_ledger::{Ledger, Transaction};
use std::collections::HashMap;
use tracing::{debug, info};

/// Gas limit used by every contract operation (stake, unstake, claim,
/// compound).
pub const OPERATION_GAS_LIMIT: u64 = 100_000;

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Contract parameters, supplied at construction.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContractConfig {
    /// Contract account address.
    pub address: Address,
    /// Minimum stake per operation, in ETH.
    pub min_stake: Decimal,
    /// Maximum stake per operation, in ETH.
    pub max_stake: Decimal,
    /// Annual percentage rate applied to staked principal.
    pub apr: Decimal,
    /// ETH endowed to the contract account at construction; pays out claims.
    pub initial_treasury: Decimal,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            address: Address::zero(),
            min_stake: dec!(0.1),
            max_stake: dec!(100),
            apr: dec!(0.05),
            initial_treasury: dec!(1000),
        }
    }
}

// =============================================================================
// CONTRACT
// =============================================================================

/// Mock staking contract.
///
/// Owns the [`Ledger`] so that all mutations of one simulation instance flow
/// through a single owner; callers reach the clock and gas price via
/// [`ledger()`](Self::ledger) / [`ledger_mut()`](Self::ledger_mut).
#[derive(Clone, Debug)]
pub struct StakingContract {
    ledger: Ledger,
    address: Address,
    min_stake: Decimal,
    max_stake: Decimal,
    apr: Decimal,
    previous_apr: Decimal,
    /// Staked principal per address.
    stakes: HashMap<Address, Decimal>,
    /// Block at which lazy accrual last restarted, per address.
    stake_block: HashMap<Address, u64>,
    /// Rewards banked when accrual restarts (stake changes, seeding).
    banked_rewards: HashMap<Address, Decimal>,
}

impl StakingContract {
    /// Creates the contract over a ledger, endowing the contract account
    /// with the configured treasury if it does not exist yet.
    ///
    /// # Errors
    /// Propagates ledger validation errors from treasury account creation.
    pub fn new(mut ledger: Ledger, config: ContractConfig) -> Result<Self, ContractError> {
        if !ledger.has_account(&config.address) {
            ledger.create_account(config.address.clone(), config.initial_treasury)?;
        }
        info!(address = %config.address, apr = %config.apr, "initialized staking contract");

        Ok(Self {
            ledger,
            address: config.address,
            min_stake: config.min_stake,
            max_stake: config.max_stake,
            apr: config.apr,
            previous_apr: config.apr,
            stakes: HashMap::new(),
            stake_block: HashMap::new(),
            banked_rewards: HashMap::new(),
        })
    }

    /// Creates the contract with default parameters.
    ///
    /// # Errors
    /// Propagates ledger errors from treasury account creation.
    pub fn with_defaults(ledger: Ledger) -> Result<Self, ContractError> {
        Self::new(ledger, ContractConfig::default())
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// Contract account address.
    #[must_use]
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Minimum stake per operation.
    #[must_use]
    pub fn min_stake(&self) -> Decimal {
        self.min_stake
    }

    /// Maximum stake per operation.
    #[must_use]
    pub fn max_stake(&self) -> Decimal {
        self.max_stake
    }

    /// Current APR.
    #[must_use]
    pub fn apr(&self) -> Decimal {
        self.apr
    }

    /// APR before the most recent change.
    #[must_use]
    pub fn previous_apr(&self) -> Decimal {
        self.previous_apr
    }

    /// Sets a new APR, remembering the old value for delta reporting.
    pub fn set_apr(&mut self, apr: Decimal) {
        info!(old = %self.apr, new = %apr, "APR changed");
        self.previous_apr = self.apr;
        self.apr = apr;
    }

    /// The underlying ledger.
    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Mutable access to the underlying ledger (clock, gas price, accounts).
    pub fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }

    // =========================================================================
    // OPERATIONS
    // =========================================================================

    /// Stakes `amount` ETH for `address`.
    ///
    /// The amount must lie in `[min_stake, max_stake]`. The stake transaction
    /// (value + gas) is applied to the ledger first; stake bookkeeping only
    /// changes once it succeeds. `validator` is advisory: the simulation has
    /// no validator set, so it is recorded in the log only.
    ///
    /// # Errors
    /// - `NonPositiveAmount` / `BelowMinimumStake` / `AboveMaximumStake`
    /// - `Ledger(AccountNotFound)` for an unknown staker
    /// - `Ledger(InsufficientFunds)` if balance < amount + gas
    pub fn stake(
        &mut self,
        address: &Address,
        amount: Decimal,
        validator: Option<&str>,
    ) -> Result<Transaction, ContractError> {
        if amount <= Decimal::ZERO {
            return Err(ContractError::NonPositiveAmount);
        }
        if amount < self.min_stake {
            return Err(ContractError::BelowMinimumStake {
                amount,
                min: self.min_stake,
            });
        }
        if amount > self.max_stake {
            return Err(ContractError::AboveMaximumStake {
                amount,
                max: self.max_stake,
            });
        }

        let mut tx = Transaction::new(
            address.clone(),
            self.address.clone(),
            amount,
            self.ledger.get_nonce(address)?,
            self.ledger.gas_price(),
            OPERATION_GAS_LIMIT,
            self.ledger.block_time(),
        )?;
        tx.confirm()?;
        let tx = self.ledger.apply_transaction(tx)?;

        // Transaction applied; fold the amount into the stake. Accrued
        // rewards are banked first so the restart does not discard them.
        self.bank_accrued(address);
        *self.stakes.entry(address.clone()).or_insert(Decimal::ZERO) += amount;
        self.stake_block
            .insert(address.clone(), self.ledger.block_number());

        let block_time = self.ledger.block_time();
        let account = self.ledger.get_account_mut(address)?;
        account.staked_amount += amount;
        account.last_stake_time = Some(block_time);

        info!(
            address = %address,
            %amount,
            validator = validator.unwrap_or("none"),
            hash = %tx.hash,
            "staked"
        );
        Ok(tx)
    }

    /// Unstakes `amount` ETH for `address`, crediting it back to the liquid
    /// balance. The entry is removed entirely when the stake reaches zero.
    ///
    /// # Errors
    /// - `NonPositiveAmount`
    /// - `NoStake` if the address has no active stake
    /// - `InsufficientStake` if `amount` exceeds the stake
    /// - `InsufficientTreasury` if the treasury cannot return the principal
    /// - `Ledger(InsufficientFunds)` if the balance cannot cover gas
    pub fn unstake(&mut self, address: &Address, amount: Decimal) -> Result<Transaction, ContractError> {
        if amount <= Decimal::ZERO {
            return Err(ContractError::NonPositiveAmount);
        }
        let staked = *self
            .stakes
            .get(address)
            .ok_or_else(|| ContractError::NoStake(address.clone()))?;
        if amount > staked {
            return Err(ContractError::InsufficientStake {
                requested: amount,
                available: staked,
            });
        }
        // Claims draw on the same treasury balance as staked principal, so
        // the return must be validated before any mutation.
        let treasury_balance = self.ledger.get_balance(&self.address)?;
        if treasury_balance < amount {
            return Err(ContractError::InsufficientTreasury {
                requested: amount,
                available: treasury_balance,
            });
        }

        // Gas-only transaction: the principal moves inside the contract.
        let mut tx = Transaction::new(
            address.clone(),
            self.address.clone(),
            Decimal::ZERO,
            self.ledger.get_nonce(address)?,
            self.ledger.gas_price(),
            OPERATION_GAS_LIMIT,
            self.ledger.block_time(),
        )?;
        tx.confirm()?;
        let tx = self.ledger.apply_transaction(tx)?;

        self.bank_accrued(address);
        let remaining = staked - amount;
        if remaining == Decimal::ZERO {
            self.stakes.remove(address);
            self.stake_block.remove(address);
        } else {
            self.stakes.insert(address.clone(), remaining);
        }

        // Principal returns from the treasury to the liquid balance.
        let treasury = self.ledger.get_account_mut(&self.address)?;
        treasury.balance -= amount;
        let account = self.ledger.get_account_mut(address)?;
        account.staked_amount -= amount;
        account.balance += amount;

        info!(address = %address, %amount, %remaining, hash = %tx.hash, "unstaked");
        Ok(tx)
    }

    /// Current stake for an address; zero if none (read-only probe).
    #[must_use]
    pub fn get_stake(&self, address: &Address) -> Decimal {
        self.stakes.get(address).copied().unwrap_or(Decimal::ZERO)
    }

    /// Unclaimed rewards, computed lazily:
    /// `banked + staked * apr * blocks_elapsed / blocks_per_year`.
    ///
    /// Monotonically non-decreasing in elapsed blocks for a fixed stake and
    /// APR; no tick call is ever required.
    #[must_use]
    pub fn get_rewards(&self, address: &Address) -> Decimal {
        let banked = self
            .banked_rewards
            .get(address)
            .copied()
            .unwrap_or(Decimal::ZERO);

        let Some(stake) = self.stakes.get(address) else {
            return banked;
        };

        let current_block = self.ledger.block_number();
        let stake_block = self
            .stake_block
            .get(address)
            .copied()
            .unwrap_or(current_block);
        let blocks_elapsed = Decimal::from(current_block.saturating_sub(stake_block));

        banked + stake * self.apr * blocks_elapsed / BLOCKS_PER_YEAR
    }

    /// Adds banked rewards for an address (seeding helper for scenarios).
    pub fn add_rewards(&mut self, address: &Address, amount: Decimal) {
        *self
            .banked_rewards
            .entry(address.clone())
            .or_insert(Decimal::ZERO) += amount;
    }

    /// Claims all accrued rewards, transferring them from the contract
    /// treasury to the address. Resets accrual to zero.
    ///
    /// # Errors
    /// - `NoRewards` if nothing has accrued
    /// - `Ledger(AccountNotFound)` for an unknown address
    /// - `Ledger(InsufficientFunds)` if the treasury cannot cover the payout
    pub fn claim_rewards(&mut self, address: &Address) -> Result<Transaction, ContractError> {
        // Fail early for unknown accounts, before the rewards probe.
        self.ledger.get_account(address)?;

        let rewards = self.get_rewards(address);
        if rewards <= Decimal::ZERO {
            return Err(ContractError::NoRewards(address.clone()));
        }

        let mut tx = Transaction::new(
            self.address.clone(),
            address.clone(),
            rewards,
            self.ledger.get_nonce(&self.address)?,
            self.ledger.gas_price(),
            OPERATION_GAS_LIMIT,
            self.ledger.block_time(),
        )?;
        tx.confirm()?;
        let tx = self.ledger.apply_transaction(tx)?;

        // Accrual restarts from this block; without the reset the lazily
        // computed block rewards would reappear on the next read.
        self.banked_rewards.insert(address.clone(), Decimal::ZERO);
        if self.stakes.contains_key(address) {
            self.stake_block
                .insert(address.clone(), self.ledger.block_number());
        }

        info!(address = %address, %rewards, hash = %tx.hash, "rewards claimed");
        Ok(tx)
    }

    /// Compounds accrued rewards into the staked principal.
    ///
    /// Emits a balance-neutral transaction recording the compounded amount
    /// as its value; the principal fold happens inside the contract.
    ///
    /// # Errors
    /// - `NoStake` if the address has no active stake
    /// - `NoRewards` if nothing has accrued
    /// - `Ledger(AccountNotFound)` for an unknown address
    pub fn compound(&mut self, address: &Address) -> Result<Transaction, ContractError> {
        if !self.stakes.contains_key(address) {
            return Err(ContractError::NoStake(address.clone()));
        }
        let rewards = self.get_rewards(address);
        if rewards <= Decimal::ZERO {
            return Err(ContractError::NoRewards(address.clone()));
        }

        let mut tx = Transaction::new(
            address.clone(),
            self.address.clone(),
            rewards,
            self.ledger.get_nonce(address)?,
            self.ledger.gas_price(),
            OPERATION_GAS_LIMIT,
            self.ledger.block_time(),
        )?;
        tx.confirm()?;
        let tx = self.ledger.record_transaction(tx)?;

        *self.stakes.entry(address.clone()).or_insert(Decimal::ZERO) += rewards;
        self.banked_rewards.insert(address.clone(), Decimal::ZERO);
        self.stake_block
            .insert(address.clone(), self.ledger.block_number());

        let block_time = self.ledger.block_time();
        let account = self.ledger.get_account_mut(address)?;
        account.staked_amount += rewards;
        account.last_stake_time = Some(block_time);

        info!(address = %address, %rewards, hash = %tx.hash, "rewards compounded");
        Ok(tx)
    }

    /// Derived position snapshot for an address. Never stored; unknown
    /// addresses report an empty position.
    #[must_use]
    pub fn get_position(&self, address: &Address) -> StakingPosition {
        StakingPosition {
            address: address.clone(),
            staked: self.get_stake(address),
            rewards: self.get_rewards(address),
            apr: self.apr,
            previous_apr: self.previous_apr,
        }
    }

    /// Banks lazily accrued rewards and restarts accrual at the current
    /// block. Called before any stake-size change so past accrual is kept.
    fn bank_accrued(&mut self, address: &Address) {
        if !self.stakes.contains_key(address) {
            return;
        }
        let accrued = self.get_rewards(address);
        debug!(address = %address, %accrued, "banking accrued rewards");
        self.banked_rewards.insert(address.clone(), accrued);
        self.stake_block
            .insert(address.clone(), self.ledger.block_number());
    }
}

// =============================================================================
// TESTS
// =============================================================================
