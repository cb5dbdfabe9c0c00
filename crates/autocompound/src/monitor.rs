//! # Reward Monitor
//!
//! Orchestrates the compound loop: polls positions, consults the strategy
//! and gas optimizer, executes compounds through the contract, and keeps a
//! per-address history of what was folded and what it cost.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared_types::{wei_to_eth, Address, Timestamp, TxHash};
use sim_ledger::Transaction;
use sim_staking::{ContractError, StakingContract, OPERATION_GAS_LIMIT};
use std::collections::HashMap;
use tracing::{debug, info};

use crate::optimizer::GasOptimizer;
use crate::strategy::{CompoundDecision, CompoundStrategy, MarketState};

// =============================================================================
// HISTORY RECORDS
// =============================================================================

/// One executed compound.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompoundEvent {
    /// Chain time at execution.
    pub timestamp: Timestamp,
    /// Rewards folded into principal, ETH.
    pub rewards: Decimal,
    /// Gas price paid, wei.
    pub gas_price: Decimal,
    /// Gas units consumed.
    pub gas_used: u64,
    /// Hash of the compound transaction.
    pub transaction_hash: TxHash,
    /// Position owner.
    pub address: Address,
}

impl CompoundEvent {
    /// Gas cost of this compound, ETH.
    #[must_use]
    pub fn gas_cost(&self) -> Decimal {
        wei_to_eth(Decimal::from(self.gas_used) * self.gas_price)
    }
}

/// Aggregate statistics over one address's compound history.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CompoundStats {
    /// Number of executed compounds.
    pub total_compounds: u64,
    /// Sum of rewards folded, ETH.
    pub total_rewards_compounded: Decimal,
    /// Sum of gas paid, ETH.
    pub total_gas_cost: Decimal,
    /// Mean gas paid per compound, ETH.
    pub average_gas_cost: Decimal,
}

// =============================================================================
// MONITOR
// =============================================================================

/// Compound-loop orchestrator.
///
/// Owns the contract (and through it the ledger). The strategy answers
/// "is it economically worth it", the optimizer answers "is now a good
/// moment for gas"; the monitor asks both and records outcomes.
#[derive(Debug)]
pub struct RewardMonitor {
    contract: StakingContract,
    strategy: CompoundStrategy,
    optimizer: GasOptimizer,
    history: HashMap<Address, Vec<CompoundEvent>>,
}

impl RewardMonitor {
    /// Creates a monitor with a default gas optimizer.
    #[must_use]
    pub fn new(contract: StakingContract, strategy: CompoundStrategy) -> Self {
        Self::with_optimizer(contract, strategy, GasOptimizer::default())
    }

    /// Creates a monitor with an explicitly configured optimizer.
    #[must_use]
    pub fn with_optimizer(
        contract: StakingContract,
        strategy: CompoundStrategy,
        optimizer: GasOptimizer,
    ) -> Self {
        Self {
            contract,
            strategy,
            optimizer,
            history: HashMap::new(),
        }
    }

    /// The monitored contract.
    #[must_use]
    pub fn contract(&self) -> &StakingContract {
        &self.contract
    }

    /// Mutable access for test scenarios and time control.
    pub fn contract_mut(&mut self) -> &mut StakingContract {
        &mut self.contract
    }

    /// Checks whether an address is worth compounding right now.
    ///
    /// True when rewards clear the strategy's floor and the optimizer judges
    /// the current gas price favorable. Records a gas sample as a side
    /// effect.
    ///
    /// # Errors
    /// `ContractError::Ledger` if the address has no account.
    pub fn check_rewards(&mut self, address: &Address) -> Result<bool, ContractError> {
        self.contract.ledger().get_account(address)?;

        let rewards = self.contract.get_rewards(address);
        if rewards < self.strategy.min_reward_threshold() {
            debug!(address = %address, %rewards, "rewards below strategy floor");
            return Ok(false);
        }

        let now = self.contract.ledger().block_time();
        let gas_gwei = self.contract.ledger().gas_price_gwei();
        Ok(self.optimizer.check_gas_price(now, gas_gwei))
    }

    /// Runs the strategy against the address's current position and market.
    ///
    /// # Errors
    /// `ContractError::Ledger` if the address has no account.
    pub fn evaluate(&mut self, address: &Address) -> Result<CompoundDecision, ContractError> {
        self.contract.ledger().get_account(address)?;

        let position = self.contract.get_position(address);
        let market = MarketState {
            timestamp: self.contract.ledger().block_time(),
            gas_price: self.contract.ledger().gas_price_gwei(),
        };
        Ok(self.strategy.decide(&position, &market))
    }

    /// Compounds the address's rewards if thresholds allow.
    ///
    /// `min_rewards` and `max_gas_price` (gwei) override the strategy's
    /// thresholds when given. Returns `Ok(None)` when a threshold blocks
    /// execution or there is nothing to compound; the transaction when the
    /// fold happened.
    ///
    /// # Errors
    /// `ContractError::Ledger` if the address has no account or the ledger
    /// rejects the compound transaction.
    pub fn execute_compound(
        &mut self,
        address: &Address,
        min_rewards: Option<Decimal>,
        max_gas_price: Option<Decimal>,
    ) -> Result<Option<Transaction>, ContractError> {
        self.contract.ledger().get_account(address)?;

        let rewards = self.contract.get_rewards(address);
        let reward_floor = min_rewards.unwrap_or_else(|| self.strategy.min_reward_threshold());
        if rewards < reward_floor {
            debug!(address = %address, %rewards, %reward_floor, "skipping compound: rewards below floor");
            return Ok(None);
        }

        let gas_gwei = self.contract.ledger().gas_price_gwei();
        let gas_ceiling = max_gas_price.unwrap_or_else(|| self.strategy.max_gas_price());
        if gas_gwei > gas_ceiling {
            debug!(address = %address, %gas_gwei, %gas_ceiling, "skipping compound: gas above ceiling");
            return Ok(None);
        }

        match self.contract.compound(address) {
            Ok(tx) => {
                let event = CompoundEvent {
                    timestamp: self.contract.ledger().block_time(),
                    rewards,
                    gas_price: self.contract.ledger().gas_price(),
                    gas_used: OPERATION_GAS_LIMIT,
                    transaction_hash: tx.hash.clone(),
                    address: address.clone(),
                };
                info!(
                    address = %address,
                    %rewards,
                    hash = %event.transaction_hash,
                    "compound executed"
                );
                self.history.entry(address.clone()).or_default().push(event);
                Ok(Some(tx))
            }
            // Position emptied between the checks and the call: not a fault.
            Err(ContractError::NoStake(_) | ContractError::NoRewards(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Compound history for an address, oldest first.
    #[must_use]
    pub fn history(&self, address: &Address) -> &[CompoundEvent] {
        self.history.get(address).map_or(&[], Vec::as_slice)
    }

    /// Aggregate statistics for an address; zeros when nothing compounded.
    #[must_use]
    pub fn get_compound_stats(&self, address: &Address) -> CompoundStats {
        let events = self.history(address);
        if events.is_empty() {
            return CompoundStats::default();
        }

        let total_rewards: Decimal = events.iter().map(|e| e.rewards).sum();
        let total_gas: Decimal = events.iter().map(CompoundEvent::gas_cost).sum();
        let count = events.len() as u64;
        CompoundStats {
            total_compounds: count,
            total_rewards_compounded: total_rewards,
            total_gas_cost: total_gas,
            average_gas_cost: total_gas / Decimal::from(count),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
