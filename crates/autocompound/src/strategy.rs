//! # Compound Strategies
//!
//! Pluggable policies answering one question: given a staking position and
//! the current market, should rewards be compounded right now?
//!
//! All strategies share two economic gates (rewards large enough, gas cheap
//! enough); they differ in what they layer on top. Gas prices here are gwei.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared_types::{Address, Timestamp};
use sim_staking::StakingPosition;
use std::collections::{HashMap, VecDeque};
use tracing::debug;

use crate::errors::AutocompoundError;

// =============================================================================
// INPUTS AND OUTPUTS
// =============================================================================

/// Market snapshot a strategy decides against.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarketState {
    /// Current chain time.
    pub timestamp: Timestamp,
    /// Current gas price, gwei.
    pub gas_price: Decimal,
}

/// Outcome of a strategy evaluation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompoundDecision {
    /// Whether to compound now.
    pub should_compound: bool,
    /// Human-readable rationale.
    pub reason: String,
    /// Gas ceiling the decision was made against, gwei.
    pub gas_price_threshold: Option<Decimal>,
    /// Reward floor the decision was made against, ETH.
    pub min_reward_threshold: Option<Decimal>,
}

impl CompoundDecision {
    fn approve(reason: impl Into<String>, gas: Decimal, rewards: Decimal) -> Self {
        Self {
            should_compound: true,
            reason: reason.into(),
            gas_price_threshold: Some(gas),
            min_reward_threshold: Some(rewards),
        }
    }

    fn reject(reason: impl Into<String>, gas: Decimal, rewards: Decimal) -> Self {
        Self {
            should_compound: false,
            reason: reason.into(),
            gas_price_threshold: Some(gas),
            min_reward_threshold: Some(rewards),
        }
    }
}

// =============================================================================
// STRATEGIES
// =============================================================================

/// A compound policy.
///
/// `TimeBased` and `GasOptimized` carry per-address state, so one strategy
/// instance can serve many positions without cross-talk.
#[derive(Clone, Debug)]
pub enum CompoundStrategy {
    /// Compound whenever rewards and gas both clear fixed thresholds.
    Threshold {
        /// Reward floor, ETH.
        min_reward_threshold: Decimal,
        /// Gas ceiling, gwei.
        max_gas_price: Decimal,
    },
    /// Threshold gates plus a minimum interval between compounds.
    TimeBased {
        /// Seconds between compounds per address.
        compound_interval: u64,
        /// Reward floor, ETH.
        min_reward_threshold: Decimal,
        /// Gas ceiling, gwei.
        max_gas_price: Decimal,
        /// Last approved compound time per address.
        last_compound: HashMap<Address, Timestamp>,
    },
    /// Threshold gates plus a percentile cut over recent gas samples.
    GasOptimized {
        /// Percentile of recent samples the current price must not exceed.
        gas_percentile: u32,
        /// Reward floor, ETH.
        min_reward_threshold: Decimal,
        /// Gas ceiling, gwei.
        max_gas_price: Decimal,
        /// Samples retained per address.
        gas_window: usize,
        /// Recent gas prices per address, oldest first.
        samples: HashMap<Address, VecDeque<Decimal>>,
    },
}

impl CompoundStrategy {
    /// Fixed-threshold strategy.
    #[must_use]
    pub fn threshold(min_reward_threshold: Decimal, max_gas_price: Decimal) -> Self {
        Self::Threshold {
            min_reward_threshold,
            max_gas_price,
        }
    }

    /// Interval-gated strategy.
    #[must_use]
    pub fn time_based(
        compound_interval: u64,
        min_reward_threshold: Decimal,
        max_gas_price: Decimal,
    ) -> Self {
        Self::TimeBased {
            compound_interval,
            min_reward_threshold,
            max_gas_price,
            last_compound: HashMap::new(),
        }
    }

    /// Percentile-gated strategy.
    ///
    /// # Errors
    ///
    /// [`AutocompoundError::InvalidPercentile`] if `gas_percentile > 100`,
    /// [`AutocompoundError::EmptyGasWindow`] if `gas_window == 0`.
    pub fn gas_optimized(
        gas_percentile: u32,
        min_reward_threshold: Decimal,
        max_gas_price: Decimal,
        gas_window: usize,
    ) -> Result<Self, AutocompoundError> {
        if gas_percentile > 100 {
            return Err(AutocompoundError::InvalidPercentile(gas_percentile));
        }
        if gas_window == 0 {
            return Err(AutocompoundError::EmptyGasWindow);
        }
        Ok(Self::GasOptimized {
            gas_percentile,
            min_reward_threshold,
            max_gas_price,
            gas_window,
            samples: HashMap::new(),
        })
    }

    /// Reward floor of this strategy, ETH.
    #[must_use]
    pub fn min_reward_threshold(&self) -> Decimal {
        match self {
            Self::Threshold {
                min_reward_threshold,
                ..
            }
            | Self::TimeBased {
                min_reward_threshold,
                ..
            }
            | Self::GasOptimized {
                min_reward_threshold,
                ..
            } => *min_reward_threshold,
        }
    }

    /// Gas ceiling of this strategy, gwei.
    #[must_use]
    pub fn max_gas_price(&self) -> Decimal {
        match self {
            Self::Threshold { max_gas_price, .. }
            | Self::TimeBased { max_gas_price, .. }
            | Self::GasOptimized { max_gas_price, .. } => *max_gas_price,
        }
    }

    /// Evaluates the position against this policy.
    ///
    /// Gates apply in order: gas ceiling, reward floor, then any
    /// strategy-specific condition. Stateful strategies record the sample or
    /// approval as a side effect.
    pub fn decide(&mut self, position: &StakingPosition, market: &MarketState) -> CompoundDecision {
        let decision = match self {
            Self::Threshold {
                min_reward_threshold,
                max_gas_price,
            } => decide_threshold(position, market, *min_reward_threshold, *max_gas_price),
            Self::TimeBased {
                compound_interval,
                min_reward_threshold,
                max_gas_price,
                last_compound,
            } => decide_time_based(
                position,
                market,
                *compound_interval,
                *min_reward_threshold,
                *max_gas_price,
                last_compound,
            ),
            Self::GasOptimized {
                gas_percentile,
                min_reward_threshold,
                max_gas_price,
                gas_window,
                samples,
            } => decide_gas_optimized(
                position,
                market,
                *gas_percentile,
                *min_reward_threshold,
                *max_gas_price,
                *gas_window,
                samples,
            ),
        };
        debug!(
            address = %position.address,
            should_compound = decision.should_compound,
            reason = %decision.reason,
            "strategy decision"
        );
        decision
    }
}

fn decide_threshold(
    position: &StakingPosition,
    market: &MarketState,
    min_reward: Decimal,
    max_gas: Decimal,
) -> CompoundDecision {
    if market.gas_price > max_gas {
        return CompoundDecision::reject(
            format!(
                "gas price {} gwei exceeds threshold {} gwei",
                market.gas_price, max_gas
            ),
            max_gas,
            min_reward,
        );
    }
    if position.rewards < min_reward {
        return CompoundDecision::reject(
            format!(
                "rewards {} ETH below threshold {} ETH",
                position.rewards, min_reward
            ),
            max_gas,
            min_reward,
        );
    }
    CompoundDecision::approve(
        format!(
            "rewards {} ETH meet threshold at {} gwei gas",
            position.rewards, market.gas_price
        ),
        max_gas,
        min_reward,
    )
}

fn decide_time_based(
    position: &StakingPosition,
    market: &MarketState,
    interval: u64,
    min_reward: Decimal,
    max_gas: Decimal,
    last_compound: &mut HashMap<Address, Timestamp>,
) -> CompoundDecision {
    let base = decide_threshold(position, market, min_reward, max_gas);
    if !base.should_compound {
        return base;
    }

    if let Some(&last) = last_compound.get(&position.address) {
        let elapsed = market.timestamp.saturating_sub(last);
        if elapsed < interval {
            return CompoundDecision::reject(
                format!(
                    "waiting {}s until next compound interval",
                    interval - elapsed
                ),
                max_gas,
                min_reward,
            );
        }
    }

    last_compound.insert(position.address.clone(), market.timestamp);
    CompoundDecision::approve(
        format!("compound interval elapsed with {} ETH rewards", position.rewards),
        max_gas,
        min_reward,
    )
}

fn decide_gas_optimized(
    position: &StakingPosition,
    market: &MarketState,
    percentile: u32,
    min_reward: Decimal,
    max_gas: Decimal,
    window: usize,
    samples: &mut HashMap<Address, VecDeque<Decimal>>,
) -> CompoundDecision {
    let history = samples.entry(position.address.clone()).or_default();
    history.push_back(market.gas_price);
    while history.len() > window {
        history.pop_front();
    }

    if history.len() < window {
        return CompoundDecision::reject(
            format!(
                "building gas price history: {}/{} samples",
                history.len(),
                window
            ),
            max_gas,
            min_reward,
        );
    }

    if position.rewards < min_reward {
        return CompoundDecision::reject(
            format!(
                "rewards {} ETH below threshold {} ETH",
                position.rewards, min_reward
            ),
            max_gas,
            min_reward,
        );
    }

    let mut sorted: Vec<Decimal> = history.iter().copied().collect();
    sorted.sort();
    let idx = ((sorted.len() * percentile as usize) / 100).min(sorted.len() - 1);
    let cut = sorted[idx].min(max_gas);

    if market.gas_price <= cut {
        CompoundDecision::approve(
            format!(
                "gas price {} gwei within p{} cut of {} gwei",
                market.gas_price, percentile, cut
            ),
            cut,
            min_reward,
        )
    } else {
        CompoundDecision::reject(
            format!(
                "gas price {} gwei above p{} cut of {} gwei",
                market.gas_price, percentile, cut
            ),
            cut,
            min_reward,
        )
    }
}

// =============================================================================
// TESTS
// =============================================================================
