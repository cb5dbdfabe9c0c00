//! # Gas Price Optimizer
//!
//! Tracks a trailing window of gas-price samples and judges whether the
//! current moment is historically favorable for paying gas. Favorability is
//! relative: below the window average, and inside the cheapest sustained
//! low-price interval if one exists.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared_types::{Timestamp, SECONDS_PER_MINUTE};
use std::collections::VecDeque;
use tracing::debug;

/// Default trailing analysis window, minutes.
pub const DEFAULT_WINDOW_MINUTES: u64 = 60;

/// Default minimum span for a favorable interval, minutes.
pub const DEFAULT_MIN_WINDOW_MINUTES: u64 = 5;

// =============================================================================
// ANALYSIS ARTIFACTS
// =============================================================================

/// A contiguous interval of at-or-below-average gas prices.
///
/// Recomputed on every check; never persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GasWindow {
    /// Interval start.
    pub start_time: Timestamp,
    /// Interval end.
    pub end_time: Timestamp,
    /// Average price over the interval, gwei.
    pub avg_gas_price: Decimal,
    /// Minimum price over the interval, gwei.
    pub min_gas_price: Decimal,
    /// Maximum price over the interval, gwei.
    pub max_gas_price: Decimal,
}

/// Summary statistics over the current trailing window.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GasStats {
    /// Window average, gwei (zero when no history).
    pub average_gas_price: Decimal,
    /// Window minimum, gwei (zero when no history).
    pub min_gas_price: Decimal,
    /// Window maximum, gwei (zero when no history).
    pub max_gas_price: Decimal,
    /// Current price, gwei.
    pub current_gas_price: Decimal,
}

// =============================================================================
// OPTIMIZER
// =============================================================================

/// Trailing-window gas price analyzer.
#[derive(Clone, Debug)]
pub struct GasOptimizer {
    /// Trailing window size, minutes.
    window_size_min: u64,
    /// Minimum span for a qualifying favorable interval, minutes.
    min_window_size_min: u64,
    /// `(timestamp, price_gwei)` samples within the window, oldest first.
    price_history: VecDeque<(Timestamp, Decimal)>,
    /// Time of the most recent check.
    last_check: Option<Timestamp>,
}

impl GasOptimizer {
    /// Creates an optimizer with the given window sizes (minutes).
    #[must_use]
    pub fn new(window_size_min: u64, min_window_size_min: u64) -> Self {
        Self {
            window_size_min,
            min_window_size_min,
            price_history: VecDeque::new(),
            last_check: None,
        }
    }

    /// Time of the most recent check.
    #[must_use]
    pub fn last_check(&self) -> Option<Timestamp> {
        self.last_check
    }

    /// Number of samples currently inside the window.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.price_history.len()
    }

    /// Records the current sample and judges favorability.
    ///
    /// Favorable when:
    /// - this is the only sample in the window (bootstrap), or
    /// - the price is at or below the window average AND either falls inside
    ///   the optimal low-price interval or no interval qualifies.
    pub fn check_gas_price(&mut self, now: Timestamp, current_price: Decimal) -> bool {
        self.price_history.push_back((now, current_price));
        self.last_check = Some(now);

        // Evict samples older than the trailing window.
        let cutoff = now.saturating_sub(self.window_size_min * SECONDS_PER_MINUTE);
        while let Some(&(t, _)) = self.price_history.front() {
            if t < cutoff {
                self.price_history.pop_front();
            } else {
                break;
            }
        }

        // Bootstrap: nothing to compare against yet.
        if self.price_history.len() == 1 {
            return true;
        }

        let avg = self.window_average();
        if current_price > avg {
            debug!(%current_price, %avg, "gas above window average");
            return false;
        }

        match self.find_optimal_window() {
            Some(window) => window.start_time <= now && now <= window.end_time,
            // Below average with no sustained interval: still favorable.
            None => true,
        }
    }

    /// Finds the optimal interval: the lowest-average maximal run of
    /// at-or-below-average samples spanning at least the minimum window
    /// size. Ties break toward the earliest start.
    #[must_use]
    pub fn find_optimal_window(&self) -> Option<GasWindow> {
        if self.price_history.len() < 2 {
            return None;
        }

        let avg = self.window_average();
        let samples: Vec<(Timestamp, Decimal)> = self.price_history.iter().copied().collect();
        let min_span = self.min_window_size_min * SECONDS_PER_MINUTE;

        let mut best: Option<GasWindow> = None;
        let mut run_start: Option<usize> = None;

        for i in 0..=samples.len() {
            let in_run = i < samples.len() && samples[i].1 <= avg;
            match (run_start, in_run) {
                (None, true) => run_start = Some(i),
                (Some(start), false) => {
                    self.consider_run(&samples, start, i - 1, min_span, &mut best);
                    run_start = None;
                }
                _ => {}
            }
        }

        best
    }

    fn consider_run(
        &self,
        samples: &[(Timestamp, Decimal)],
        start: usize,
        end: usize,
        min_span: u64,
        best: &mut Option<GasWindow>,
    ) {
        let start_time = samples[start].0;
        let end_time = samples[end].0;
        if end_time.saturating_sub(start_time) < min_span {
            return;
        }

        let run = &samples[start..=end];
        let sum: Decimal = run.iter().map(|&(_, p)| p).sum();
        let window = GasWindow {
            start_time,
            end_time,
            avg_gas_price: sum / Decimal::from(run.len() as u64),
            min_gas_price: run.iter().map(|&(_, p)| p).min().unwrap_or(Decimal::ZERO),
            max_gas_price: run.iter().map(|&(_, p)| p).max().unwrap_or(Decimal::ZERO),
        };

        // Strictly-lower average wins; equal averages keep the earlier run.
        let replace = match best {
            Some(current) => window.avg_gas_price < current.avg_gas_price,
            None => true,
        };
        if replace {
            *best = Some(window);
        }
    }

    /// Statistics over the current window; zeros (besides the current
    /// price) when no history has been recorded.
    #[must_use]
    pub fn get_gas_stats(&self, current_price: Decimal) -> GasStats {
        if self.price_history.is_empty() {
            return GasStats {
                average_gas_price: Decimal::ZERO,
                min_gas_price: Decimal::ZERO,
                max_gas_price: Decimal::ZERO,
                current_gas_price: current_price,
            };
        }

        GasStats {
            average_gas_price: self.window_average(),
            min_gas_price: self
                .price_history
                .iter()
                .map(|&(_, p)| p)
                .min()
                .unwrap_or(Decimal::ZERO),
            max_gas_price: self
                .price_history
                .iter()
                .map(|&(_, p)| p)
                .max()
                .unwrap_or(Decimal::ZERO),
            current_gas_price: current_price,
        }
    }

    fn window_average(&self) -> Decimal {
        let sum: Decimal = self.price_history.iter().map(|&(_, p)| p).sum();
        sum / Decimal::from(self.price_history.len() as u64)
    }
}

impl Default for GasOptimizer {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_MINUTES, DEFAULT_MIN_WINDOW_MINUTES)
    }
}

// =============================================================================
// TESTS
// =============================================================================
