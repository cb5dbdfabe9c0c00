//! # Unit Conversions
//!
//! Wei / gwei / ETH conversions and the constants that convert per-block
//! reward accrual into an annualized basis. All conversions are exact
//! decimal arithmetic.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Wei per ETH (10^18).
pub const WEI_PER_ETH: Decimal = dec!(1_000_000_000_000_000_000);

/// Wei per gwei (10^9).
pub const WEI_PER_GWEI: Decimal = dec!(1_000_000_000);

/// Blocks per year at ~12 s blocks. Reward-accrual basis.
pub const BLOCKS_PER_YEAR: Decimal = dec!(2_628_000);

/// Seconds per (365-day) year. Time-based accrual basis.
pub const SECONDS_PER_YEAR: Decimal = dec!(31_536_000);

/// Converts an amount of wei to ETH.
#[must_use]
pub fn wei_to_eth(wei: Decimal) -> Decimal {
    wei / WEI_PER_ETH
}

/// Converts a gwei price to wei.
#[must_use]
pub fn gwei_to_wei(gwei: Decimal) -> Decimal {
    gwei * WEI_PER_GWEI
}

/// Converts a wei price to gwei.
#[must_use]
pub fn wei_to_gwei(wei: Decimal) -> Decimal {
    wei / WEI_PER_GWEI
}

// =============================================================================
// TESTS
// =============================================================================
