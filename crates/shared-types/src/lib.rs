//! # Shared Types
//!
//! Primitive types shared by every simulation crate.
//!
//! ## Components
//!
//! - `ids` - `Address` and `TxHash` newtypes
//! - `time` - simulated clock (`Timestamp`) and block-time constants
//! - `units` - wei/gwei/ETH conversions and reward-basis constants
//!
//! All monetary, APR, and gas quantities are `rust_decimal::Decimal`; binary
//! floating point never appears in an arithmetic path.

#![warn(missing_docs)]

pub mod ids;
pub mod time;
pub mod units;

pub use ids::{Address, TxHash};
pub use time::{Timestamp, GENESIS_TIME, SECONDS_PER_BLOCK, SECONDS_PER_DAY, SECONDS_PER_MINUTE};
pub use units::{
    gwei_to_wei, wei_to_eth, wei_to_gwei, BLOCKS_PER_YEAR, SECONDS_PER_YEAR, WEI_PER_ETH,
    WEI_PER_GWEI,
};

// Re-export the decimal type so downstream crates share one arithmetic stack.
pub use rust_decimal::Decimal;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
