//! # Staking Simulation Test Suite
//!
//! Unified test crate for cross-crate scenarios.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── ledger_flows.rs        # Accounts, transactions, gas, mining
//!     ├── staking_lifecycle.rs   # Stake / accrue / claim / compound / unstake
//!     └── autocompound_flows.rs  # Strategies + monitor against live state
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p sim-tests
//! cargo test -p sim-tests integration::
//! ```
//!
//! Unit tests live next to the code in each crate; everything here spans at
//! least two crates.

#![allow(dead_code)]

pub mod integration;

/// Installs a tracing subscriber honoring `RUST_LOG`, once per process.
/// Call from a test to see the simulation's structured logs while debugging.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
