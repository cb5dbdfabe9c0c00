//! # Simulated Clock
//!
//! The simulation keeps its own wall clock: a plain unix-seconds counter that
//! only moves when a block is mined. No system time is ever read, which keeps
//! every run deterministic.

/// Unix seconds on the simulated clock.
pub type Timestamp = u64;

/// Clock value at ledger construction. Any fixed epoch works; a realistic
/// one keeps rendered timestamps plausible.
pub const GENESIS_TIME: Timestamp = 1_700_000_000;

/// Seconds advanced per mined block (~12 s blocks).
pub const SECONDS_PER_BLOCK: u64 = 12;

/// Seconds per minute.
pub const SECONDS_PER_MINUTE: u64 = 60;

/// Seconds per day.
pub const SECONDS_PER_DAY: u64 = 86_400;
