//! Cross-crate integration scenarios.

pub mod autocompound_flows;
pub mod staking_lifecycle;
