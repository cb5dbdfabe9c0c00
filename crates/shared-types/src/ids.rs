//! # Identifier Newtypes
//!
//! String-backed identifiers for accounts and transactions. The simulation
//! has no key material, so addresses are opaque ids and transaction hashes
//! are random 32-byte-style hex strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// =============================================================================
// ADDRESS
// =============================================================================

/// An account address (0x-prefixed opaque id).
///
/// Ordered and hashable so it can key both `HashMap` and `BTreeMap` indices.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Creates an address from any string-like id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The zero address (0x + 40 zeros), used as the default contract account.
    #[must_use]
    pub fn zero() -> Self {
        Self(format!("0x{}", "0".repeat(40)))
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for Address {
    fn from(id: String) -> Self {
        Self(id)
    }
}

// =============================================================================
// TRANSACTION HASH
// =============================================================================

/// A transaction hash: `0x` followed by 64 lowercase hex characters.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(String);

impl TxHash {
    /// Generates a fresh random hash from two concatenated v4 UUIDs.
    #[must_use]
    pub fn random() -> Self {
        Self(format!(
            "0x{}{}",
            Uuid::new_v4().simple(),
            Uuid::new_v4().simple()
        ))
    }

    /// Returns the hash as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TxHash {
    fn from(hash: &str) -> Self {
        Self(hash.to_string())
    }
}

// =============================================================================
// TESTS
// =============================================================================
