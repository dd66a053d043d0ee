//! Configuration schema.
//!
//! Each TOML table maps to one struct below.  Every field has a default, so
//! an empty document yields a working configuration.
//!
//! Example:
//! ```toml
//! [sealing]
//! difficulty = 2
//! max_attempts = 1000
//!
//! [startup]
//! on_store_error = "fallback-genesis"
//!
//! [store]
//! path = "custos-chain.jsonl"
//! timeout_ms = 2000
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use custos_chain::seal::{DEFAULT_DIFFICULTY, DEFAULT_MAX_ATTEMPTS};
use custos_contracts::StartupPolicy;

/// Proof-of-work parameters.  Cosmetic: neither value is a security boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SealingSection {
    /// Leading `'0'` hex characters required in a block hash.
    pub difficulty: u32,

    /// Nonces tried before the final attempt is accepted as-is.
    pub max_attempts: u64,
}

impl Default for SealingSection {
    fn default() -> Self {
        Self {
            difficulty: DEFAULT_DIFFICULTY,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StartupSection {
    /// Behaviour when the chain store cannot be read at startup.
    pub on_store_error: StartupPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    /// Location of the JSON-lines chain file.
    pub path: PathBuf,

    /// Upper bound on any single store call, in milliseconds.
    pub timeout_ms: u64,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            path: PathBuf::from("custos-chain.jsonl"),
            timeout_ms: 2000,
        }
    }
}
