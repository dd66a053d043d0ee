//! Read-side result types: chain verification and chain statistics.
//!
//! A failed verification is a normal value, not an error: detecting
//! tampering is what the ledger is for.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Which chain invariant a block violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Violation {
    /// The chain has no blocks at all.
    EmptyChain,
    /// Block 0 is not a well-formed genesis block.
    InvalidGenesis,
    /// A block's `index` does not equal its position.
    IndexOutOfSequence,
    /// A block's `previous_hash` does not equal its predecessor's `hash`.
    BrokenLink,
    /// A block's stored `hash` differs from the recomputed hash.
    HashMismatch,
}

impl Violation {
    /// The reason string reported to readers.
    pub fn reason(self) -> &'static str {
        match self {
            Violation::EmptyChain => "Empty chain",
            Violation::InvalidGenesis => "Invalid genesis block",
            Violation::IndexOutOfSequence => "Index out of sequence",
            Violation::BrokenLink => "Broken chain link",
            Violation::HashMismatch => "Hash mismatch",
        }
    }
}

/// Outcome of walking the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub valid: bool,

    /// Index of the first offending block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invalid_block: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    pub block_count: usize,

    pub message: String,
}

impl VerificationResult {
    pub fn valid(block_count: usize) -> Self {
        Self {
            valid: true,
            invalid_block: None,
            reason: None,
            block_count,
            message: format!("Blockchain is valid ({} blocks verified)", block_count),
        }
    }

    pub fn invalid(index: Option<u64>, violation: Violation, block_count: usize) -> Self {
        let message = match index {
            Some(i) => format!(
                "Blockchain integrity compromised at block {}: {}",
                i,
                violation.reason()
            ),
            None => format!("Blockchain cannot be verified: {}", violation.reason()),
        };
        Self {
            valid: false,
            invalid_block: index,
            reason: Some(violation.reason().to_string()),
            block_count,
            message,
        }
    }
}

/// Aggregate view of the chain, recomputed on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub total_blocks: usize,

    /// Timestamp (ms) of the genesis block.
    pub first_block_time: Option<i64>,

    /// Timestamp (ms) of the chain tail.
    pub last_block_time: Option<i64>,

    /// Block counts keyed by action tag.
    pub action_counts: BTreeMap<String, usize>,

    /// `valid` from a fresh verification pass.
    pub is_valid: bool,

    /// Configured sealing difficulty.
    pub difficulty: u32,

    /// True when the ledger started from an in-memory genesis after a
    /// store failure.
    pub degraded: bool,
}
