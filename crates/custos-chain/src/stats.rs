//! Chain statistics.

use std::collections::BTreeMap;

use custos_contracts::{Block, StatsSummary};

use crate::verify::verify_chain;

/// Aggregate `blocks` into a `StatsSummary`.
///
/// Recomputed from scratch on every call, including a full verification
/// pass; there are no incremental counters to drift out of sync.
pub fn summarize(blocks: &[Block], difficulty: u32, degraded: bool) -> StatsSummary {
    let mut action_counts = BTreeMap::new();
    for block in blocks {
        *action_counts
            .entry(block.data.action.to_string())
            .or_insert(0) += 1;
    }

    StatsSummary {
        total_blocks: blocks.len(),
        first_block_time: blocks.first().map(|b| b.timestamp),
        last_block_time: blocks.last().map(|b| b.timestamp),
        action_counts,
        is_valid: verify_chain(blocks).valid,
        difficulty,
        degraded,
    }
}
