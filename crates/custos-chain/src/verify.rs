//! Chain integrity verification.

use tracing::warn;

use custos_contracts::{Block, VerificationResult, Violation, GENESIS_PREVIOUS_HASH};

use crate::hash::rehash;

/// Verify the integrity of a chain.
///
/// Block 0 must carry index 0, the genesis sentinel as `previous_hash`, and
/// a hash that matches its own fields.  Every later block is then checked
/// against three rules, in this order:
///
/// 1. **Sequence**: `index` equals the block's position.
/// 2. **Link**: `previous_hash` equals the predecessor's stored `hash`.
/// 3. **Hash correctness**: `hash` matches the value recomputed from the
///    block's own fields.
///
/// Stops at the first violation.  Everything downstream of a break is
/// already untrustworthy, so further reporting adds nothing.
///
/// An empty chain is invalid: a ledger always has a genesis block.
pub fn verify_chain(blocks: &[Block]) -> VerificationResult {
    let count = blocks.len();

    let Some(genesis) = blocks.first() else {
        return VerificationResult::invalid(None, Violation::EmptyChain, 0);
    };

    if genesis.index != 0 || genesis.previous_hash != GENESIS_PREVIOUS_HASH {
        return fail(0, Violation::InvalidGenesis, count);
    }
    if genesis.hash != rehash(genesis) {
        return fail(0, Violation::HashMismatch, count);
    }

    for (position, pair) in blocks.windows(2).enumerate() {
        let (previous, current) = (&pair[0], &pair[1]);
        let position = position as u64 + 1;

        if current.index != position {
            return fail(position, Violation::IndexOutOfSequence, count);
        }
        if current.previous_hash != previous.hash {
            return fail(position, Violation::BrokenLink, count);
        }
        if current.hash != rehash(current) {
            return fail(position, Violation::HashMismatch, count);
        }
    }

    VerificationResult::valid(count)
}

fn fail(index: u64, violation: Violation, count: usize) -> VerificationResult {
    warn!(
        block = index,
        reason = violation.reason(),
        block_count = count,
        "audit chain verification failed"
    );
    VerificationResult::invalid(Some(index), violation, count)
}
