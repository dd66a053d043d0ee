//! Proof-of-work block sealing.
//!
//! Difficulty here is a demonstration knob, not a security control: the
//! ledger has a single writer and no adversarial miners.  When the nonce
//! budget runs out the sealer accepts the final attempt instead of failing,
//! so an audit event is never lost because a hash prefix was not found.

use tracing::{debug, warn};

use custos_contracts::AuditData;

use crate::hash::hash_block;

/// Nonce budget used when none is configured.
pub const DEFAULT_MAX_ATTEMPTS: u64 = 1000;

/// Difficulty used when none is configured.
pub const DEFAULT_DIFFICULTY: u32 = 2;

/// The result of sealing a candidate block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seal {
    pub hash: String,
    pub nonce: u64,
    /// False when the budget ran out and the final attempt was accepted.
    pub met_difficulty: bool,
}

/// Returns true if `hash` starts with `difficulty` literal `'0'` characters.
pub fn meets_difficulty(hash: &str, difficulty: u32) -> bool {
    let difficulty = difficulty as usize;
    hash.len() >= difficulty && hash.bytes().take(difficulty).all(|b| b == b'0')
}

/// Bounded nonce search over `hash_block`.
///
/// Stateless and `Copy`; safe to share across any number of threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProofOfWorkSealer {
    difficulty: u32,
    max_attempts: u64,
}

impl Default for ProofOfWorkSealer {
    fn default() -> Self {
        Self::new(DEFAULT_DIFFICULTY, DEFAULT_MAX_ATTEMPTS)
    }
}

impl ProofOfWorkSealer {
    /// A budget of zero is raised to one: at least one hash is always computed.
    pub fn new(difficulty: u32, max_attempts: u64) -> Self {
        Self {
            difficulty,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    pub fn max_attempts(&self) -> u64 {
        self.max_attempts
    }

    /// Find a nonce whose hash satisfies the difficulty predicate.
    ///
    /// Tries nonces `0..max_attempts` in order and returns the first hit.
    /// If none hits, returns the hash and nonce of the final attempt with
    /// `met_difficulty == false`.
    pub fn seal(&self, index: u64, timestamp: i64, data: &AuditData, previous_hash: &str) -> Seal {
        let mut nonce = 0;
        loop {
            let hash = hash_block(index, timestamp, data, previous_hash, nonce);

            if meets_difficulty(&hash, self.difficulty) {
                debug!(index, nonce, difficulty = self.difficulty, "block sealed");
                return Seal { hash, nonce, met_difficulty: true };
            }

            if nonce + 1 >= self.max_attempts {
                warn!(
                    index,
                    nonce,
                    difficulty = self.difficulty,
                    max_attempts = self.max_attempts,
                    "nonce budget exhausted; accepting best-effort seal"
                );
                return Seal { hash, nonce, met_difficulty: false };
            }

            nonce += 1;
        }
    }
}
