//! # custos-chain
//!
//! Pure, stateless chain primitives for the Custos audit ledger:
//!
//! - [`hash_block`]: SHA-256 over a block's fields with canonical JSON data.
//! - [`ProofOfWorkSealer`]: bounded nonce search with best-effort fallback.
//! - [`verify_chain`]: first-violation integrity walk.
//! - [`summarize`]: derived chain statistics.
//!
//! Nothing here performs I/O or holds state; every function is safe to call
//! from any number of threads without coordination.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use custos_chain::{ProofOfWorkSealer, verify_chain};
//!
//! let sealer = ProofOfWorkSealer::new(2, 1000);
//! let seal = sealer.seal(index, timestamp, &data, &previous_hash);
//! assert!(verify_chain(&blocks).valid);
//! ```

pub mod hash;
pub mod seal;
pub mod stats;
pub mod verify;

pub use hash::{canonical_data, hash_block, rehash};
pub use seal::{meets_difficulty, ProofOfWorkSealer, Seal};
pub use stats::summarize;
pub use verify::verify_chain;

// ── Tests ─────────────────────────────────────────────────────────────────────
