//! Error types for the Custos audit ledger.
//!
//! Most ledger failure paths degrade to "best effort, logged" rather than
//! surfacing here. The variants below are the ones a caller can actually
//! observe: startup under a strict policy, store adapters, configuration,
//! and out-of-range demo operations.

use thiserror::Error;

/// The unified error type for the Custos crates.
#[derive(Debug, Error)]
pub enum CustosError {
    /// The chain store could not be reached or read.
    #[error("chain store unavailable: {reason}")]
    StoreUnavailable { reason: String },

    /// The chain store returned data that cannot be interpreted as blocks.
    #[error("chain store corrupted: {reason}")]
    StoreCorrupted { reason: String },

    /// A sealed block could not be written to the chain store.
    ///
    /// The ledger logs this and keeps the in-memory block; it never reaches
    /// the business action that triggered the audit event.
    #[error("failed to persist block {index}: {reason}")]
    PersistFailed { index: u64, reason: String },

    /// A store call did not complete inside its bounded window.
    #[error("chain store call timed out after {millis} ms")]
    StoreTimeout { millis: u64 },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// No block exists at the requested index.
    #[error("block {index} not found (chain length {length})")]
    BlockNotFound { index: u64, length: usize },

    /// The ledger's chain lock was poisoned by a panicking writer.
    #[error("ledger lock poisoned: {reason}")]
    LockPoisoned { reason: String },
}

/// Convenience alias used throughout the Custos crates.
pub type CustosResult<T> = Result<T, CustosError>;
