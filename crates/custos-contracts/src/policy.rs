//! Startup policy for a ledger whose chain store cannot be read.

use serde::{Deserialize, Serialize};

/// What `Ledger::initialize` does when loading from the chain store fails.
///
/// Expressed in TOML as kebab-case:
/// ```toml
/// on_store_error = "fallback-genesis"
/// on_store_error = "fail"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StartupPolicy {
    /// Start from a fresh in-memory genesis block and flag the ledger as
    /// degraded.  Prefers availability; can mask a real storage outage.
    #[default]
    FallbackGenesis,

    /// Refuse to start.  Requires operator intervention.
    Fail,
}
