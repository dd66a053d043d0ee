//! Loading and validating `LedgerConfig`.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use custos_chain::ProofOfWorkSealer;
use custos_contracts::{CustosError, CustosResult, StartupPolicy};

use crate::sections::{SealingSection, StartupSection, StoreSection};

/// Longest meaningful difficulty: a SHA-256 hex digest has 64 characters.
const MAX_DIFFICULTY: u32 = 64;

/// Top-level ledger configuration.
///
/// Construct via `from_toml_str`, `from_file`, or `Default`, then build the
/// ledger's collaborators from the accessors.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub sealing: SealingSection,
    pub startup: StartupSection,
    pub store: StoreSection,
}

impl LedgerConfig {
    /// Parse `s` as TOML and validate it.
    ///
    /// Returns `CustosError::ConfigError` if the TOML is malformed, does not
    /// match the schema, or holds an out-of-range value.
    pub fn from_toml_str(s: &str) -> CustosResult<Self> {
        let config: LedgerConfig = toml::from_str(s).map_err(|e| CustosError::ConfigError {
            reason: format!("failed to parse ledger config TOML: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read the file at `path` and parse it as ledger configuration.
    pub fn from_file(path: &Path) -> CustosResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| CustosError::ConfigError {
            reason: format!("failed to read ledger config file '{}': {}", path.display(), e),
        })?;
        let config = Self::from_toml_str(&contents)?;
        debug!(path = %path.display(), "ledger config loaded");
        Ok(config)
    }

    /// Reject values that would make the ledger unusable.
    pub fn validate(&self) -> CustosResult<()> {
        if self.sealing.difficulty > MAX_DIFFICULTY {
            return Err(config_error(format!(
                "sealing.difficulty must be at most {}, got {}",
                MAX_DIFFICULTY, self.sealing.difficulty
            )));
        }
        if self.sealing.max_attempts == 0 {
            return Err(config_error("sealing.max_attempts must be at least 1".to_string()));
        }
        if self.store.timeout_ms == 0 {
            return Err(config_error("store.timeout_ms must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn sealer(&self) -> ProofOfWorkSealer {
        ProofOfWorkSealer::new(self.sealing.difficulty, self.sealing.max_attempts)
    }

    pub fn startup_policy(&self) -> StartupPolicy {
        self.startup.on_store_error
    }

    pub fn store_path(&self) -> &Path {
        &self.store.path
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store.timeout_ms)
    }
}

fn config_error(reason: String) -> CustosError {
    CustosError::ConfigError { reason }
}
