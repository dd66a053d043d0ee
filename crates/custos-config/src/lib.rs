//! # custos-config
//!
//! TOML-driven configuration for the Custos audit ledger.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use custos_config::LedgerConfig;
//!
//! let config = LedgerConfig::from_file(Path::new("custos.toml"))?;
//! let ledger = Ledger::new(Box::new(store), config.sealer(), config.startup_policy());
//! ```
//!
//! Every section and field is optional; omitted values fall back to the
//! defaults in [`sections`].

pub mod loader;
pub mod sections;

pub use loader::LedgerConfig;
pub use sections::{SealingSection, StartupSection, StoreSection};

// ── Tests ─────────────────────────────────────────────────────────────────────
