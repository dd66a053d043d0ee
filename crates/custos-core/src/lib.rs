//! # custos-core
//!
//! The audit ledger core for the Custos RBAC portal.
//!
//! This crate provides:
//! - The `ChainStore` trait, the persistence seam
//! - The `Ledger`, which owns the in-memory chain and serializes appends
//!
//! Tamper simulation (`Ledger::simulate_tamper`) is compiled only with the
//! `tamper-demo` feature.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use custos_core::Ledger;
//!
//! let ledger = Ledger::new(Box::new(store), ProofOfWorkSealer::default(), StartupPolicy::Fail);
//! ledger.initialize()?;
//! ledger.record("u1", "LOGIN_SUCCESS", "10.0.0.5", AuditDetails::from(json!({ "username": "alice" })));
//! assert!(ledger.verify().valid);
//! ```

pub mod ledger;
pub mod traits;

pub use ledger::Ledger;
pub use traits::{ChainStore, InsertOutcome};
