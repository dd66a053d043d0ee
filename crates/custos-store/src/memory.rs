//! In-memory implementation of `ChainStore`.
//!
//! `InMemoryChainStore` keeps rows in a `BTreeMap` keyed by index plus a
//! hash set, both behind one `Mutex`.  Nothing survives the process; use it
//! for tests and as a volatile store.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use tracing::debug;

use custos_contracts::{CustosError, CustosResult, StoredBlock};
use custos_core::{ChainStore, InsertOutcome};

// ── Internal mutable state ────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct InMemoryState {
    /// Rows keyed by block index; iteration is index order.
    rows: BTreeMap<u64, StoredBlock>,

    /// Every stored hash, for the hash uniqueness constraint.
    hashes: HashSet<String>,
}

// ── Public store ──────────────────────────────────────────────────────────────

/// A volatile chain store with unique index and hash constraints.
#[derive(Debug, Default)]
pub struct InMemoryChainStore {
    state: Mutex<InMemoryState>,
}

impl InMemoryChainStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with existing rows, skipping duplicates.
    pub fn with_rows(rows: impl IntoIterator<Item = StoredBlock>) -> CustosResult<Self> {
        let store = Self::new();
        for row in rows {
            store.insert(&row)?;
        }
        Ok(store)
    }

    fn lock(&self) -> CustosResult<MutexGuard<'_, InMemoryState>> {
        self.state.lock().map_err(|e| CustosError::LockPoisoned {
            reason: format!("in-memory chain store lock poisoned: {}", e),
        })
    }
}

impl ChainStore for InMemoryChainStore {
    fn load_all(&self) -> CustosResult<Vec<StoredBlock>> {
        let state = self.lock()?;
        Ok(state.rows.values().cloned().collect())
    }

    fn insert(&self, record: &StoredBlock) -> CustosResult<InsertOutcome> {
        let mut state = self.lock()?;

        if state.rows.contains_key(&record.index) || state.hashes.contains(&record.hash) {
            debug!(index = record.index, "duplicate row ignored");
            return Ok(InsertOutcome::Duplicate);
        }

        state.hashes.insert(record.hash.clone());
        state.rows.insert(record.index, record.clone());
        Ok(InsertOutcome::Inserted)
    }

    fn len(&self) -> CustosResult<usize> {
        Ok(self.lock()?.rows.len())
    }
}
