//! The persistence seam of the audit ledger.
//!
//! The ledger owns the in-memory chain; a `ChainStore` owns the durable copy
//! and is the source of truth at startup.  Implementations live in
//! `custos-store` (or in the embedding application).

use std::sync::Arc;

use custos_contracts::{CustosResult, StoredBlock};

/// What happened to a row handed to `ChainStore::insert`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The row was written.
    Inserted,
    /// A row with the same index or the same hash already exists; nothing
    /// was written.
    Duplicate,
}

/// Durable, append-only storage of sealed blocks.
///
/// Implementations must enforce uniqueness on both `index` and `hash`, and
/// must treat a duplicate insert as a successful no-op so that replaying
/// history after a restart never double-writes a block.
pub trait ChainStore: Send + Sync {
    /// Every persisted row, ordered by ascending index.
    fn load_all(&self) -> CustosResult<Vec<StoredBlock>>;

    /// Append one row.  Duplicates return `Ok(InsertOutcome::Duplicate)`.
    fn insert(&self, record: &StoredBlock) -> CustosResult<InsertOutcome>;

    /// Number of persisted rows.
    fn len(&self) -> CustosResult<usize>;

    fn is_empty(&self) -> CustosResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl<T: ChainStore + ?Sized> ChainStore for Arc<T> {
    fn load_all(&self) -> CustosResult<Vec<StoredBlock>> {
        (**self).load_all()
    }

    fn insert(&self, record: &StoredBlock) -> CustosResult<InsertOutcome> {
        (**self).insert(record)
    }

    fn len(&self) -> CustosResult<usize> {
        (**self).len()
    }
}
