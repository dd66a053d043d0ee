//! # custos-store
//!
//! `ChainStore` implementations for the Custos audit ledger.
//!
//! - [`InMemoryChainStore`]: volatile, for tests and ephemeral ledgers.
//! - [`JsonlChainStore`]: durable append-only JSON-lines file.
//! - [`BoundedStore`]: wraps either with a per-call timeout.
//!
//! Every store enforces uniqueness on block index and block hash, and
//! reports a repeated insert as `InsertOutcome::Duplicate` rather than an
//! error.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use custos_store::{BoundedStore, JsonlChainStore};
//!
//! let store = BoundedStore::new(JsonlChainStore::open("audit.jsonl")?, Duration::from_secs(2));
//! let ledger = Ledger::new(Box::new(store), sealer, StartupPolicy::FallbackGenesis);
//! ```

pub mod bounded;
pub mod jsonl;
pub mod memory;

pub use bounded::BoundedStore;
pub use jsonl::JsonlChainStore;
pub use memory::InMemoryChainStore;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::Duration;

    use custos_contracts::{CustosError, CustosResult, StoredBlock};
    use custos_core::{ChainStore, InsertOutcome};

    use super::{BoundedStore, InMemoryChainStore, JsonlChainStore};

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn row(index: u64, hash: &str) -> StoredBlock {
        StoredBlock {
            index,
            hash: hash.to_string(),
            previous_hash: "0".repeat(64),
            action: "LOGIN_SUCCESS".to_string(),
            actor_id: "u1".to_string(),
            source_address: "10.0.0.5".to_string(),
            details: r#"{"username":"alice"}"#.to_string(),
            timestamp: 1_700_000_000_000 + index as i64,
            nonce: 3,
        }
    }

    /// A store whose every call takes `delay`.
    struct SlowStore {
        delay: Duration,
    }

    impl ChainStore for SlowStore {
        fn load_all(&self) -> CustosResult<Vec<StoredBlock>> {
            thread::sleep(self.delay);
            Ok(vec![])
        }

        fn insert(&self, _record: &StoredBlock) -> CustosResult<InsertOutcome> {
            thread::sleep(self.delay);
            Ok(InsertOutcome::Inserted)
        }

        fn len(&self) -> CustosResult<usize> {
            thread::sleep(self.delay);
            Ok(0)
        }
    }

    // ── InMemoryChainStore ────────────────────────────────────────────────────

    /// Inserting the same row twice stores it once and does not error.
    #[test]
    fn test_memory_duplicate_insert_is_noop() {
        let store = InMemoryChainStore::new();
        assert_eq!(store.insert(&row(0, "aa")).unwrap(), InsertOutcome::Inserted);
        assert_eq!(store.insert(&row(0, "aa")).unwrap(), InsertOutcome::Duplicate);
        assert_eq!(store.len().unwrap(), 1);
    }

    /// Uniqueness holds on index and on hash independently.
    #[test]
    fn test_memory_unique_index_and_hash() {
        let store = InMemoryChainStore::new();
        store.insert(&row(0, "aa")).unwrap();

        assert_eq!(store.insert(&row(0, "bb")).unwrap(), InsertOutcome::Duplicate);
        assert_eq!(store.insert(&row(1, "aa")).unwrap(), InsertOutcome::Duplicate);
        assert_eq!(store.insert(&row(1, "bb")).unwrap(), InsertOutcome::Inserted);
        assert_eq!(store.len().unwrap(), 2);
    }

    #[test]
    fn test_memory_load_is_index_ordered() {
        let store = InMemoryChainStore::with_rows(vec![row(2, "cc"), row(0, "aa"), row(1, "bb")])
            .unwrap();
        let indices: Vec<u64> = store.load_all().unwrap().iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    // ── JsonlChainStore ───────────────────────────────────────────────────────

    /// Rows written by one handle are visible to a freshly opened one.
    #[test]
    fn test_jsonl_persists_across_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("chain.jsonl");

        {
            let store = JsonlChainStore::open(&path).unwrap();
            store.insert(&row(0, "aa")).unwrap();
            store.insert(&row(1, "bb")).unwrap();
        }

        let reopened = JsonlChainStore::open(&path).unwrap();
        let rows = reopened.load_all().unwrap();
        assert_eq!(rows, vec![row(0, "aa"), row(1, "bb")]);
        assert_eq!(reopened.len().unwrap(), 2);
    }

    /// Duplicate detection survives a reopen and never appends a second line.
    #[test]
    fn test_jsonl_duplicate_after_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chain.jsonl");

        JsonlChainStore::open(&path).unwrap().insert(&row(0, "aa")).unwrap();

        let store = JsonlChainStore::open(&path).unwrap();
        assert_eq!(store.insert(&row(0, "aa")).unwrap(), InsertOutcome::Duplicate);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 1);
    }

    /// A garbage line is reported as corruption with its line number.
    #[test]
    fn test_jsonl_corrupt_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chain.jsonl");
        let good = serde_json::to_string(&row(0, "aa")).unwrap();
        std::fs::write(&path, format!("{good}\nnot-a-row\n")).unwrap();

        match JsonlChainStore::open(&path) {
            Err(CustosError::StoreCorrupted { reason }) => {
                assert!(reason.contains("line 2"), "unexpected reason: {reason}");
            }
            other => panic!("expected StoreCorrupted, got {:?}", other.map(|_| ())),
        }
    }

    // ── BoundedStore ──────────────────────────────────────────────────────────

    #[test]
    fn test_bounded_passes_results_through() {
        let store = BoundedStore::new(InMemoryChainStore::new(), Duration::from_secs(5));
        assert_eq!(store.insert(&row(0, "aa")).unwrap(), InsertOutcome::Inserted);
        assert_eq!(store.insert(&row(0, "aa")).unwrap(), InsertOutcome::Duplicate);
        assert_eq!(store.load_all().unwrap().len(), 1);
    }

    /// A store slower than the window yields `StoreTimeout`.
    #[test]
    fn test_bounded_times_out() {
        let slow = SlowStore { delay: Duration::from_millis(500) };
        let store = BoundedStore::new(slow, Duration::from_millis(20));

        match store.insert(&row(0, "aa")) {
            Err(CustosError::StoreTimeout { millis }) => assert_eq!(millis, 20),
            other => panic!("expected StoreTimeout, got {:?}", other),
        }
    }
}
