//! Timeout wrapper for any `ChainStore`.
//!
//! The ledger calls its store inside the single-writer section.  A store
//! that hangs would stall every audit event in the process, so
//! `BoundedStore` runs each call on a helper thread and gives up after a
//! fixed window.  A call that times out keeps running in the background;
//! its result is discarded.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::warn;

use custos_contracts::{CustosError, CustosResult, StoredBlock};
use custos_core::{ChainStore, InsertOutcome};

/// Wraps a store so that no call blocks longer than `timeout`.
pub struct BoundedStore<S> {
    inner: Arc<S>,
    timeout: Duration,
}

impl<S: ChainStore + 'static> BoundedStore<S> {
    pub fn new(inner: S, timeout: Duration) -> Self {
        Self {
            inner: Arc::new(inner),
            timeout,
        }
    }

    fn run<T, F>(&self, op: &'static str, call: F) -> CustosResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&S) -> CustosResult<T> + Send + 'static,
    {
        let (tx, rx) = mpsc::sync_channel(1);
        let inner = Arc::clone(&self.inner);

        thread::Builder::new()
            .name(format!("custos-store-{op}"))
            .spawn(move || {
                // The receiver is gone if the caller already timed out.
                let _ = tx.send(call(inner.as_ref()));
            })
            .map_err(|e| CustosError::StoreUnavailable {
                reason: format!("failed to spawn store worker: {}", e),
            })?;

        match rx.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                let millis = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
                warn!(op, timeout_ms = millis, "chain store call timed out");
                Err(CustosError::StoreTimeout { millis })
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(CustosError::StoreUnavailable {
                reason: format!("store worker for '{op}' exited without a result"),
            }),
        }
    }
}

impl<S: ChainStore + 'static> ChainStore for BoundedStore<S> {
    fn load_all(&self) -> CustosResult<Vec<StoredBlock>> {
        self.run("load", |store| store.load_all())
    }

    fn insert(&self, record: &StoredBlock) -> CustosResult<InsertOutcome> {
        let record = record.clone();
        self.run("insert", move |store| store.insert(&record))
    }

    fn len(&self) -> CustosResult<usize> {
        self.run("len", |store| store.len())
    }
}
