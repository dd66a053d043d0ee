//! Durable chain store backed by a JSON-lines file.
//!
//! One `StoredBlock` per line, appended and synced on every insert.  The
//! uniqueness indexes are rebuilt from the file on `open`; the file itself
//! is never rewritten.

use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info};

use custos_contracts::{CustosError, CustosResult, StoredBlock};
use custos_core::{ChainStore, InsertOutcome};

#[derive(Debug, Default)]
struct Indexes {
    indices: HashSet<u64>,
    hashes: HashSet<String>,
}

/// An append-only chain store in a single `.jsonl` file.
#[derive(Debug)]
pub struct JsonlChainStore {
    path: PathBuf,
    indexes: Mutex<Indexes>,
}

impl JsonlChainStore {
    /// Open or create the store at `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// `StoreUnavailable` if the file or its directory cannot be created or
    /// read; `StoreCorrupted` if an existing line is not a valid row.
    pub fn open(path: impl AsRef<Path>) -> CustosResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| unavailable(&path, e))?;
        }
        if !path.exists() {
            fs::write(&path, "").map_err(|e| unavailable(&path, e))?;
        }

        let mut indexes = Indexes::default();
        let rows = read_rows(&path)?;
        for row in &rows {
            indexes.indices.insert(row.index);
            indexes.hashes.insert(row.hash.clone());
        }

        info!(path = %path.display(), rows = rows.len(), "chain store opened");
        Ok(Self {
            path,
            indexes: Mutex::new(indexes),
        })
    }

    fn lock(&self) -> CustosResult<MutexGuard<'_, Indexes>> {
        self.indexes.lock().map_err(|e| CustosError::LockPoisoned {
            reason: format!("jsonl chain store lock poisoned: {}", e),
        })
    }
}

impl ChainStore for JsonlChainStore {
    fn load_all(&self) -> CustosResult<Vec<StoredBlock>> {
        // Hold the lock so a concurrent insert cannot leave a half line.
        let _guard = self.lock()?;
        let mut rows = read_rows(&self.path)?;
        rows.sort_by_key(|r| r.index);
        Ok(rows)
    }

    fn insert(&self, record: &StoredBlock) -> CustosResult<InsertOutcome> {
        let mut indexes = self.lock()?;

        if indexes.indices.contains(&record.index) || indexes.hashes.contains(&record.hash) {
            debug!(index = record.index, "duplicate row ignored");
            return Ok(InsertOutcome::Duplicate);
        }

        let persist_err = |reason: String| CustosError::PersistFailed {
            index: record.index,
            reason,
        };

        let mut line = serde_json::to_string(record).map_err(|e| persist_err(e.to_string()))?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| persist_err(e.to_string()))?;
        file.write_all(line.as_bytes())
            .map_err(|e| persist_err(e.to_string()))?;
        file.sync_data().map_err(|e| persist_err(e.to_string()))?;

        indexes.indices.insert(record.index);
        indexes.hashes.insert(record.hash.clone());
        Ok(InsertOutcome::Inserted)
    }

    fn len(&self) -> CustosResult<usize> {
        Ok(self.lock()?.indices.len())
    }
}

fn read_rows(path: &Path) -> CustosResult<Vec<StoredBlock>> {
    let contents = fs::read_to_string(path).map_err(|e| unavailable(path, e))?;

    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| {
            serde_json::from_str::<StoredBlock>(line).map_err(|e| CustosError::StoreCorrupted {
                reason: format!("{} line {}: {}", path.display(), n + 1, e),
            })
        })
        .collect()
}

fn unavailable(path: &Path, err: std::io::Error) -> CustosError {
    CustosError::StoreUnavailable {
        reason: format!("{}: {}", path.display(), err),
    }
}
