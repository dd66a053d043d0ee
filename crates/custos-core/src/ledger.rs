//! The audit ledger: the single owner of the in-memory chain.
//!
//! Every append runs the whole sequence
//!
//!   initialize? → tail lookup → seal → extend in-memory chain → persist
//!
//! under one write lock, so concurrent callers can never seal two blocks
//! against the same tail.  Reads take the read lock and observe a complete
//! prefix of the chain.
//!
//! The in-memory chain is authoritative for the running process.  A failed
//! store write is logged and the block is kept; restart-time rehydration is
//! the recovery path.
//!
//! A degraded ledger (startup could not read the store) never writes to the
//! store.  Its chain starts from a genesis the store has never seen, so any
//! row it wrote would collide with or dangle from the durable history.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use serde_json::json;
use tracing::{debug, error, info, warn};

use custos_chain::{summarize, verify_chain, ProofOfWorkSealer};
use custos_contracts::{
    block::{SYSTEM_ACTOR, UNKNOWN_ACTOR},
    AuditAction, AuditData, AuditDetails, Block, CustosError, CustosResult, StartupPolicy,
    StatsSummary, StoredBlock, VerificationResult, GENESIS_PREVIOUS_HASH,
};

use crate::traits::{ChainStore, InsertOutcome};

/// Source address recorded on the genesis block.
const GENESIS_SOURCE_ADDRESS: &str = "127.0.0.1";

/// Mutable interior of a `Ledger`, guarded by its `RwLock`.
#[derive(Debug, Default)]
pub(crate) struct LedgerState {
    /// Sealed blocks in index order.
    pub(crate) blocks: Vec<Block>,

    pub(crate) initialized: bool,

    /// Set when startup fell back to an in-memory genesis block.
    pub(crate) degraded: bool,
}

/// The append-only, hash-linked audit ledger.
///
/// Construct once at process start and share by reference (typically
/// `Arc<Ledger>`) with every request handler that emits audit events.
///
/// # Thread safety
///
/// `append` holds the write lock from tail lookup through persistence.
/// Read methods hold the read lock only long enough to clone or scan.
pub struct Ledger {
    store: Box<dyn ChainStore>,
    sealer: ProofOfWorkSealer,
    startup_policy: StartupPolicy,
    pub(crate) state: RwLock<LedgerState>,
}

impl Ledger {
    /// Create an uninitialized ledger.  Nothing is read from `store` until
    /// `initialize` or the first `append`.
    pub fn new(
        store: Box<dyn ChainStore>,
        sealer: ProofOfWorkSealer,
        startup_policy: StartupPolicy,
    ) -> Self {
        Self {
            store,
            sealer,
            startup_policy,
            state: RwLock::new(LedgerState::default()),
        }
    }

    /// Load the chain from the store, or create the genesis block if the
    /// store is empty.  Idempotent.
    ///
    /// Loaded blocks are not re-sealed or re-verified; call `verify` for that.
    ///
    /// # Errors
    ///
    /// With `StartupPolicy::Fail`, a store read failure is returned and the
    /// ledger stays uninitialized.  With `StartupPolicy::FallbackGenesis` the
    /// ledger starts from a fresh in-memory genesis block, is flagged as
    /// degraded, and this returns `Ok`.
    pub fn initialize(&self) -> CustosResult<()> {
        let mut state = self.write_state()?;
        self.initialize_locked(&mut state)
    }

    /// Seal and append one audit event.
    ///
    /// Initializes the ledger first if needed.  `action` accepts any tag;
    /// unknown tags are recorded verbatim with a generic description.  An
    /// empty `actor_id` is recorded as `"unknown"`.
    ///
    /// A store write failure does not fail the append: it is logged and the
    /// block stays in the in-memory chain.  A degraded ledger keeps blocks in
    /// memory only.
    ///
    /// # Errors
    ///
    /// Only when initialization fails under `StartupPolicy::Fail`, or the
    /// chain lock is poisoned.
    pub fn append(
        &self,
        actor_id: &str,
        action: impl Into<AuditAction>,
        source_address: &str,
        details: AuditDetails,
    ) -> CustosResult<Block> {
        let mut state = self.write_state()?;
        self.initialize_locked(&mut state)?;

        let actor_id = if actor_id.is_empty() { UNKNOWN_ACTOR } else { actor_id };
        let block = self.seal_next(&state.blocks, action.into(), actor_id, source_address, details);

        state.blocks.push(block.clone());
        self.persist(&state, &block);

        debug!(
            index = block.index,
            action = %block.data.action,
            actor_id = %block.data.actor_id,
            hash = %block.hash,
            "audit block appended"
        );

        Ok(block)
    }

    /// Fire-and-forget variant of `append` for audit event sources.
    ///
    /// Never returns an error: any failure is logged and yields `None`, so an
    /// audit hiccup can never fail the business action being audited.
    pub fn record(
        &self,
        actor_id: &str,
        action: impl Into<AuditAction>,
        source_address: &str,
        details: AuditDetails,
    ) -> Option<Block> {
        let action = action.into();
        match self.append(actor_id, action.clone(), source_address, details) {
            Ok(block) => Some(block),
            Err(err) => {
                error!(
                    action = %action,
                    actor_id = %actor_id,
                    error = %err,
                    "audit event dropped"
                );
                None
            }
        }
    }

    // ── Reads ────────────────────────────────────────────────────────────────

    /// The full chain, genesis first.
    pub fn get_chain(&self) -> Vec<Block> {
        self.read_state().blocks.clone()
    }

    /// The last `limit` blocks, most recent first.
    pub fn get_recent(&self, limit: usize) -> Vec<Block> {
        self.read_state()
            .blocks
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn get_block(&self, index: u64) -> Option<Block> {
        let state = self.read_state();
        usize::try_from(index)
            .ok()
            .and_then(|i| state.blocks.get(i))
            .cloned()
    }

    /// Walk the chain and report the first invariant violation, if any.
    pub fn verify(&self) -> VerificationResult {
        verify_chain(&self.read_state().blocks)
    }

    /// Aggregate statistics, recomputed on every call.
    pub fn stats(&self) -> StatsSummary {
        let state = self.read_state();
        summarize(&state.blocks, self.sealer.difficulty(), state.degraded)
    }

    pub fn len(&self) -> usize {
        self.read_state().blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Hash of the current chain tail.
    pub fn tail_hash(&self) -> Option<String> {
        self.read_state().blocks.last().map(|b| b.hash.clone())
    }

    pub fn is_initialized(&self) -> bool {
        self.read_state().initialized
    }

    /// True when startup could not read the store and fell back to an
    /// in-memory genesis block.
    pub fn is_degraded(&self) -> bool {
        self.read_state().degraded
    }

    // ── Tamper simulation ────────────────────────────────────────────────────

    /// Mutate the `details` of block `index` in place without resealing it
    /// or any descendant.
    ///
    /// Exists only to demonstrate that `verify` detects corruption.  The
    /// change is never persisted.
    #[cfg(any(test, feature = "tamper-demo"))]
    pub fn simulate_tamper(&self, index: u64) -> CustosResult<Block> {
        let mut state = self.write_state()?;
        let length = state.blocks.len();

        let position = usize::try_from(index)
            .ok()
            .filter(|&i| i < length)
            .ok_or(CustosError::BlockNotFound { index, length })?;
        let block = &mut state.blocks[position];

        match block.data.details.as_object_mut() {
            Some(details) => {
                details.insert("tampered".to_string(), json!(true));
            }
            None => block.data.details = json!({ "tampered": true }),
        }

        warn!(index, "audit block tampered in memory (simulation)");
        Ok(block.clone())
    }

    // ── Internals ────────────────────────────────────────────────────────────

    fn initialize_locked(&self, state: &mut LedgerState) -> CustosResult<()> {
        if state.initialized {
            return Ok(());
        }

        match self.store.load_all() {
            Ok(rows) if !rows.is_empty() => {
                let mut blocks: Vec<Block> = rows.into_iter().map(StoredBlock::into_block).collect();
                blocks.sort_by_key(|b| b.index);

                info!(
                    block_count = blocks.len(),
                    tail_hash = %blocks.last().map(|b| b.hash.as_str()).unwrap_or_default(),
                    "audit chain rehydrated from store"
                );
                state.blocks = blocks;
            }
            Ok(_) => {
                let genesis = self.create_genesis();
                self.persist(state, &genesis);
                info!(hash = %genesis.hash, "genesis block created");
                state.blocks = vec![genesis];
            }
            Err(err) => match self.startup_policy {
                StartupPolicy::Fail => {
                    error!(error = %err, "chain store unreadable at startup; refusing to start");
                    return Err(err);
                }
                StartupPolicy::FallbackGenesis => {
                    warn!(
                        error = %err,
                        "chain store unreadable at startup; running DEGRADED from an in-memory genesis block, store writes suspended"
                    );
                    state.blocks = vec![self.create_genesis()];
                    state.degraded = true;
                }
            },
        }

        state.initialized = true;
        Ok(())
    }

    fn create_genesis(&self) -> Block {
        self.seal_next(
            &[],
            AuditAction::GenesisBlock,
            SYSTEM_ACTOR,
            GENESIS_SOURCE_ADDRESS,
            AuditDetails::from(json!({ "message": "Audit chain initialized" })),
        )
    }

    /// Seal the block that would follow `blocks`.
    fn seal_next(
        &self,
        blocks: &[Block],
        action: AuditAction,
        actor_id: &str,
        source_address: &str,
        details: AuditDetails,
    ) -> Block {
        let index = blocks.len() as u64;
        let timestamp = Utc::now().timestamp_millis();
        let previous_hash = blocks
            .last()
            .map(|b| b.hash.clone())
            .unwrap_or_else(|| GENESIS_PREVIOUS_HASH.to_string());

        let data = AuditData::new(action, actor_id, source_address, details, timestamp);
        let seal = self.sealer.seal(index, timestamp, &data, &previous_hash);

        Block {
            index,
            timestamp,
            data,
            previous_hash,
            hash: seal.hash,
            nonce: seal.nonce,
        }
    }

    /// Write `block` to the store, logging instead of failing.  Skipped
    /// entirely while degraded.
    fn persist(&self, state: &LedgerState, block: &Block) {
        if state.degraded {
            debug!(index = block.index, "ledger degraded; block kept in memory only");
            return;
        }

        match self.store.insert(&StoredBlock::from_block(block)) {
            Ok(InsertOutcome::Inserted) => {}
            Ok(InsertOutcome::Duplicate) => {
                warn!(
                    index = block.index,
                    hash = %block.hash,
                    "block already present in chain store; insert skipped"
                );
            }
            Err(err) => {
                warn!(
                    index = block.index,
                    error = %err,
                    "failed to persist audit block; keeping in-memory copy"
                );
            }
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, LedgerState> {
        // A panicked writer never leaves a half-built block behind: the
        // chain is only ever extended by a single push.
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> CustosResult<RwLockWriteGuard<'_, LedgerState>> {
        self.state.write().map_err(|e| CustosError::LockPoisoned {
            reason: e.to_string(),
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
