//! The persisted form of a block.
//!
//! `StoredBlock` mirrors the chain-store schema field for field.  `details`
//! travels as serialized JSON text; `description` and the ISO timestamp are
//! not stored and are re-derived on load.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    action::AuditAction,
    block::{iso_timestamp, AuditData, Block},
};

/// One row of durable chain storage.
///
/// Stores enforce uniqueness on both `index` and `hash`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredBlock {
    pub index: u64,
    pub hash: String,
    pub previous_hash: String,
    pub action: String,
    pub actor_id: String,
    pub source_address: String,
    /// Serialized JSON of the block's `details` mapping.
    pub details: String,
    pub timestamp: i64,
    pub nonce: u64,
}

impl StoredBlock {
    pub fn from_block(block: &Block) -> Self {
        Self {
            index: block.index,
            hash: block.hash.clone(),
            previous_hash: block.previous_hash.clone(),
            action: block.data.action.to_string(),
            actor_id: block.data.actor_id.clone(),
            source_address: block.data.source_address.clone(),
            details: block.data.details.to_string(),
            timestamp: block.timestamp,
            nonce: block.nonce,
        }
    }

    /// Rebuild the in-memory block.
    ///
    /// Never fails: `details` text that is not valid JSON is kept as a JSON
    /// string so the row still loads (its hash will then fail verification,
    /// which is where corruption gets reported).
    pub fn into_block(self) -> Block {
        let details = serde_json::from_str::<Value>(&self.details)
            .unwrap_or_else(|_| Value::String(self.details.clone()));
        let action = AuditAction::from(self.action);

        Block {
            index: self.index,
            timestamp: self.timestamp,
            data: AuditData {
                description: action.description().to_string(),
                action,
                actor_id: self.actor_id,
                source_address: self.source_address,
                details,
                recorded_at: iso_timestamp(self.timestamp),
            },
            previous_hash: self.previous_hash,
            hash: self.hash,
            nonce: self.nonce,
        }
    }
}
