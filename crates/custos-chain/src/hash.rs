//! Block hashing.
//!
//! Every field that contributes to a block's hash is listed explicitly so
//! nothing is accidentally omitted.
//!
//! Hash input layout (bytes, in order):
//!   1. index as 8-byte little-endian
//!   2. timestamp (ms) as 8-byte little-endian
//!   3. canonical JSON of data (object keys sorted at every depth)
//!   4. previous_hash as UTF-8 bytes (64 ASCII hex chars)
//!   5. nonce as 8-byte little-endian

use serde_json::{json, Map, Value};
use sha2::{Digest, Sha256};

use custos_contracts::{AuditData, Block};

/// Compute the SHA-256 hash for a candidate block.
///
/// Deterministic: the same logical `data` always hashes identically, even
/// after a storage round trip that reorders map keys.
///
/// Returns a lowercase 64-character hex string.
pub fn hash_block(
    index: u64,
    timestamp: i64,
    data: &AuditData,
    previous_hash: &str,
    nonce: u64,
) -> String {
    let data_json = canonical_data(data);

    let mut hasher = Sha256::new();
    hasher.update(index.to_le_bytes());
    hasher.update(timestamp.to_le_bytes());
    hasher.update(data_json.as_bytes());
    hasher.update(previous_hash.as_bytes());
    hasher.update(nonce.to_le_bytes());

    hex::encode(hasher.finalize())
}

/// Recompute the hash of an existing block from its stored fields.
pub fn rehash(block: &Block) -> String {
    hash_block(
        block.index,
        block.timestamp,
        &block.data,
        &block.previous_hash,
        block.nonce,
    )
}

/// Canonical JSON text for `data`.
pub fn canonical_data(data: &AuditData) -> String {
    let value = json!({
        "action": data.action.as_str(),
        "description": data.description,
        "userId": data.actor_id,
        "ip": data.source_address,
        "details": data.details,
        "timestamp": data.recorded_at,
    });
    canonicalize(&value).to_string()
}

/// Rebuild `value` with object keys inserted in sorted order.
///
/// Makes the output independent of whether serde_json keeps insertion order.
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();

            let mut sorted = Map::new();
            for key in keys {
                sorted.insert(key.clone(), canonicalize(&map[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}
