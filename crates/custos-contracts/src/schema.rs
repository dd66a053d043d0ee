//! JSON Schema for the block wire shape.
//!
//! The portal UI renders blocks straight from this JSON.  Publishing the
//! schema lets consumers check compatibility without reading Rust types.

use serde_json::{json, Value};

/// Draft 2020-12 schema describing a serialized `Block`.
pub fn block_schema() -> Value {
    let hex64 = json!({ "type": "string", "pattern": "^[0-9a-f]{64}$" });

    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "Block",
        "type": "object",
        "required": ["index", "timestamp", "data", "previousHash", "hash", "nonce"],
        "properties": {
            "index": { "type": "integer", "minimum": 0 },
            "timestamp": { "type": "integer" },
            "previousHash": hex64,
            "hash": hex64,
            "nonce": { "type": "integer", "minimum": 0 },
            "data": {
                "type": "object",
                "required": ["action", "description", "userId", "ip", "details", "timestamp"],
                "properties": {
                    "action": { "type": "string", "minLength": 1 },
                    "description": { "type": "string" },
                    "userId": { "type": "string" },
                    "ip": { "type": "string" },
                    "details": {},
                    "timestamp": { "type": "string" }
                }
            }
        }
    })
}
