//! Block and audit-record types.
//!
//! A `Block` is one sealed entry in the audit chain.  Its JSON form is the
//! shape the portal UI consumes:
//!
//! ```json
//! { "index": 1, "timestamp": 1700000000000,
//!   "data": { "action": "LOGIN_SUCCESS", "description": "...", "userId": "u1",
//!             "ip": "10.0.0.5", "details": { ... }, "timestamp": "2023-11-14T22:13:20.000Z" },
//!   "previousHash": "...", "hash": "...", "nonce": 17 }
//! ```

use std::fmt::Debug;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::action::AuditAction;

/// The sentinel `previous_hash` carried by the genesis block: 64 hex zeros.
pub const GENESIS_PREVIOUS_HASH: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

/// Actor recorded on blocks the ledger creates on its own behalf.
pub const SYSTEM_ACTOR: &str = "system";

/// Actor recorded when a collaborator has no authenticated principal.
pub const UNKNOWN_ACTOR: &str = "unknown";

/// One sealed, hash-linked audit record.
///
/// Immutable once sealed.  Changing any field of `data`, `index`,
/// `timestamp`, `previous_hash` or `nonce` invalidates `hash`, which
/// chain verification detects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Position in the chain; the genesis block is 0.
    pub index: u64,

    /// Milliseconds since the Unix epoch, assigned at seal time.
    pub timestamp: i64,

    /// The audit record this block carries.
    pub data: AuditData,

    /// `hash` of the block at `index - 1`, or `GENESIS_PREVIOUS_HASH`.
    pub previous_hash: String,

    /// Lowercase hex SHA-256 over (index, timestamp, data, previous_hash, nonce).
    pub hash: String,

    /// The nonce chosen by the sealer.
    pub nonce: u64,
}

/// The structured audit payload of a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditData {
    pub action: AuditAction,

    /// Derived from `action`; never supplied by collaborators.
    pub description: String,

    /// Principal that performed the action, or `"system"` / `"unknown"`.
    #[serde(rename = "userId")]
    pub actor_id: String,

    /// Network address the triggering request came from.
    #[serde(rename = "ip")]
    pub source_address: String,

    /// Free-form JSON mapping supplied by the collaborator.
    pub details: Value,

    /// ISO-8601 rendering of the block timestamp.
    #[serde(rename = "timestamp")]
    pub recorded_at: String,
}

impl AuditData {
    /// Build the payload for a block sealed at `timestamp_ms`.
    pub fn new(
        action: AuditAction,
        actor_id: impl Into<String>,
        source_address: impl Into<String>,
        details: AuditDetails,
        timestamp_ms: i64,
    ) -> Self {
        let action = action.canonical();
        let description = action.description().to_string();
        Self {
            action,
            description,
            actor_id: actor_id.into(),
            source_address: source_address.into(),
            details: details.into_value(),
            recorded_at: iso_timestamp(timestamp_ms),
        }
    }
}

/// Render epoch milliseconds as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
///
/// Out-of-range values fall back to the epoch rather than failing.
pub fn iso_timestamp(timestamp_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(timestamp_ms)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// A normalized `details` mapping.
///
/// Collaborators may hand over anything serializable.  Objects pass through
/// unchanged, `null` becomes an empty object, any other JSON value is wrapped
/// as `{"value": …}`, and values that fail to serialize are recorded as their
/// debug representation under the same key.  Construction never fails.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AuditDetails(Map<String, Value>);

impl AuditDetails {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Normalize an arbitrary serializable value.
    pub fn from_serializable<T>(value: &T) -> Self
    where
        T: Serialize + Debug + ?Sized,
    {
        match serde_json::to_value(value) {
            Ok(json) => Self::from(json),
            Err(_) => Self::wrap(Value::String(format!("{:?}", value))),
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    fn wrap(value: Value) -> Self {
        let mut map = Map::new();
        map.insert("value".to_string(), value);
        Self(map)
    }
}

impl From<Value> for AuditDetails {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            Value::Null => Self::empty(),
            other => Self::wrap(other),
        }
    }
}

impl From<Map<String, Value>> for AuditDetails {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
