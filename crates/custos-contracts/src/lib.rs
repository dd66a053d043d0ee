//! # custos-contracts
//!
//! Shared types and error definitions for the Custos audit ledger.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate, only data definitions, their wire/storage shapes, and the
//! error type.

pub mod action;
pub mod block;
pub mod error;
pub mod policy;
pub mod record;
pub mod report;
pub mod schema;

pub use action::AuditAction;
pub use block::{AuditData, AuditDetails, Block, GENESIS_PREVIOUS_HASH};
pub use error::{CustosError, CustosResult};
pub use policy::StartupPolicy;
pub use record::StoredBlock;
pub use report::{StatsSummary, VerificationResult, Violation};
pub use schema::block_schema;

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample_block() -> Block {
        let data = AuditData::new(
            AuditAction::LoginSuccess,
            "u1",
            "10.0.0.5",
            AuditDetails::from(json!({ "username": "alice" })),
            1_700_000_000_000,
        );
        Block {
            index: 1,
            timestamp: 1_700_000_000_000,
            data,
            previous_hash: "ab".repeat(32),
            hash: "cd".repeat(32),
            nonce: 17,
        }
    }

    // ── AuditAction ──────────────────────────────────────────────────────────

    #[test]
    fn known_tags_resolve_to_variants() {
        assert_eq!(AuditAction::from_tag("LOGIN_SUCCESS"), AuditAction::LoginSuccess);
        assert_eq!(
            AuditAction::from_tag("BLACKLISTED_IP_ATTEMPT"),
            AuditAction::BlacklistedIpAttempt
        );
        for known in AuditAction::KNOWN.iter() {
            assert_eq!(&AuditAction::from_tag(known.as_str()), known);
        }
    }

    #[test]
    fn unknown_tag_is_preserved_with_fallback_description() {
        let action = AuditAction::from_tag("EXPORT_REPORT");
        assert_eq!(action, AuditAction::Other("EXPORT_REPORT".to_string()));
        assert_eq!(action.as_str(), "EXPORT_REPORT");
        assert_eq!(action.description(), "System activity");
    }

    #[test]
    fn every_known_action_has_a_specific_description() {
        for known in AuditAction::KNOWN.iter() {
            assert_ne!(known.description(), "System activity", "{known}");
        }
    }

    #[test]
    fn action_serializes_as_its_tag() {
        let json = serde_json::to_string(&AuditAction::IpAutoBlocked).unwrap();
        assert_eq!(json, "\"IP_AUTO_BLOCKED\"");

        let decoded: AuditAction = serde_json::from_str("\"CUSTOM_TAG\"").unwrap();
        assert_eq!(decoded, AuditAction::Other("CUSTOM_TAG".to_string()));
    }

    /// A known tag smuggled in as `Other` is sealed as its dedicated variant,
    /// matching what a reload of the stored tag produces.
    #[test]
    fn known_tag_wrapped_in_other_is_canonicalized() {
        let data = AuditData::new(
            AuditAction::Other("LOGIN_SUCCESS".to_string()),
            "u1",
            "10.0.0.5",
            AuditDetails::empty(),
            1_700_000_000_000,
        );
        assert_eq!(data.action, AuditAction::LoginSuccess);
        assert_eq!(data.description, "User logged in successfully");

        let block = Block { data, ..sample_block() };
        assert_eq!(StoredBlock::from_block(&block).into_block(), block);

        assert_eq!(
            AuditAction::Other("EXPORT_REPORT".to_string()).canonical(),
            AuditAction::Other("EXPORT_REPORT".to_string())
        );
    }

    // ── AuditDetails ─────────────────────────────────────────────────────────

    #[test]
    fn details_object_passes_through() {
        let details = AuditDetails::from(json!({ "resource": "doc-1", "size": 3 }));
        assert_eq!(details.into_value(), json!({ "resource": "doc-1", "size": 3 }));
    }

    #[test]
    fn details_null_becomes_empty_object() {
        assert_eq!(AuditDetails::from(json!(null)).into_value(), json!({}));
    }

    #[test]
    fn details_scalar_is_wrapped() {
        assert_eq!(
            AuditDetails::from_serializable("just text").into_value(),
            json!({ "value": "just text" })
        );
        assert_eq!(
            AuditDetails::from_serializable(&[1, 2, 3]).into_value(),
            json!({ "value": [1, 2, 3] })
        );
    }

    #[test]
    fn details_that_fail_to_serialize_are_coerced_to_text() {
        use std::collections::HashMap;

        // Maps with non-string keys cannot become JSON objects.
        let mut odd: HashMap<(u8, u8), &str> = HashMap::new();
        odd.insert((1, 2), "pair");

        let details = AuditDetails::from_serializable(&odd).into_value();
        let text = details["value"].as_str().expect("coerced to a string");
        assert!(text.contains("pair"), "debug repr expected, got: {text}");
    }

    // ── Block wire shape ─────────────────────────────────────────────────────

    #[test]
    fn block_json_matches_ui_shape() {
        let value = serde_json::to_value(sample_block()).unwrap();

        assert_eq!(value["index"], json!(1));
        assert_eq!(value["timestamp"], json!(1_700_000_000_000i64));
        assert_eq!(value["nonce"], json!(17));
        assert!(value.get("previousHash").is_some());
        assert!(value.get("hash").is_some());

        let data = &value["data"];
        assert_eq!(data["action"], json!("LOGIN_SUCCESS"));
        assert_eq!(data["description"], json!("User logged in successfully"));
        assert_eq!(data["userId"], json!("u1"));
        assert_eq!(data["ip"], json!("10.0.0.5"));
        assert_eq!(data["details"], json!({ "username": "alice" }));
        assert_eq!(data["timestamp"], json!("2023-11-14T22:13:20.000Z"));
    }

    /// The published schema accepts real blocks and rejects renamed fields.
    #[test]
    fn block_schema_matches_serialized_block() {
        let validator = jsonschema::validator_for(&block_schema()).unwrap();

        let value = serde_json::to_value(sample_block()).unwrap();
        assert!(validator.is_valid(&value));

        let mut renamed = value.clone();
        let data = renamed["data"].as_object_mut().unwrap();
        let actor = data.remove("userId").unwrap();
        data.insert("actorId".to_string(), actor);
        assert!(!validator.is_valid(&renamed));

        let mut short_hash = value;
        short_hash["hash"] = json!("abc");
        assert!(!validator.is_valid(&short_hash));
    }

    // ── StoredBlock ──────────────────────────────────────────────────────────

    #[test]
    fn stored_block_rebuilds_derived_fields() {
        let block = sample_block();
        let row = StoredBlock::from_block(&block);

        assert_eq!(row.action, "LOGIN_SUCCESS");
        assert_eq!(row.details, r#"{"username":"alice"}"#);
        assert_eq!(row.into_block(), block);
    }

    #[test]
    fn stored_block_with_unparseable_details_still_loads() {
        let mut row = StoredBlock::from_block(&sample_block());
        row.details = "{not json".to_string();

        let block = row.into_block();
        assert_eq!(block.data.details, json!("{not json"));
    }

    // ── VerificationResult ───────────────────────────────────────────────────

    #[test]
    fn valid_result_omits_failure_fields() {
        let value = serde_json::to_value(VerificationResult::valid(3)).unwrap();
        assert_eq!(value["valid"], json!(true));
        assert_eq!(value["blockCount"], json!(3));
        assert!(value.get("invalidBlock").is_none());
        assert!(value.get("reason").is_none());
    }

    #[test]
    fn invalid_result_names_block_and_reason() {
        let result = VerificationResult::invalid(Some(2), Violation::BrokenLink, 5);
        assert!(!result.valid);
        assert_eq!(result.invalid_block, Some(2));
        assert_eq!(result.reason.as_deref(), Some("Broken chain link"));
        assert!(result.message.contains("block 2"));
    }

    // ── StartupPolicy ────────────────────────────────────────────────────────

    #[test]
    fn startup_policy_defaults_to_fallback() {
        assert_eq!(StartupPolicy::default(), StartupPolicy::FallbackGenesis);
        let decoded: StartupPolicy = serde_json::from_str("\"fail\"").unwrap();
        assert_eq!(decoded, StartupPolicy::Fail);
    }

    // ── CustosError display messages ─────────────────────────────────────────

    #[test]
    fn error_persist_failed_display() {
        let err = CustosError::PersistFailed {
            index: 4,
            reason: "disk full".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("block 4"));
        assert!(msg.contains("disk full"));
    }

    #[test]
    fn error_store_timeout_display() {
        let err = CustosError::StoreTimeout { millis: 250 };
        assert!(err.to_string().contains("250 ms"));
    }

    #[test]
    fn error_block_not_found_display() {
        let err = CustosError::BlockNotFound { index: 9, length: 3 };
        let msg = err.to_string();
        assert!(msg.contains("block 9"));
        assert!(msg.contains("chain length 3"));
    }
}
