//! Content-addressed cache keys for agent results.

use std::collections::BTreeMap;

use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::domain::models::{CacheKey, Submission};

/// Payload fields that identify a logical request. Everything else in the
/// payload (timestamps, request ids) is ignored.
pub const NORMALIZED_FIELDS: [&str; 6] = [
    "user_id",
    "problem_id",
    "category",
    "verdict",
    "error_type",
    "code",
];

/// SHA-256 hex digest over the normalized request fields plus the agent name.
///
/// The normalized record is serialized with sorted keys, so field order in
/// `payload` never matters. Missing fields hash as `null`. Never fails.
pub fn build_cache_key(agent_name: &str, payload: &Value) -> String {
    let mut normalized: BTreeMap<&str, Value> = BTreeMap::new();
    normalized.insert("agent", Value::String(agent_name.to_string()));
    for field in NORMALIZED_FIELDS {
        let value = payload.get(field).cloned().unwrap_or(Value::Null);
        normalized.insert(field, value);
    }

    let canonical = serde_json::to_string(&normalized).unwrap_or_default();
    hex::encode(Sha256::digest(canonical.as_bytes()))
}

/// Cache key for `agent_name` applied to `submission`.
pub fn key_for(agent_name: &str, submission: &Submission) -> CacheKey {
    CacheKey::new(
        agent_name,
        submission.user_id.clone(),
        build_cache_key(agent_name, &submission.cache_payload()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_digest_shape() {
        let digest = build_cache_key("learning", &json!({"user_id": "u1"}));
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_incidental_fields_are_ignored() {
        let a = json!({"user_id": "u1", "code": "x", "submitted_at": "2024-01-01T00:00:00Z"});
        let b = json!({"code": "x", "user_id": "u1", "request_id": "abc"});
        assert_eq!(build_cache_key("learning", &a), build_cache_key("learning", &b));
    }

    #[test]
    fn test_agent_name_changes_digest() {
        let payload = json!({"user_id": "u1", "code": "x"});
        assert_ne!(
            build_cache_key("learning", &payload),
            build_cache_key("difficulty", &payload)
        );
    }

    #[test]
    fn test_missing_equals_null() {
        let missing = json!({"user_id": "u1"});
        let explicit = json!({"user_id": "u1", "error_type": null});
        assert_eq!(build_cache_key("a", &missing), build_cache_key("a", &explicit));
    }

    #[test]
    fn test_non_object_payload_is_total() {
        assert_eq!(build_cache_key("a", &json!(42)).len(), 64);
        assert_eq!(build_cache_key("a", &Value::Null), build_cache_key("a", &json!({})));
    }

    #[test]
    fn test_key_for_submission_ignores_metadata() {
        let mut first = Submission::new("u1", "p1", "print(1)", "Wrong Answer").with_category("dp");
        let mut second = first.clone();
        first.submitted_at = Some(chrono::Utc::now());
        second.request_id = Some(uuid::Uuid::new_v4());

        assert_eq!(key_for("learning", &first), key_for("learning", &second));
    }
}
