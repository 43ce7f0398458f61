//! Parser edge case and error handling tests.
//!
//! These tests run every built-in normalizer against malformed, partial, or
//! error-shaped bodies.

use serde_json::json;

use crate::catalog::OperationCatalog;
use crate::descriptor::NormalizeError;

fn normalize_all(body: &serde_json::Value) -> Vec<(&'static str, Result<serde_json::Value, NormalizeError>)> {
    OperationCatalog::builtin()
        .all()
        .iter()
        .map(|d| (d.name, (d.normalize)(body)))
        .collect()
}

// ============================================================================
// Shared Shapes
// ============================================================================

#[test]
fn test_null_is_not_found_everywhere() {
    for (name, result) in normalize_all(&json!(null)) {
        assert_eq!(result, Err(NormalizeError::NotFound), "{name}");
    }
}

#[test]
fn test_empty_object_is_not_found_everywhere() {
    for (name, result) in normalize_all(&json!({})) {
        assert_eq!(result, Err(NormalizeError::NotFound), "{name}");
    }
}

#[test]
fn test_empty_envelope_is_not_found_everywhere() {
    for (name, result) in normalize_all(&json!({"ok": true, "data": null})) {
        assert_eq!(result, Err(NormalizeError::NotFound), "{name}");
    }
}

#[test]
fn test_rapidapi_subscription_error_everywhere() {
    let body = json!({"message": "You are not subscribed to this API."});
    for (name, result) in normalize_all(&body) {
        assert_eq!(
            result,
            Err(NormalizeError::ErrorPayload(
                "You are not subscribed to this API.".to_string()
            )),
            "{name}"
        );
    }
}

#[test]
fn test_failure_flag_everywhere() {
    let body = json!({"success": false, "data": {"id": 1}});
    for (name, result) in normalize_all(&body) {
        assert!(matches!(result, Err(NormalizeError::ErrorPayload(_))), "{name}");
    }
}

// ============================================================================
// Unexpected Types
// ============================================================================

#[test]
fn test_scalar_bodies() {
    let catalog = OperationCatalog::builtin();
    let channel = catalog.resolve("channel_info").unwrap();
    let search = catalog.resolve("search_entities").unwrap();
    let stories = catalog.resolve("fetch_stories").unwrap();

    assert!(matches!(
        (channel.normalize)(&json!("hello")),
        Err(NormalizeError::Malformed(_))
    ));
    assert!(matches!(
        (search.normalize)(&json!(12)),
        Err(NormalizeError::Malformed(_))
    ));
    assert!(matches!(
        (stories.normalize)(&json!(false)),
        Err(NormalizeError::Malformed(_))
    ));
}

#[test]
fn test_error_status_string() {
    let body = json!({"status": "error", "message": "PEER_ID_INVALID"});
    let entity = OperationCatalog::builtin().resolve("fetch_entity").unwrap();
    assert_eq!(
        (entity.normalize)(&body),
        Err(NormalizeError::ErrorPayload("PEER_ID_INVALID".to_string()))
    );
}
