//! Shared response handling for the provider normalizers.
//!
//! RapidAPI services wrap their payload in an envelope and report some
//! errors inside 2xx bodies. These helpers peel the envelope, classify error
//! and empty payloads, and pick fields out of loosely-typed objects.

use serde_json::{Map, Value};

use crate::descriptor::NormalizeError;

/// Keys that wrap the actual payload.
const ENVELOPE_KEYS: &[&str] = &["data", "result", "response"];

/// Keys that carry an upstream error message.
const ERROR_KEYS: &[&str] = &["error", "message", "detail", "description", "errors"];

// ============================================================================
// Envelope
// ============================================================================

/// Returns the payload inside a RapidAPI envelope.
///
/// Unwraps repeatedly while the value is an object whose only meaningful
/// content is one of the envelope keys (status flags are ignored).
pub fn unwrap_envelope(value: &Value) -> &Value {
    let mut current = value;
    loop {
        let Some(obj) = current.as_object() else {
            return current;
        };
        let inner = ENVELOPE_KEYS.iter().find_map(|k| obj.get(*k));
        match inner {
            Some(inner) if only_status_besides(obj) => current = inner,
            _ => return current,
        }
    }
}

/// True when every key apart from the envelope is a status flag.
fn only_status_besides(obj: &Map<String, Value>) -> bool {
    obj.keys().all(|k| {
        ENVELOPE_KEYS.contains(&k.as_str())
            || matches!(k.as_str(), "ok" | "success" | "status" | "code" | "message")
    })
}

// ============================================================================
// Classification
// ============================================================================

/// Extracts an error message from a payload that reports failure.
pub fn error_message(value: &Value) -> Option<String> {
    let obj = value.as_object()?;

    let flagged = obj.get("ok") == Some(&Value::Bool(false))
        || obj.get("success") == Some(&Value::Bool(false))
        || obj
            .get("status")
            .and_then(Value::as_str)
            .is_some_and(|s| s.eq_ignore_ascii_case("error") || s.eq_ignore_ascii_case("fail"));

    let message = ERROR_KEYS
        .iter()
        .filter_map(|k| obj.get(*k))
        .find_map(message_text);

    let has_payload = ENVELOPE_KEYS
        .iter()
        .any(|k| obj.get(*k).is_some_and(|v| !is_empty(v)));

    if flagged {
        return Some(message.unwrap_or_else(|| "request was not successful".to_string()));
    }

    // an object made only of error keys is an error report
    let error_only = !obj.is_empty()
        && obj
            .keys()
            .all(|k| ERROR_KEYS.contains(&k.as_str()) || matches!(k.as_str(), "code" | "status"));
    if error_only && !has_payload {
        return message;
    }

    None
}

fn message_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Object(obj) => obj.get("message").and_then(message_text),
        Value::Array(items) => items.iter().find_map(message_text),
        _ => None,
    }
}

/// True for `null`, `{}`, `[]` and blank strings.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(obj) => obj.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Unwraps the envelope and rejects error and empty payloads.
pub fn payload(body: &Value) -> Result<&Value, NormalizeError> {
    if let Some(message) = error_message(body) {
        return Err(classify_message(message));
    }
    let inner = unwrap_envelope(body);
    if let Some(message) = error_message(inner) {
        return Err(classify_message(message));
    }
    if is_empty(inner) {
        return Err(NormalizeError::NotFound);
    }
    Ok(inner)
}

/// Upstream "not found" messages are empty results, not errors.
fn classify_message(message: String) -> NormalizeError {
    let lower = message.to_ascii_lowercase();
    if lower.contains("not found") || lower.contains("no result") || lower.contains("not exist") {
        NormalizeError::NotFound
    } else {
        NormalizeError::ErrorPayload(message)
    }
}

// ============================================================================
// Field Helpers
// ============================================================================

/// Returns the first present, non-null value among `keys`.
pub fn first_field<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find(|v| !v.is_null())
}

/// Copies the listed fields that are present into a new object.
pub fn project(obj: &Map<String, Value>, keys: &[&str]) -> Map<String, Value> {
    keys.iter()
        .filter_map(|k| obj.get(*k).filter(|v| !v.is_null()).map(|v| ((*k).to_string(), v.clone())))
        .collect()
}

/// Finds a result list, either the value itself or under a list key.
pub fn find_list<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Vec<Value>> {
    if let Some(items) = value.as_array() {
        return Some(items);
    }
    let obj = value.as_object()?;
    keys.iter().find_map(|k| obj.get(*k).and_then(Value::as_array))
}

/// Normalizer that only unwraps the envelope and rejects error or empty
/// payloads.
pub fn passthrough(body: &Value) -> Result<Value, NormalizeError> {
    payload(body).cloned()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwrap_nested_envelope() {
        let body = json!({"ok": true, "data": {"result": {"id": 1}}});
        assert_eq!(unwrap_envelope(&body), &json!({"id": 1}));
    }

    #[test]
    fn test_unwrap_keeps_mixed_object() {
        let body = json!({"data": [1], "username": "durov"});
        assert_eq!(unwrap_envelope(&body), &body);
    }

    #[test]
    fn test_error_payloads() {
        assert_eq!(
            error_message(&json!({"message": "You are not subscribed to this API."})),
            Some("You are not subscribed to this API.".to_string())
        );
        assert_eq!(
            error_message(&json!({"ok": false, "error": {"message": "FLOOD_WAIT"}})),
            Some("FLOOD_WAIT".to_string())
        );
        assert!(error_message(&json!({"ok": false})).is_some());
        assert!(error_message(&json!({"id": 1, "message": "hello"})).is_none());
    }

    #[test]
    fn test_payload_classification() {
        assert_eq!(payload(&json!(null)), Err(NormalizeError::NotFound));
        assert_eq!(payload(&json!({"data": []})), Err(NormalizeError::NotFound));
        assert_eq!(
            payload(&json!({"error": "User not found"})),
            Err(NormalizeError::NotFound)
        );
        assert_eq!(
            payload(&json!({"error": "Invalid API key"})),
            Err(NormalizeError::ErrorPayload("Invalid API key".into()))
        );
        assert_eq!(payload(&json!({"data": {"id": 5}})).unwrap(), &json!({"id": 5}));
    }

    #[test]
    fn test_project_and_first_field() {
        let obj = json!({"id": 7, "title": null, "username": "x", "extra": true});
        let obj = obj.as_object().unwrap();
        assert_eq!(
            Value::Object(project(obj, &["id", "title", "username"])),
            json!({"id": 7, "username": "x"})
        );
        assert_eq!(first_field(obj, &["title", "username"]), Some(&json!("x")));
    }

    #[test]
    fn test_find_list() {
        let list = json!({"results": [{"id": 1}]});
        assert_eq!(find_list(&list, &["items", "results"]).unwrap().len(), 1);
        assert!(find_list(&json!({"id": 1}), &["results"]).is_none());
    }
}
