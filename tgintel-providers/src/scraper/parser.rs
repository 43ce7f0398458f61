//! Telegram Scraper API response parser.

use serde_json::{Value, json};
use tracing::debug;

use crate::descriptor::NormalizeError;
use crate::normalize::{first_field, payload};

/// Keys under which search results are listed.
const LIST_KEYS: &[&str] = &["results", "entities", "items", "users", "chats", "peers"];

/// Fields that identify a user, chat or channel.
const IDENTITY_KEYS: &[&str] = &[
    "id",
    "user_id",
    "username",
    "phone",
    "first_name",
    "title",
    "full_user",
    "full_chat",
    "user",
    "chat",
    "users",
    "chats",
];

/// Normalizes entity searches into `{count, results}`.
///
/// Results listed under several keys (e.g. `users` and `chats`) are
/// concatenated in key order.
pub fn normalize_search(body: &Value) -> Result<Value, NormalizeError> {
    let inner = payload(body)?;

    let results: Vec<Value> = match inner {
        Value::Array(items) => items.clone(),
        Value::Object(obj) => {
            let lists: Vec<&Vec<Value>> = LIST_KEYS
                .iter()
                .filter_map(|k| obj.get(*k).and_then(Value::as_array))
                .collect();
            if lists.is_empty() {
                return Err(NormalizeError::Malformed("no result list in response".to_string()));
            }
            lists.into_iter().flatten().cloned().collect()
        }
        _ => return Err(NormalizeError::Malformed("expected a result list".to_string())),
    };

    if results.is_empty() {
        return Err(NormalizeError::NotFound);
    }
    debug!(count = results.len(), "Search results normalized");
    Ok(json!({ "count": results.len(), "results": results }))
}

/// Normalizes single-entity lookups.
///
/// The entity is returned as-is once it carries an identifying field.
pub fn normalize_entity(body: &Value) -> Result<Value, NormalizeError> {
    let inner = payload(body)?;
    match inner {
        Value::Object(obj) if first_field(obj, IDENTITY_KEYS).is_some() => Ok(inner.clone()),
        Value::Object(_) => Err(NormalizeError::NotFound),
        Value::Array(items) => match items.as_slice() {
            [single] => normalize_entity(single),
            _ => Ok(inner.clone()),
        },
        _ => Err(NormalizeError::Malformed("expected an entity object".to_string())),
    }
}

/// Normalizes the participant check.
///
/// A bare boolean is wrapped as `{is_participant}`.
pub fn normalize_participant(body: &Value) -> Result<Value, NormalizeError> {
    let inner = payload(body)?;
    match inner {
        Value::Bool(member) => Ok(json!({ "is_participant": member })),
        Value::Object(_) => Ok(inner.clone()),
        _ => Err(NormalizeError::Malformed("expected a participant object".to_string())),
    }
}

/// Normalizes list-shaped results (online users, stories).
///
/// Arrays become `{count, items}`; objects pass through.
pub fn normalize_collection(body: &Value) -> Result<Value, NormalizeError> {
    let inner = payload(body)?;
    match inner {
        Value::Array(items) => Ok(json!({ "count": items.len(), "items": items })),
        Value::Object(_) => Ok(inner.clone()),
        _ => Err(NormalizeError::Malformed("expected a list".to_string())),
    }
}
