//! BotsArchive response parser.

use serde_json::{Map, Value, json};
use tracing::debug;

use crate::descriptor::NormalizeError;
use crate::normalize::{payload, project};

const ID_KEYS: &[&str] = &["id", "bot_id", "botID", "botId", "user_id"];

/// Normalizes a `getBotID.php` response into `{bot_id, ...}`.
pub fn normalize_bot_id(body: &Value) -> Result<Value, NormalizeError> {
    let inner = payload(body)?;

    let obj = match inner {
        Value::Number(_) => return Ok(json!({ "bot_id": inner })),
        Value::String(s) if s.trim().chars().all(|c| c.is_ascii_digit()) => {
            return Ok(json!({ "bot_id": s.trim() }));
        }
        Value::Object(obj) => obj,
        other => {
            return Err(NormalizeError::Malformed(format!(
                "expected an object, got {}",
                kind_of(other)
            )));
        }
    };

    let Some(id_key) = ID_KEYS.iter().find(|k| obj.contains_key(**k)) else {
        return Err(NormalizeError::Malformed("no bot id in response".to_string()));
    };
    let id = &obj[*id_key];
    if id.is_null() || id == &json!(0) || id.as_str().is_some_and(|s| s.trim().is_empty()) {
        debug!("Bot id lookup returned an empty id");
        return Err(NormalizeError::NotFound);
    }

    let mut out = Map::new();
    out.insert("bot_id".to_string(), id.clone());
    out.extend(project(obj, &["username", "name", "first_name", "description"]));
    Ok(Value::Object(out))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bot_id_object() {
        let body = json!({"ok": true, "result": {"id": 123_456_789, "username": "@examplebot"}});
        assert_eq!(
            normalize_bot_id(&body).unwrap(),
            json!({"bot_id": 123_456_789, "username": "@examplebot"})
        );
    }

    #[test]
    fn test_bot_id_bare_number() {
        assert_eq!(normalize_bot_id(&json!(42)).unwrap(), json!({"bot_id": 42}));
        assert_eq!(normalize_bot_id(&json!("42")).unwrap(), json!({"bot_id": "42"}));
    }

    #[test]
    fn test_bot_id_missing_is_not_found() {
        assert_eq!(
            normalize_bot_id(&json!({"id": null, "username": "@ghost"})),
            Err(NormalizeError::NotFound)
        );
        assert_eq!(
            normalize_bot_id(&json!({"error": "Bot not found"})),
            Err(NormalizeError::NotFound)
        );
    }

    #[test]
    fn test_bot_id_without_id_is_malformed() {
        assert!(matches!(
            normalize_bot_id(&json!({"username": "@x"})),
            Err(NormalizeError::Malformed(_))
        ));
        assert!(matches!(
            normalize_bot_id(&json!(true)),
            Err(NormalizeError::Malformed(_))
        ));
    }
}
