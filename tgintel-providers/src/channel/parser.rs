//! Telegram Channel API response parser.

use serde_json::Value;

use crate::descriptor::NormalizeError;
use crate::normalize::{first_field, payload};

/// Fields that identify a channel.
const IDENTITY_KEYS: &[&str] = &["id", "username", "title", "name", "link"];

/// Normalizes `/channel/info`.
///
/// The channel object is returned as-is once it is known to identify a
/// channel.
pub fn normalize_channel_info(body: &Value) -> Result<Value, NormalizeError> {
    let inner = payload(body)?;
    let obj = inner
        .as_object()
        .ok_or_else(|| NormalizeError::Malformed("expected a channel object".to_string()))?;

    if first_field(obj, IDENTITY_KEYS).is_none() {
        return Err(NormalizeError::NotFound);
    }
    Ok(inner.clone())
}
