//! Credential types.
//!
//! Secrets are wrapped in [`SecretKey`] so they never leak through `Debug`,
//! `Display`, or log fields by accident.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::provider::ProviderId;

/// Number of leading characters shown by [`SecretKey::masked`].
const MASK_VISIBLE_CHARS: usize = 4;

// ============================================================================
// Secret Key
// ============================================================================

/// An API key. Formatting never reveals the value.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretKey(String);

impl SecretKey {
    /// Wraps a raw key.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the raw key. Only request building should call this.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns true for an empty or whitespace-only key.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// A short preview such as `ab12…`, safe to print.
    pub fn masked(&self) -> String {
        let visible: String = self.0.chars().take(MASK_VISIBLE_CHARS).collect();
        if self.0.chars().count() <= MASK_VISIBLE_CHARS {
            "…".to_string()
        } else {
            format!("{visible}…")
        }
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

impl fmt::Display for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

// ============================================================================
// Credential Set
// ============================================================================

/// Provider id to API key mapping, as persisted in the credentials file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialSet {
    keys: BTreeMap<ProviderId, SecretKey>,
}

impl CredentialSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the key for a provider.
    pub fn get(&self, provider: ProviderId) -> Option<&SecretKey> {
        self.keys.get(&provider).filter(|k| !k.is_blank())
    }

    /// Returns true if a non-blank key is configured.
    pub fn contains(&self, provider: ProviderId) -> bool {
        self.get(provider).is_some()
    }

    /// Inserts or replaces a key, returning the previous one.
    pub fn insert(&mut self, provider: ProviderId, key: SecretKey) -> Option<SecretKey> {
        self.keys.insert(provider, key)
    }

    /// Removes a key.
    pub fn remove(&mut self, provider: ProviderId) -> Option<SecretKey> {
        self.keys.remove(&provider)
    }

    /// Providers with a configured key.
    pub fn providers(&self) -> impl Iterator<Item = ProviderId> + '_ {
        self.keys
            .iter()
            .filter(|(_, k)| !k.is_blank())
            .map(|(p, _)| *p)
    }

    /// Number of configured keys.
    pub fn len(&self) -> usize {
        self.providers().count()
    }

    /// Returns true when no key is configured.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_never_formats_value() {
        let key = SecretKey::new("abcd1234efgh5678");
        assert!(!format!("{key:?}").contains("abcd1234"));
        assert!(!format!("{key}").contains("abcd1234"));
        assert_eq!(key.masked(), "abcd…");
    }

    #[test]
    fn test_short_secret_masks_everything() {
        assert_eq!(SecretKey::new("abc").masked(), "…");
    }

    #[test]
    fn test_blank_key_is_not_configured() {
        let mut set = CredentialSet::new();
        set.insert(ProviderId::TelegramScraper, SecretKey::new("   "));
        assert!(!set.contains(ProviderId::TelegramScraper));
        assert!(set.is_empty());
    }

    #[test]
    fn test_set_serializes_as_flat_map() {
        let mut set = CredentialSet::new();
        set.insert(ProviderId::TelegramChannel, SecretKey::new("k1"));
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json, serde_json::json!({"channel": "k1"}));
    }

    #[test]
    fn test_debug_of_set_is_redacted() {
        let mut set = CredentialSet::new();
        set.insert(ProviderId::TelegramScraper, SecretKey::new("topsecretvalue"));
        assert!(!format!("{set:?}").contains("topsecret"));
    }
}
