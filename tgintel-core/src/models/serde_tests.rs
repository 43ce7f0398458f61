//! Serde serialization/deserialization tests for core types.
//!
//! These cover the on-disk shapes of the credentials and usage files.

use std::collections::BTreeMap;

use crate::{CredentialSet, Period, ProviderId, SecretKey, Tier, UsageRecord};

// ============================================================================
// ProviderId Serde Tests
// ============================================================================

#[test]
fn test_provider_id_serde_roundtrip_all_variants() {
    for provider in ProviderId::all() {
        let json = serde_json::to_string(provider).unwrap();
        let deserialized: ProviderId = serde_json::from_str(&json).unwrap();
        assert_eq!(*provider, deserialized, "Round-trip failed for {:?}", provider);
    }
}

#[test]
fn test_provider_id_wire_names() {
    let test_cases = vec![
        (r#""botsarchive""#, ProviderId::BotsArchive),
        (r#""channel""#, ProviderId::TelegramChannel),
        (r#""scraper""#, ProviderId::TelegramScraper),
    ];

    for (json, expected) in test_cases {
        let result: ProviderId = serde_json::from_str(json).unwrap();
        assert_eq!(result, expected, "Failed for {}", json);
    }
}

#[test]
fn test_provider_id_invalid_deserialize() {
    let result: Result<ProviderId, _> = serde_json::from_str(r#""rapidapi_scraper_key""#);
    assert!(result.is_err());
}

#[test]
fn test_tier_serde() {
    assert_eq!(serde_json::to_string(&Tier::Metered).unwrap(), r#""metered""#);
    let tier: Tier = serde_json::from_str(r#""free""#).unwrap();
    assert_eq!(tier, Tier::Free);
}

// ============================================================================
// Usage Record Serde Tests
// ============================================================================

#[test]
fn test_usage_record_shape() {
    let record = UsageRecord {
        period: Period::new(2026, 10).unwrap(),
        count: 3,
        limit: 15,
    };
    let json = serde_json::to_value(record).unwrap();
    assert_eq!(json, serde_json::json!({"period": "2026-10", "count": 3, "limit": 15}));
}

#[test]
fn test_usage_file_roundtrip() {
    let mut book = BTreeMap::new();
    book.insert(
        ProviderId::TelegramScraper,
        UsageRecord {
            period: Period::new(2025, 12).unwrap(),
            count: 15,
            limit: 15,
        },
    );

    let json = serde_json::to_string_pretty(&book).unwrap();
    let parsed: BTreeMap<ProviderId, UsageRecord> = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, book);
}

#[test]
fn test_usage_record_rejects_bad_period() {
    let json = r#"{"period": "2026-13", "count": 0, "limit": 15}"#;
    let result: Result<UsageRecord, _> = serde_json::from_str(json);
    assert!(result.is_err());
}

#[test]
fn test_usage_record_rejects_negative_count() {
    let json = r#"{"period": "2026-01", "count": -1, "limit": 15}"#;
    let result: Result<UsageRecord, _> = serde_json::from_str(json);
    assert!(result.is_err());
}

// ============================================================================
// Credential Set Serde Tests
// ============================================================================

#[test]
fn test_credential_set_roundtrip() {
    let mut set = CredentialSet::new();
    set.insert(ProviderId::TelegramChannel, SecretKey::new("channel-key"));
    set.insert(ProviderId::TelegramScraper, SecretKey::new("scraper-key"));

    let json = serde_json::to_string(&set).unwrap();
    let parsed: CredentialSet = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, set);
    assert_eq!(
        parsed.get(ProviderId::TelegramScraper).map(SecretKey::expose),
        Some("scraper-key")
    );
}

#[test]
fn test_credential_set_rejects_non_object() {
    let result: Result<CredentialSet, _> = serde_json::from_str(r#"["channel", "key"]"#);
    assert!(result.is_err());
}

#[test]
fn test_credential_set_rejects_unknown_provider() {
    let result: Result<CredentialSet, _> = serde_json::from_str(r#"{"shodan": "abc"}"#);
    assert!(result.is_err());
}
