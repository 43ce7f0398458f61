//! Integration tests for core model types.

use chrono::NaiveDate;
use tgintel_core::{
    CoreError, Outcome, Period, ProviderId, QuotaCheck, UpstreamFailure, UsageRecord,
};

#[test]
fn test_exhausted_record_is_not_allowed() {
    let period = Period::from_date(NaiveDate::from_ymd_opt(2026, 10, 17).unwrap());
    let record = UsageRecord {
        period,
        count: 15,
        limit: 15,
    };

    let check = QuotaCheck::from_record(ProviderId::TelegramScraper, &record);
    assert!(!check.allowed);
    assert_eq!(check.remaining, 0);
    assert_eq!(check.period.to_string(), "2026-10");
}

#[test]
fn test_outcome_variants_are_distinguishable() {
    let outcomes = [
        Outcome::Success {
            provider: ProviderId::BotsArchive,
            data: serde_json::json!({"id": 1}),
        },
        Outcome::QuotaExceeded {
            provider: ProviderId::TelegramScraper,
            limit: 15,
            period: Period::new(2026, 10).unwrap(),
        },
        Outcome::MissingCredential {
            provider: ProviderId::TelegramChannel,
        },
        Outcome::UpstreamError {
            provider: ProviderId::TelegramScraper,
            reason: UpstreamFailure::NoResult,
        },
        Outcome::TransportFailure {
            provider: ProviderId::TelegramScraper,
            reason: "timed out".to_string(),
        },
    ];

    let labels: Vec<&str> = outcomes.iter().map(Outcome::label).collect();
    assert_eq!(
        labels,
        vec![
            "success",
            "quota_exceeded",
            "missing_credential",
            "upstream_error",
            "transport_failure"
        ]
    );
}

#[test]
fn test_limit_exceeded_is_not_a_validation_error() {
    let err = CoreError::LimitExceeded {
        provider: ProviderId::TelegramScraper,
        limit: 15,
        period: Period::new(2026, 10).unwrap(),
    };
    assert!(!err.is_validation());
    assert!(err.to_string().contains("scraper"));
}
