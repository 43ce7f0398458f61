//! CLI output formatting tests.
//!
//! These tests verify that CLI output is correctly formatted for both
//! text and JSON output modes.

#[cfg(test)]
mod text_formatter_tests {
    use super::super::text::TextFormatter;
    use serde_json::json;
    use tgintel_core::{
        CoreError, OperationReport, Outcome, Period, ProviderId, QuotaCheck, UpstreamFailure,
        UsageRecord,
    };
    use tgintel_providers::OperationCatalog;

    fn check(count: u32) -> QuotaCheck {
        let record = UsageRecord {
            period: Period::new(2026, 10).unwrap(),
            count,
            limit: 15,
        };
        QuotaCheck::from_record(ProviderId::TelegramScraper, &record)
    }

    #[test]
    fn test_quota_block_fresh() {
        let formatter = TextFormatter::new(false);
        let output = formatter.format_quota(&check(0));

        assert!(output.contains("Telegram Scraper API (metered)"));
        assert!(output.contains("Period:    2026-10"));
        assert!(output.contains("Used:      0/15"));
        assert!(output.contains("Remaining: 15"));
        assert!(output.contains("0.0%"));
        assert!(!output.contains("LIMIT REACHED"));
    }

    #[test]
    fn test_quota_block_exhausted_shows_reset_date() {
        let formatter = TextFormatter::new(false);
        let output = formatter.format_quota(&check(15));

        assert!(output.contains("Remaining: 0"));
        assert!(output.contains("100.0%"));
        assert!(output.contains("LIMIT REACHED - Resets on 2026-11-01"));
    }

    #[test]
    fn test_quota_colors() {
        let formatter = TextFormatter::new(true);
        assert!(formatter.format_quota(&check(1)).contains("\x1b[32m"));
        assert!(formatter.format_quota(&check(11)).contains("\x1b[33m"));
        assert!(formatter.format_quota(&check(14)).contains("\x1b[31m"));
    }

    #[test]
    fn test_success_body_is_pretty_json() {
        let formatter = TextFormatter::new(false);
        let outcome = Outcome::Success {
            provider: ProviderId::BotsArchive,
            data: json!({"bot_id": 42}),
        };
        assert_eq!(
            formatter.format_outcome_body(&outcome),
            "{\n  \"bot_id\": 42\n}"
        );
    }

    #[test]
    fn test_gating_bodies() {
        let formatter = TextFormatter::new(false);

        let missing = formatter.format_outcome_body(&Outcome::MissingCredential {
            provider: ProviderId::TelegramChannel,
        });
        assert!(missing.starts_with("[*]"));
        assert!(missing.contains("tgintel config set-key channel"));

        let quota = formatter.format_outcome_body(&Outcome::QuotaExceeded {
            provider: ProviderId::TelegramScraper,
            limit: 15,
            period: Period::new(2026, 12).unwrap(),
        });
        assert!(quota.starts_with("[!]"));
        assert!(quota.contains("Resets on 2027-01-01"));
    }

    #[test]
    fn test_no_result_is_a_warning() {
        let formatter = TextFormatter::new(false);
        let body = formatter.format_outcome_body(&Outcome::UpstreamError {
            provider: ProviderId::BotsArchive,
            reason: UpstreamFailure::NoResult,
        });
        assert_eq!(body, "[*] No result");
    }

    #[test]
    fn test_report_with_descriptor() {
        let formatter = TextFormatter::new(false);
        let catalog = OperationCatalog::builtin();
        let report = OperationReport {
            operation: "channel_info",
            result: Err(CoreError::MissingParameter {
                operation: "channel_info".to_string(),
                parameter: "channel".to_string(),
            }),
        };

        let output = formatter.format_report(2, &report, catalog.resolve("channel_info").ok());
        assert!(output.contains("2. "));
        assert!(output.contains("(Telegram Channel API)"));
        assert!(output.contains("[!] Missing parameter 'channel'"));
    }

    #[test]
    fn test_operation_line() {
        let formatter = TextFormatter::new(false);
        let desc = OperationCatalog::builtin().resolve("fetch_stories").unwrap();
        let line = formatter.format_operation_line(desc);

        assert!(line.starts_with("fetch_stories"));
        assert!(line.contains("metered"));
        assert!(line.contains("scraper"));
        assert!(line.contains("username [without_media=false]"));
    }

    #[test]
    fn test_key_status_never_shows_more_than_preview() {
        let formatter = TextFormatter::new(false);
        let line = formatter.format_key_status(ProviderId::TelegramScraper, Some("abcd…"));
        assert_eq!(line, "✓ Telegram Scraper API: Configured (abcd…)");

        let line = formatter.format_key_status(ProviderId::TelegramChannel, None);
        assert_eq!(line, "✗ Telegram Channel API: Not configured");

        let line = formatter.format_key_status(ProviderId::BotsArchive, None);
        assert!(line.contains("no key needed"));
    }
}

#[cfg(test)]
mod json_formatter_tests {
    use super::super::json::{JsonFormatter, RunOutput};
    use tgintel_core::{Outcome, Period, ProviderId, QuotaCheck, UsageRecord};

    #[test]
    fn test_usage_json() {
        let record = UsageRecord {
            period: Period::new(2026, 10).unwrap(),
            count: 4,
            limit: 15,
        };
        let check = QuotaCheck::from_record(ProviderId::TelegramScraper, &record);

        let output = JsonFormatter::new(false).format_usage(&[check]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value[0]["provider"], "scraper");
        assert_eq!(value[0]["period"], "2026-10");
        assert_eq!(value[0]["used"], 4);
        assert_eq!(value[0]["remaining"], 11);
        assert_eq!(value[0]["resetsOn"], "2026-11-01");
    }

    #[test]
    fn test_run_json() {
        let outcome = Outcome::MissingCredential {
            provider: ProviderId::TelegramScraper,
        };
        let output = JsonFormatter::new(false)
            .format(&RunOutput {
                operation: "fetch_entity",
                result: &outcome,
            })
            .unwrap();
        assert_eq!(
            output,
            r#"{"operation":"fetch_entity","result":{"outcome":"missing_credential","provider":"scraper"}}"#
        );
    }

    #[test]
    fn test_pretty_json() {
        let output = JsonFormatter::new(true)
            .format(&serde_json::json!({"a": 1}))
            .unwrap();
        assert_eq!(output, "{\n  \"a\": 1\n}");
    }
}
