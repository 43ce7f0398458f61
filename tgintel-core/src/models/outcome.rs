//! Dispatch outcomes.
//!
//! [`Outcome`] is the only thing the presentation layer inspects after a
//! dispatch. Gating states (missing key, quota) are ordinary variants, not
//! errors.

use serde::Serialize;
use std::fmt;

use super::provider::ProviderId;
use super::usage::Period;
use crate::error::CoreError;

// ============================================================================
// Upstream Failure
// ============================================================================

/// Why an upstream call that completed is still not a success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UpstreamFailure {
    /// Non-success HTTP status.
    Status {
        /// HTTP status code.
        code: u16,
        /// Message extracted from the body, if any.
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    /// 2xx response whose payload reports an error.
    ErrorPayload {
        /// Upstream message.
        message: String,
    },
    /// Body could not be decoded or had an unexpected shape.
    Malformed {
        /// What was wrong.
        detail: String,
    },
    /// Well-formed response with nothing in it.
    NoResult,
}

impl fmt::Display for UpstreamFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status {
                code,
                message: Some(msg),
            } => write!(f, "HTTP {code}: {msg}"),
            Self::Status { code, message: None } => write!(f, "HTTP {code}"),
            Self::ErrorPayload { message } => write!(f, "upstream error: {message}"),
            Self::Malformed { detail } => write!(f, "malformed response: {detail}"),
            Self::NoResult => f.write_str("no result"),
        }
    }
}

// ============================================================================
// Outcome
// ============================================================================

/// Result of one dispatch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// The upstream returned data.
    Success {
        /// Provider that served the request.
        provider: ProviderId,
        /// Normalized payload.
        data: serde_json::Value,
    },
    /// The monthly budget is spent.
    QuotaExceeded {
        /// Metered provider.
        provider: ProviderId,
        /// Budget for the period.
        limit: u32,
        /// Exhausted period.
        period: Period,
    },
    /// No API key configured for the provider.
    MissingCredential {
        /// Provider lacking a key.
        provider: ProviderId,
    },
    /// The call completed but did not succeed.
    UpstreamError {
        /// Provider that answered.
        provider: ProviderId,
        /// What went wrong.
        reason: UpstreamFailure,
    },
    /// The call did not complete (network, timeout).
    TransportFailure {
        /// Provider that was targeted.
        provider: ProviderId,
        /// Transport message.
        reason: String,
    },
}

impl Outcome {
    /// Returns the provider this outcome concerns.
    pub fn provider(&self) -> ProviderId {
        match self {
            Self::Success { provider, .. }
            | Self::QuotaExceeded { provider, .. }
            | Self::MissingCredential { provider }
            | Self::UpstreamError { provider, .. }
            | Self::TransportFailure { provider, .. } => *provider,
        }
    }

    /// Returns true for [`Outcome::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns true for gating outcomes (missing key, quota exceeded).
    pub fn is_gated(&self) -> bool {
        matches!(self, Self::QuotaExceeded { .. } | Self::MissingCredential { .. })
    }

    /// Returns the payload of a successful outcome.
    pub fn data(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Success { data, .. } => Some(data),
            _ => None,
        }
    }

    /// Short label for the variant.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::QuotaExceeded { .. } => "quota_exceeded",
            Self::MissingCredential { .. } => "missing_credential",
            Self::UpstreamError { .. } => "upstream_error",
            Self::TransportFailure { .. } => "transport_failure",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success { provider, .. } => write!(f, "{} returned data", provider.display_name()),
            Self::QuotaExceeded {
                provider,
                limit,
                period,
            } => write!(
                f,
                "monthly limit reached for {} ({limit} calls in {period}, resets {})",
                provider.display_name(),
                period.resets_on()
            ),
            Self::MissingCredential { provider } => {
                write!(f, "no API key configured for {}", provider.display_name())
            }
            Self::UpstreamError { provider, reason } => {
                write!(f, "{}: {reason}", provider.display_name())
            }
            Self::TransportFailure { provider, reason } => {
                write!(f, "{} unreachable: {reason}", provider.display_name())
            }
        }
    }
}

// ============================================================================
// Operation Report
// ============================================================================

/// One entry of an aggregate run.
#[derive(Debug, Serialize)]
pub struct OperationReport {
    /// Operation name.
    pub operation: &'static str,
    /// What happened. Validation errors are kept per operation so one bad
    /// input does not hide the others.
    #[serde(serialize_with = "serialize_report_result")]
    pub result: Result<Outcome, CoreError>,
}

impl OperationReport {
    /// Returns the outcome if the operation was dispatched.
    pub fn outcome(&self) -> Option<&Outcome> {
        self.result.as_ref().ok()
    }

    /// Returns true if the operation produced data.
    pub fn is_success(&self) -> bool {
        self.outcome().is_some_and(Outcome::is_success)
    }
}

fn serialize_report_result<S: serde::Serializer>(
    result: &Result<Outcome, CoreError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    #[derive(Serialize)]
    struct ErrorView {
        outcome: &'static str,
        message: String,
    }

    match result {
        Ok(outcome) => outcome.serialize(serializer),
        Err(e) => ErrorView {
            outcome: "error",
            message: e.to_string(),
        }
        .serialize(serializer),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_provider_and_flags() {
        let outcome = Outcome::MissingCredential {
            provider: ProviderId::TelegramChannel,
        };
        assert_eq!(outcome.provider(), ProviderId::TelegramChannel);
        assert!(outcome.is_gated());
        assert!(!outcome.is_success());
        assert!(outcome.data().is_none());
    }

    #[test]
    fn test_quota_exceeded_mentions_reset() {
        let outcome = Outcome::QuotaExceeded {
            provider: ProviderId::TelegramScraper,
            limit: 15,
            period: Period::new(2026, 10).unwrap(),
        };
        let text = outcome.to_string();
        assert!(text.contains("15 calls in 2026-10"));
        assert!(text.contains("2026-11-01"));
    }

    #[test]
    fn test_no_result_is_distinct_from_data() {
        let outcome = Outcome::UpstreamError {
            provider: ProviderId::BotsArchive,
            reason: UpstreamFailure::NoResult,
        };
        assert!(!outcome.is_success());
        assert_eq!(outcome.to_string(), "BotsArchive: no result");
    }

    #[test]
    fn test_outcome_json_is_tagged() {
        let outcome = Outcome::UpstreamError {
            provider: ProviderId::TelegramScraper,
            reason: UpstreamFailure::Status {
                code: 429,
                message: None,
            },
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["outcome"], "upstream_error");
        assert_eq!(json["provider"], "scraper");
        assert_eq!(json["reason"]["kind"], "status");
        assert_eq!(json["reason"]["code"], 429);
    }

    #[test]
    fn test_report_with_error_serializes_message() {
        let report = OperationReport {
            operation: "channel_info",
            result: Err(CoreError::MissingParameter {
                operation: "channel_info".to_string(),
                parameter: "channel".to_string(),
            }),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["operation"], "channel_info");
        assert_eq!(json["result"]["outcome"], "error");
        assert!(!report.is_success());
    }
}
