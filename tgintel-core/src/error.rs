//! Core error types for `TgIntel`.

use std::path::PathBuf;
use thiserror::Error;

use crate::models::{Period, ProviderId};

/// Core error type for `TgIntel` operations.
///
/// Gating states (missing key, quota exceeded) and upstream failures are
/// [`Outcome`](crate::Outcome) variants, not errors. Variants never carry
/// secret values.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Operation name is not registered.
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// A required parameter is absent or empty.
    #[error("Missing parameter '{parameter}' for {operation}")]
    MissingParameter {
        /// Operation being dispatched.
        operation: String,
        /// Parameter name.
        parameter: String,
    },

    /// A parameter is present but unusable.
    #[error("Invalid parameter '{parameter}' for {operation}: {reason}")]
    InvalidParameter {
        /// Operation being dispatched.
        operation: String,
        /// Parameter name.
        parameter: String,
        /// What was wrong.
        reason: String,
    },

    /// Provider is unknown or has no configured quota.
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// A persisted file exists but cannot be parsed.
    #[error("Corrupt configuration file {}: {reason}", path.display())]
    ConfigCorrupt {
        /// File that failed to parse.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },

    /// A persisted file could not be written.
    #[error("Failed to write {}: {reason}", path.display())]
    ConfigWriteError {
        /// Target file.
        path: PathBuf,
        /// Filesystem message.
        reason: String,
    },

    /// An increment was attempted on an exhausted counter.
    ///
    /// The dispatcher always checks before recording, so this signals a logic
    /// bug rather than a user-facing quota state.
    #[error("Usage limit exceeded for {provider}: {limit} calls already recorded in {period}")]
    LimitExceeded {
        /// Metered provider.
        provider: ProviderId,
        /// Budget for the period.
        limit: u32,
        /// Active period.
        period: Period,
    },
}

impl CoreError {
    /// Returns true for mistakes in caller input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::UnknownOperation(_) | Self::MissingParameter { .. } | Self::InvalidParameter { .. }
        )
    }

    /// Returns true for problems with persisted configuration.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::ConfigCorrupt { .. } | Self::ConfigWriteError { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(CoreError::UnknownOperation("x".into()).is_validation());
        assert!(
            CoreError::ConfigCorrupt {
                path: PathBuf::from("/tmp/c.json"),
                reason: "eof".into(),
            }
            .is_config()
        );
        let limit = CoreError::LimitExceeded {
            provider: ProviderId::TelegramScraper,
            limit: 15,
            period: Period::new(2026, 1).unwrap(),
        };
        assert!(!limit.is_validation());
        assert!(!limit.is_config());
    }

    #[test]
    fn test_missing_parameter_message() {
        let err = CoreError::MissingParameter {
            operation: "fetch_full_user".into(),
            parameter: "username".into(),
        };
        assert_eq!(err.to_string(), "Missing parameter 'username' for fetch_full_user");
    }
}
