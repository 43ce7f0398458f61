//! Fetch error types.

use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Transport Error
// ============================================================================

/// A call that did not complete.
///
/// Anything that produced an HTTP status, even an error status, is a
/// [`RawResponse`](crate::RawResponse), not a transport error.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// No response within the deadline.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Connection could not be established.
    #[error("Host unreachable: {0}")]
    Unreachable(String),

    /// Request failed before a status was received.
    #[error("Request failed: {0}")]
    Request(String),

    /// Target host is not on the allowlist.
    #[error("Domain not allowed: {0}")]
    DomainNotAllowed(String),
}

impl TransportError {
    /// Returns true if the deadline expired.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

// ============================================================================
// HTTP Error
// ============================================================================

/// HTTP-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Request error.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// Domain not allowed.
    #[error("Domain not allowed: {0}")]
    DomainNotAllowed(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid header name or value.
    #[error("Invalid header {0}")]
    InvalidHeader(String),
}

impl HttpError {
    /// Converts into a transport failure, keeping the timeout distinct.
    pub fn into_transport(self, timeout: Duration) -> TransportError {
        match self {
            Self::Request(e) if e.is_timeout() => TransportError::Timeout(timeout),
            Self::Request(e) if e.is_connect() => TransportError::Unreachable(e.to_string()),
            Self::Request(e) => TransportError::Request(e.to_string()),
            Self::DomainNotAllowed(host) => TransportError::DomainNotAllowed(host),
            Self::InvalidUrl(msg) => TransportError::Request(format!("invalid URL: {msg}")),
            Self::InvalidHeader(name) => TransportError::Request(format!("invalid header {name}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_maps_to_transport() {
        let err = HttpError::DomainNotAllowed("evil.com".into())
            .into_transport(Duration::from_secs(15));
        assert!(matches!(err, TransportError::DomainNotAllowed(ref h) if h == "evil.com"));
    }

    #[test]
    fn test_timeout_flag() {
        assert!(TransportError::Timeout(Duration::from_secs(1)).is_timeout());
        assert!(!TransportError::Unreachable("dns".into()).is_timeout());
    }

    #[test]
    fn test_invalid_header_message_has_no_value() {
        let err = HttpError::InvalidHeader("x-rapidapi-key".into())
            .into_transport(Duration::from_secs(15));
        assert_eq!(err.to_string(), "Request failed: invalid header x-rapidapi-key");
    }
}
