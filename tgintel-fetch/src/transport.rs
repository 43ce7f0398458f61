//! Transport seam.
//!
//! The dispatcher hands a fully-formed [`RequestDescriptor`] to a
//! [`Transport`] and gets back either a [`RawResponse`] (any status) or a
//! [`TransportError`] (no status at all).

use async_trait::async_trait;
use std::fmt;
use tgintel_core::ProviderId;
use url::Url;

use crate::error::TransportError;

// ============================================================================
// Request Descriptor
// ============================================================================

/// HTTP method of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET
    Get,
}

impl HttpMethod {
    /// Returns the method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
        }
    }
}

/// A request header, flagged when it carries a credential.
#[derive(Clone, PartialEq, Eq)]
pub struct RequestHeader {
    /// Header name.
    pub name: String,
    /// Header value.
    pub value: String,
    /// Whether the value is secret.
    pub sensitive: bool,
}

impl fmt::Debug for RequestHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = if self.sensitive { "<redacted>" } else { self.value.as_str() };
        write!(f, "{}: {}", self.name, value)
    }
}

/// One outbound call, built per dispatch and never persisted.
#[derive(Clone)]
pub struct RequestDescriptor {
    /// Provider being called.
    pub provider: ProviderId,
    /// Operation that produced this request.
    pub operation: &'static str,
    /// HTTP method.
    pub method: HttpMethod,
    /// Fully-encoded target URL.
    pub url: Url,
    headers: Vec<RequestHeader>,
}

impl RequestDescriptor {
    /// Creates a GET request.
    pub fn get(provider: ProviderId, operation: &'static str, url: Url) -> Self {
        Self {
            provider,
            operation,
            method: HttpMethod::Get,
            url,
            headers: Vec::new(),
        }
    }

    /// Adds a plain header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(RequestHeader {
            name: name.into(),
            value: value.into(),
            sensitive: false,
        });
        self
    }

    /// Adds a header whose value must never be logged.
    #[must_use]
    pub fn with_secret_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(RequestHeader {
            name: name.into(),
            value: value.into(),
            sensitive: true,
        });
        self
    }

    /// All headers in insertion order.
    pub fn headers(&self) -> &[RequestHeader] {
        &self.headers
    }

    /// Looks up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    /// Returns the value of a query parameter.
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }

    /// Returns true if any header carries a credential.
    pub fn is_authenticated(&self) -> bool {
        self.headers.iter().any(|h| h.sensitive)
    }
}

impl fmt::Debug for RequestDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestDescriptor")
            .field("provider", &self.provider)
            .field("operation", &self.operation)
            .field("method", &self.method.as_str())
            .field("url", &self.url.as_str())
            .field("headers", &self.headers)
            .finish()
    }
}

// ============================================================================
// Raw Response
// ============================================================================

/// Status and body of a completed call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl RawResponse {
    /// Creates a response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// A 200 response with a JSON body.
    pub fn ok_json(value: &serde_json::Value) -> Self {
        Self::new(200, value.to_string())
    }

    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parses the body as JSON.
    pub fn json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

// ============================================================================
// Transport Trait
// ============================================================================

/// Performs HTTP calls on behalf of the dispatcher.
///
/// Implementations own timeouts and any retry policy; the dispatcher calls
/// [`Transport::invoke`] exactly once per dispatch.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs the request.
    async fn invoke(&self, request: &RequestDescriptor) -> Result<RawResponse, TransportError>;
}

// ============================================================================
// Tests
// ============================================================================
