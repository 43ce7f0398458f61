//! HTTP client with tracing and a domain allowlist.
//!
//! [`HttpClient`] wraps a reqwest client so that every outbound call is
//! checked against the provider hosts before it leaves the process.
//! [`HttpTransport`] adapts it to the [`Transport`] seam.

use async_trait::async_trait;
use reqwest::{
    Client,
    header::{HeaderMap, HeaderName, HeaderValue},
};
use std::time::Duration;
use tgintel_core::ProviderId;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::{HttpError, TransportError};
use crate::transport::{HttpMethod, RawResponse, RequestDescriptor, Transport};

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// User agent string for TgIntel.
const USER_AGENT: &str = concat!("TgIntel/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// HTTP Client
// ============================================================================

/// HTTP client wrapper with tracing and domain allowlist.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
    timeout: Duration,
    allowed_domains: Option<Vec<String>>,
}

impl HttpClient {
    /// Creates a client with the default timeout and no domain restrictions.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a client with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, HttpError> {
        let inner = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            inner,
            timeout,
            allowed_domains: None,
        })
    }

    /// Restricts requests to the given domains and their subdomains.
    #[must_use]
    pub fn allow_domains(mut self, domains: Vec<String>) -> Self {
        self.allowed_domains = Some(domains);
        self
    }

    /// Restricts requests to the hosts of the known providers.
    #[must_use]
    pub fn allow_provider_hosts(self) -> Self {
        let hosts = ProviderId::all()
            .iter()
            .map(|p| p.host().to_string())
            .collect();
        self.allow_domains(hosts)
    }

    /// Returns the configured timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Checks if a URL's domain is allowed.
    fn is_domain_allowed(&self, url: &Url) -> Result<(), HttpError> {
        let Some(ref allowed) = self.allowed_domains else {
            return Ok(());
        };

        let host = url
            .host_str()
            .ok_or_else(|| HttpError::InvalidUrl("No host in URL".to_string()))?;

        let allowed = allowed
            .iter()
            .any(|domain| host == domain || host.ends_with(&format!(".{domain}")));

        if allowed {
            Ok(())
        } else {
            Err(HttpError::DomainNotAllowed(host.to_string()))
        }
    }

    /// Performs a GET request and reads the full body.
    ///
    /// The URL is logged without its query string; header values are never
    /// logged.
    #[instrument(skip(self, url, headers), fields(host = url.host_str().unwrap_or("")))]
    pub async fn get_text(
        &self,
        url: &Url,
        headers: HeaderMap,
    ) -> Result<(u16, String), HttpError> {
        self.is_domain_allowed(url)?;
        debug!(path = url.path(), "GET request");

        let response = self.inner.get(url.clone()).headers(headers).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(status, bytes = body.len(), "Response received");
        Ok((status, body))
    }
}

/// Builds a reqwest header map from a request descriptor.
fn header_map(request: &RequestDescriptor) -> Result<HeaderMap, HttpError> {
    let mut map = HeaderMap::new();
    for header in request.headers() {
        let name = HeaderName::from_bytes(header.name.as_bytes())
            .map_err(|_| HttpError::InvalidHeader(header.name.clone()))?;
        let mut value = HeaderValue::from_str(&header.value)
            .map_err(|_| HttpError::InvalidHeader(header.name.clone()))?;
        value.set_sensitive(header.sensitive);
        map.insert(name, value);
    }
    Ok(map)
}

// ============================================================================
// HTTP Transport
// ============================================================================

/// [`Transport`] backed by [`HttpClient`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: HttpClient,
}

impl HttpTransport {
    /// Creates a transport restricted to provider hosts.
    pub fn new(timeout: Duration) -> Result<Self, HttpError> {
        Ok(Self {
            client: HttpClient::with_timeout(timeout)?.allow_provider_hosts(),
        })
    }

    /// Wraps an existing client.
    pub fn from_client(client: HttpClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn invoke(&self, request: &RequestDescriptor) -> Result<RawResponse, TransportError> {
        let timeout = self.client.timeout();
        let headers = header_map(request).map_err(|e| e.into_transport(timeout))?;

        match request.method {
            HttpMethod::Get => match self.client.get_text(&request.url, headers).await {
                Ok((status, body)) => Ok(RawResponse { status, body }),
                Err(e) => {
                    let err = e.into_transport(timeout);
                    warn!(
                        provider = %request.provider,
                        operation = request.operation,
                        error = %err,
                        "Transport failure"
                    );
                    Err(err)
                }
            },
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
