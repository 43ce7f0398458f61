//! Quota-aware dispatcher.
//!
//! Turns an operation name and its parameters into exactly one upstream call
//! and a uniform [`Outcome`]:
//!
//! 1. resolve the descriptor and validate parameters (no side effects)
//! 2. gate on the provider's credential, then on the monthly quota
//! 3. build the request and invoke the transport once
//! 4. normalize the body
//! 5. record usage, only after a genuine success of a metered operation
//!
//! There are no retries here; a failed call is reported as it happened.

use std::collections::BTreeMap;
use std::sync::Arc;
use tgintel_core::{
    CoreError, Credentials, OperationReport, Outcome, ProviderAuth, ProviderId, QuotaCheck,
    QuotaLedger, SecretKey, Tier, UpstreamFailure, UsageRecord,
};
use tgintel_fetch::{RawResponse, RequestDescriptor, Transport};
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::catalog::OperationCatalog;
use crate::descriptor::OperationDescriptor;
use crate::normalize::error_message;

/// Caller-supplied parameters, by name.
pub type Params = BTreeMap<String, String>;

/// Parameter of [`Dispatcher::run_free`] fanned out to every free operation.
pub const TARGET_PARAM: &str = "target";

/// RapidAPI host header.
const RAPIDAPI_HOST_HEADER: &str = "x-rapidapi-host";

/// RapidAPI key header.
const RAPIDAPI_KEY_HEADER: &str = "x-rapidapi-key";

// ============================================================================
// Dispatcher
// ============================================================================

/// Executes catalog operations against injected collaborators.
#[derive(Clone)]
pub struct Dispatcher {
    catalog: Arc<OperationCatalog>,
    credentials: Arc<dyn Credentials>,
    ledger: Arc<dyn QuotaLedger>,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("operations", &self.catalog.len())
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Creates a dispatcher over the built-in catalog.
    pub fn new(
        credentials: Arc<dyn Credentials>,
        ledger: Arc<dyn QuotaLedger>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            catalog: Arc::new(OperationCatalog::builtin().clone()),
            credentials,
            ledger,
            transport,
        }
    }

    /// Replaces the catalog.
    #[must_use]
    pub fn with_catalog(mut self, catalog: OperationCatalog) -> Self {
        self.catalog = Arc::new(catalog);
        self
    }

    /// The catalog in use.
    pub fn catalog(&self) -> &OperationCatalog {
        &self.catalog
    }

    /// Runs one operation.
    ///
    /// Validation failures and store errors are `Err`; everything that can
    /// happen to a well-formed request is an [`Outcome`].
    #[instrument(skip(self, params))]
    pub async fn execute(&self, operation: &str, params: &Params) -> Result<Outcome, CoreError> {
        let desc = self.catalog.resolve(operation)?;
        let values = validate_params(desc, params)?;
        let provider = desc.provider;

        let key = if provider.requires_credential() {
            let Some(key) = self.credentials.api_key(provider) else {
                info!(%provider, "No credential configured");
                return Ok(Outcome::MissingCredential { provider });
            };
            Some(key)
        } else {
            None
        };

        if desc.is_metered() {
            let check = self.ledger.check(provider).await?;
            if !check.allowed {
                info!(%provider, limit = check.limit, period = %check.period, "Quota exhausted");
                return Ok(Outcome::QuotaExceeded {
                    provider,
                    limit: check.limit,
                    period: check.period,
                });
            }
        }

        let request = match build_request(desc, &values, key.as_ref()) {
            Ok(request) => request,
            Err(reason) => {
                warn!(%provider, %reason, "Could not build request");
                return Ok(Outcome::TransportFailure { provider, reason });
            }
        };

        let response = match self.transport.invoke(&request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(%provider, error = %e, "Transport failed");
                return Ok(Outcome::TransportFailure {
                    provider,
                    reason: e.to_string(),
                });
            }
        };

        let data = match interpret(desc, &response) {
            Ok(data) => data,
            Err(reason) => {
                debug!(%provider, status = response.status, %reason, "Upstream did not succeed");
                return Ok(Outcome::UpstreamError { provider, reason });
            }
        };

        if desc.is_metered() {
            let record = self.ledger.record_success(provider).await?;
            debug!(%provider, used = record.count, limit = record.limit, "Metered call recorded");
        }

        Ok(Outcome::Success { provider, data })
    }

    /// Runs every free operation in registration order.
    ///
    /// Each operation receives the parameters it declares. The `target`
    /// parameter fills each operation's first required parameter when that
    /// parameter is not given explicitly. A failing operation never stops the
    /// ones after it.
    pub async fn run_free(&self, params: &Params) -> Vec<OperationReport> {
        let target = params.get(TARGET_PARAM);
        let mut reports = Vec::new();

        for desc in self.catalog.list(Tier::Free) {
            let mut own: Params = desc
                .params
                .iter()
                .filter_map(|p| params.get(p.name).map(|v| (p.name.to_string(), v.clone())))
                .collect();
            if let (Some(target), Some(first)) = (target, desc.required_params().first()) {
                own.entry((*first).to_string())
                    .or_insert_with(|| target.clone());
            }

            let result = self.execute(desc.name, &own).await;
            if let Err(e) = &result {
                debug!(operation = desc.name, error = %e, "Free operation rejected");
            }
            reports.push(OperationReport {
                operation: desc.name,
                result,
            });
        }

        reports
    }

    /// Current quota state of a metered provider.
    pub async fn quota(&self, provider: ProviderId) -> Result<QuotaCheck, CoreError> {
        self.ledger.check(provider).await
    }

    /// Zeroes the current period's counter for a metered provider.
    pub async fn reset_quota(&self, provider: ProviderId) -> Result<UsageRecord, CoreError> {
        self.ledger.reset(provider).await
    }

    /// Providers referenced by metered operations.
    pub fn metered_providers(&self) -> Vec<ProviderId> {
        self.catalog.metered_providers()
    }

    /// Returns true if the provider has a configured key, or needs none.
    pub fn has_credential(&self, provider: ProviderId) -> bool {
        !provider.requires_credential() || self.credentials.has(provider)
    }
}

// ============================================================================
// Steps
// ============================================================================

/// Checks and canonicalizes parameters in declaration order.
///
/// Returns `(parameter name, canonical value)` pairs; absent optional parameters
/// take their default or are left out.
fn validate_params(
    desc: &OperationDescriptor,
    params: &Params,
) -> Result<Vec<(&'static str, String)>, CoreError> {
    for name in params.keys() {
        if desc.param(name).is_none() {
            debug!(operation = desc.name, parameter = %name, "Ignoring unknown parameter");
        }
    }

    let mut values = Vec::with_capacity(desc.params.len());
    for param in &desc.params {
        let given = params
            .get(param.name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty());

        let raw = match (given, param.default) {
            (Some(value), _) => value,
            (None, _) if param.required => {
                return Err(CoreError::MissingParameter {
                    operation: desc.name.to_string(),
                    parameter: param.name.to_string(),
                });
            }
            (None, Some(default)) => default,
            (None, None) => continue,
        };

        let value = param
            .kind
            .canonicalize(raw)
            .map_err(|reason| CoreError::InvalidParameter {
                operation: desc.name.to_string(),
                parameter: param.name.to_string(),
                reason,
            })?;
        values.push((param.name, value));
    }
    Ok(values)
}

/// Builds the request descriptor for validated values.
fn build_request(
    desc: &OperationDescriptor,
    values: &[(&'static str, String)],
    key: Option<&SecretKey>,
) -> Result<RequestDescriptor, String> {
    let query = values.iter().filter_map(|(name, value)| {
        desc.param(name).map(|param| (param.query_key, value.as_str()))
    });
    let url = Url::parse_with_params(&desc.endpoint(), query)
        .map_err(|e| format!("invalid endpoint URL: {e}"))?;

    let mut request = RequestDescriptor::get(desc.provider, desc.name, url);
    if desc.provider.auth() == ProviderAuth::RapidApi {
        request = request.with_header(RAPIDAPI_HOST_HEADER, desc.provider.host());
        if let Some(key) = key {
            request = request.with_secret_header(RAPIDAPI_KEY_HEADER, key.expose());
        }
    }
    Ok(request)
}

/// Classifies a completed response and normalizes its body.
fn interpret(
    desc: &OperationDescriptor,
    response: &RawResponse,
) -> Result<serde_json::Value, UpstreamFailure> {
    let body = response.json();

    if !response.is_success() {
        return Err(UpstreamFailure::Status {
            code: response.status,
            message: body.ok().as_ref().and_then(error_message),
        });
    }

    let body = body.map_err(|e| UpstreamFailure::Malformed {
        detail: format!("body is not JSON: {e}"),
    })?;

    (desc.normalize)(&body).map_err(UpstreamFailure::from)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn resolve(name: &str) -> &'static OperationDescriptor {
        OperationCatalog::builtin().resolve(name).unwrap()
    }

    #[test]
    fn test_validate_applies_defaults() {
        let values = validate_params(resolve("entity_search"), &params(&[("query", " durov ")]))
            .unwrap();
        assert_eq!(
            values,
            vec![("query", "durov".to_string()), ("limit", "10".to_string())]
        );
    }

    #[test]
    fn test_validate_blank_is_missing() {
        let err = validate_params(resolve("fetch_full_user"), &params(&[("username", "   ")]))
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::MissingParameter { ref parameter, .. } if parameter == "username"
        ));
    }

    #[test]
    fn test_validate_reports_first_missing_in_order() {
        let err = validate_params(resolve("check_participant"), &Params::new()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::MissingParameter { ref parameter, .. } if parameter == "peer"
        ));
    }

    #[test]
    fn test_validate_invalid_value() {
        let err = validate_params(
            resolve("search_entities"),
            &params(&[("query", "x"), ("limit", "many")]),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidParameter { .. }));
    }

    #[test]
    fn test_build_request_encodes_query() {
        let desc = resolve("bot_id_lookup");
        let values = validate_params(desc, &params(&[("username", "some bot")])).unwrap();
        let request = build_request(desc, &values, None).unwrap();

        assert_eq!(
            request.url.as_str(),
            "https://botsarchive.com/getBotID.php?username=%40some+bot"
        );
        assert!(request.headers().is_empty());
    }

    #[test]
    fn test_build_request_rapidapi_headers() {
        let desc = resolve("fetch_stories");
        let values = validate_params(desc, &params(&[("username", "@durov")])).unwrap();
        let key = SecretKey::new("k-123");
        let request = build_request(desc, &values, Some(&key)).unwrap();

        assert_eq!(request.query_param("peer").as_deref(), Some("durov"));
        assert_eq!(request.query_param("withoutMedia").as_deref(), Some("false"));
        assert_eq!(
            request.header("x-rapidapi-host"),
            Some("telegram-scraper-api.p.rapidapi.com")
        );
        assert_eq!(request.header("x-rapidapi-key"), Some("k-123"));
        assert!(!format!("{request:?}").contains("k-123"));
    }

    #[test]
    fn test_interpret_status_with_message() {
        let desc = resolve("fetch_entity");
        let response = RawResponse::new(429, r#"{"message":"Too many requests"}"#);
        assert_eq!(
            interpret(desc, &response),
            Err(UpstreamFailure::Status {
                code: 429,
                message: Some("Too many requests".to_string()),
            })
        );
    }

    #[test]
    fn test_interpret_non_json_is_malformed() {
        let desc = resolve("fetch_entity");
        let response = RawResponse::new(200, "<html>oops</html>");
        assert!(matches!(
            interpret(desc, &response),
            Err(UpstreamFailure::Malformed { .. })
        ));
    }
}
