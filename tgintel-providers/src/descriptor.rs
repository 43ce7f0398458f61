//! Operation descriptor system.
//!
//! A descriptor holds all the static configuration for one logical lookup:
//! - Identity (name, title, provider, tier)
//! - Parameters and how each one is canonicalized
//! - Endpoint (path plus query bindings)
//! - Response normalizer

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use tgintel_core::{ProviderId, Tier, UpstreamFailure};
use thiserror::Error;

// ============================================================================
// Normalizer
// ============================================================================

/// Why a response body could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// Well-formed payload that carries no result.
    #[error("no result")]
    NotFound,

    /// Upstream reported an error inside a 2xx body.
    #[error("upstream error: {0}")]
    ErrorPayload(String),

    /// Body does not have the expected shape.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl From<NormalizeError> for UpstreamFailure {
    fn from(err: NormalizeError) -> Self {
        match err {
            NormalizeError::NotFound => UpstreamFailure::NoResult,
            NormalizeError::ErrorPayload(message) => UpstreamFailure::ErrorPayload { message },
            NormalizeError::Malformed(detail) => UpstreamFailure::Malformed { detail },
        }
    }
}

/// Maps a parsed response body to the uniform result shape.
pub type Normalizer = fn(&serde_json::Value) -> Result<serde_json::Value, NormalizeError>;

// ============================================================================
// Parameters
// ============================================================================

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{6,15}$").expect("Invalid regex"));

/// How a parameter value is canonicalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    /// Username, channel or group; a leading `@` is stripped.
    Peer,
    /// Bot username; a leading `@` is ensured.
    BotHandle,
    /// Phone number in international format.
    Phone,
    /// Free text, passed through.
    Text,
    /// Positive integer.
    Count,
    /// `true` or `false`.
    Flag,
}

impl ParamKind {
    /// Canonicalizes a trimmed, non-empty value.
    pub fn canonicalize(&self, raw: &str) -> Result<String, String> {
        match self {
            Self::Peer => {
                let peer = raw.trim_start_matches('@').trim();
                if peer.is_empty() {
                    Err("empty after removing '@'".to_string())
                } else {
                    Ok(peer.to_string())
                }
            }
            Self::BotHandle => {
                let handle = raw.trim_start_matches('@').trim();
                if handle.is_empty() {
                    Err("empty after removing '@'".to_string())
                } else {
                    Ok(format!("@{handle}"))
                }
            }
            Self::Phone => {
                let compact: String = raw
                    .chars()
                    .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '.'))
                    .collect();
                if PHONE_RE.is_match(&compact) {
                    Ok(compact)
                } else {
                    Err(format!("'{raw}' is not a phone number"))
                }
            }
            Self::Text => Ok(raw.to_string()),
            Self::Count => match raw.parse::<u32>() {
                Ok(n) if n > 0 => Ok(n.to_string()),
                _ => Err(format!("'{raw}' is not a positive integer")),
            },
            Self::Flag => match raw.to_ascii_lowercase().as_str() {
                "true" | "yes" | "y" | "1" => Ok("true".to_string()),
                "false" | "no" | "n" | "0" => Ok("false".to_string()),
                _ => Err(format!("'{raw}' is not true or false")),
            },
        }
    }

    /// Short label for listings.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Peer => "peer",
            Self::BotHandle => "bot",
            Self::Phone => "phone",
            Self::Text => "text",
            Self::Count => "count",
            Self::Flag => "flag",
        }
    }
}

/// One declared parameter.
#[derive(Debug, Clone, Serialize)]
pub struct ParamSpec {
    /// Caller-facing name.
    pub name: &'static str,
    /// Query-string key on the upstream request.
    #[serde(skip)]
    pub query_key: &'static str,
    /// Canonicalization rule.
    pub kind: ParamKind,
    /// Whether the caller must supply it.
    pub required: bool,
    /// Value used when an optional parameter is absent.
    pub default: Option<&'static str>,
    /// Prompt shown by interactive front ends.
    pub prompt: &'static str,
}

impl ParamSpec {
    /// A required parameter.
    pub const fn required(
        name: &'static str,
        query_key: &'static str,
        kind: ParamKind,
        prompt: &'static str,
    ) -> Self {
        Self {
            name,
            query_key,
            kind,
            required: true,
            default: None,
            prompt,
        }
    }

    /// An optional parameter with a default.
    pub const fn optional(
        name: &'static str,
        query_key: &'static str,
        kind: ParamKind,
        default: &'static str,
        prompt: &'static str,
    ) -> Self {
        Self {
            name,
            query_key,
            kind,
            required: false,
            default: Some(default),
            prompt,
        }
    }
}

// ============================================================================
// Operation Descriptor
// ============================================================================

/// Complete descriptor for an operation.
#[derive(Clone)]
pub struct OperationDescriptor {
    /// Unique operation name.
    pub name: &'static str,
    /// Human-readable title.
    pub title: &'static str,
    /// Upstream serving the operation.
    pub provider: ProviderId,
    /// Free or metered.
    pub tier: Tier,
    /// Ordered parameter list.
    pub params: Vec<ParamSpec>,
    /// Request path on the provider host.
    pub path: &'static str,
    /// Response normalizer.
    pub normalize: Normalizer,
}

impl std::fmt::Debug for OperationDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationDescriptor")
            .field("name", &self.name)
            .field("provider", &self.provider)
            .field("tier", &self.tier)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl OperationDescriptor {
    /// Creates a new descriptor builder.
    pub fn builder(name: &'static str, provider: ProviderId) -> OperationDescriptorBuilder {
        OperationDescriptorBuilder::new(name, provider)
    }

    /// Names of the required parameters, in declaration order.
    pub fn required_params(&self) -> Vec<&'static str> {
        self.params
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name)
            .collect()
    }

    /// Looks up a parameter by name.
    pub fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Returns true for metered operations.
    pub fn is_metered(&self) -> bool {
        self.tier == Tier::Metered
    }

    /// Base URL of the endpoint, without query string.
    pub fn endpoint(&self) -> String {
        format!("https://{}{}", self.provider.host(), self.path)
    }

    /// Serializable summary for listings.
    pub fn summary(&self) -> OperationSummary {
        OperationSummary {
            name: self.name,
            title: self.title,
            provider: self.provider,
            tier: self.tier,
            params: self.params.clone(),
        }
    }
}

/// Listing view of an [`OperationDescriptor`].
#[derive(Debug, Clone, Serialize)]
pub struct OperationSummary {
    /// Operation name.
    pub name: &'static str,
    /// Title.
    pub title: &'static str,
    /// Provider.
    pub provider: ProviderId,
    /// Tier.
    pub tier: Tier,
    /// Parameters.
    pub params: Vec<ParamSpec>,
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`OperationDescriptor`].
pub struct OperationDescriptorBuilder {
    name: &'static str,
    title: Option<&'static str>,
    provider: ProviderId,
    tier: Tier,
    params: Vec<ParamSpec>,
    path: &'static str,
    normalize: Normalizer,
}

impl OperationDescriptorBuilder {
    /// Creates a builder for a free operation with a pass-through normalizer.
    pub fn new(name: &'static str, provider: ProviderId) -> Self {
        Self {
            name,
            title: None,
            provider,
            tier: Tier::Free,
            params: Vec::new(),
            path: "/",
            normalize: crate::normalize::passthrough,
        }
    }

    /// Sets the title.
    #[must_use]
    pub fn title(mut self, title: &'static str) -> Self {
        self.title = Some(title);
        self
    }

    /// Marks the operation as metered.
    #[must_use]
    pub fn metered(mut self) -> Self {
        self.tier = Tier::Metered;
        self
    }

    /// Appends a parameter.
    #[must_use]
    pub fn param(mut self, param: ParamSpec) -> Self {
        self.params.push(param);
        self
    }

    /// Sets the request path.
    #[must_use]
    pub fn path(mut self, path: &'static str) -> Self {
        self.path = path;
        self
    }

    /// Sets the normalizer.
    #[must_use]
    pub fn normalizer(mut self, normalize: Normalizer) -> Self {
        self.normalize = normalize;
        self
    }

    /// Builds the descriptor.
    pub fn build(self) -> OperationDescriptor {
        OperationDescriptor {
            name: self.name,
            title: self.title.unwrap_or(self.name),
            provider: self.provider,
            tier: self.tier,
            params: self.params,
            path: self.path,
            normalize: self.normalize,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
