//! JSON output formatting.

use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use tgintel_core::{OperationReport, Outcome, ProviderId, QuotaCheck};
use tgintel_store::{DataPaths, Settings};

// ============================================================================
// Output Types
// ============================================================================

/// JSON output of a single dispatch.
#[derive(Debug, Serialize)]
pub struct RunOutput<'a> {
    pub operation: &'a str,
    pub result: &'a Outcome,
}

/// JSON output of the free search.
#[derive(Debug, Serialize)]
pub struct SearchOutput<'a> {
    pub target: &'a str,
    pub reports: &'a [OperationReport],
}

/// Quota state of one metered provider.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageOutput {
    pub provider: ProviderId,
    pub display_name: &'static str,
    pub period: String,
    pub used: u32,
    pub limit: u32,
    pub remaining: u32,
    pub allowed: bool,
    pub resets_on: String,
}

impl From<&QuotaCheck> for UsageOutput {
    fn from(check: &QuotaCheck) -> Self {
        Self {
            provider: check.provider,
            display_name: check.provider.display_name(),
            period: check.period.to_string(),
            used: check.used,
            limit: check.limit,
            remaining: check.remaining,
            allowed: check.allowed,
            resets_on: check.period.resets_on().to_string(),
        }
    }
}

/// Key status without the key itself.
#[derive(Debug, Serialize)]
pub struct KeyOutput {
    pub configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

/// Data file locations.
#[derive(Debug, Serialize)]
pub struct PathsOutput {
    pub data_dir: String,
    pub credentials_file: String,
    pub usage_file: String,
    pub settings_file: String,
}

impl From<&DataPaths> for PathsOutput {
    fn from(paths: &DataPaths) -> Self {
        Self {
            data_dir: paths.root().display().to_string(),
            credentials_file: paths.credentials().display().to_string(),
            usage_file: paths.usage().display().to_string(),
            settings_file: paths.settings().display().to_string(),
        }
    }
}

/// Full configuration view.
#[derive(Debug, Serialize)]
pub struct ConfigOutput<'a> {
    pub paths: PathsOutput,
    pub keys: BTreeMap<ProviderId, KeyOutput>,
    pub settings: &'a Settings,
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats the quota state of several providers.
    pub fn format_usage(&self, checks: &[QuotaCheck]) -> Result<String> {
        let outputs: Vec<UsageOutput> = checks.iter().map(UsageOutput::from).collect();
        self.format(&outputs)
    }
}
