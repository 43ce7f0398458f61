//! User preferences store.
//!
//! Settings are optional: a missing or unparsable file falls back to the
//! defaults with a warning.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tgintel_core::{CoreError, ProviderId};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::persistence::{load_json_if_exists, save_json};
use crate::usage_ledger::{MonthlyLimits, default_limits};

// ============================================================================
// Settings Types
// ============================================================================

/// User preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Monthly call budget per metered provider.
    pub monthly_limits: MonthlyLimits,

    /// Timeout for a single upstream call, in seconds.
    pub request_timeout_secs: u64,

    /// Result count used by search operations when none is given.
    pub default_search_limit: u32,

    /// Log level.
    pub log_level: LogLevel,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            monthly_limits: default_limits(),
            request_timeout_secs: 15,
            default_search_limit: 10,
            log_level: LogLevel::default(),
        }
    }
}

impl Settings {
    /// Request timeout as a [`Duration`], never zero.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Budget for a provider, if it is metered.
    pub fn monthly_limit(&self, provider: ProviderId) -> Option<u32> {
        self.monthly_limits.get(&provider).copied()
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// Error level logging.
    Error,
    /// Warning level logging.
    #[default]
    Warn,
    /// Info level logging.
    Info,
    /// Debug level logging.
    Debug,
    /// Trace level logging.
    Trace,
}

impl LogLevel {
    /// Directive name understood by `EnvFilter`.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Settings Store
// ============================================================================

/// Persistent settings store.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    settings: Arc<RwLock<Settings>>,
    path: PathBuf,
}

impl SettingsStore {
    /// Creates a store holding the defaults.
    pub fn new(path: PathBuf) -> Self {
        Self {
            settings: Arc::new(RwLock::new(Settings::default())),
            path,
        }
    }

    /// Loads settings from a path, falling back to the defaults.
    pub async fn load(path: PathBuf) -> Self {
        let settings = match load_json_if_exists::<Settings>(&path).await {
            Ok(Some(settings)) => {
                info!(path = %path.display(), "Settings loaded");
                settings
            }
            Ok(None) => {
                debug!(path = %path.display(), "Settings file not found, using defaults");
                Settings::default()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to load settings, using defaults");
                Settings::default()
            }
        };

        Self {
            settings: Arc::new(RwLock::new(settings)),
            path,
        }
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets a copy of the current settings.
    pub async fn get(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// Applies `f` to the settings in memory.
    pub async fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut Settings),
    {
        let mut settings = self.settings.write().await;
        f(&mut settings);
    }

    /// Saves settings to disk.
    pub async fn save(&self) -> Result<(), CoreError> {
        let settings = self.settings.read().await;
        save_json(&self.path, &*settings)
            .await
            .map_err(|e| e.into_write_error(&self.path))?;
        info!(path = %self.path.display(), "Settings saved");
        Ok(())
    }

    // ========================================================================
    // Convenience Methods
    // ========================================================================

    /// Sets the monthly budget for a provider.
    pub async fn set_monthly_limit(&self, provider: ProviderId, limit: u32) {
        self.update(|s| {
            s.monthly_limits.insert(provider, limit);
        })
        .await;
    }

    /// Restores every setting to its default.
    pub async fn reset(&self) {
        self.update(|s| *s = Settings::default()).await;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.monthly_limit(ProviderId::TelegramScraper), Some(15));
        assert_eq!(settings.monthly_limit(ProviderId::BotsArchive), None);
        assert_eq!(settings.request_timeout(), Duration::from_secs(15));
        assert_eq!(settings.default_search_limit, 10);
        assert_eq!(settings.log_level, LogLevel::Warn);
    }

    #[test]
    fn test_zero_timeout_is_clamped() {
        let settings = Settings {
            request_timeout_secs: 0,
            ..Settings::default()
        };
        assert_eq!(settings.request_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"request_timeout_secs": 30}"#).unwrap();
        assert_eq!(settings.request_timeout_secs, 30);
        assert_eq!(settings.monthly_limit(ProviderId::TelegramScraper), Some(15));
    }

    #[tokio::test]
    async fn test_settings_store_update() {
        let store = SettingsStore::new(PathBuf::from("/tmp/tgintel_test_settings.json"));
        store.set_monthly_limit(ProviderId::TelegramScraper, 100).await;
        assert_eq!(
            store.get().await.monthly_limit(ProviderId::TelegramScraper),
            Some(100)
        );

        store.reset().await;
        assert_eq!(store.get().await, Settings::default());
    }
}
