//! Credential store.
//!
//! Holds the provider to API key mapping in memory and persists it to an
//! owner-only JSON file. Lookups never touch the filesystem and are
//! synchronous, so the set sits behind a `std::sync::RwLock`.

use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use tgintel_core::{CoreError, CredentialSet, Credentials, ProviderId, SecretKey};
use tracing::{debug, info, instrument};

use crate::persistence::{load_json_if_exists, save_json};

/// Persisted API keys.
#[derive(Debug)]
pub struct CredentialStore {
    path: Option<PathBuf>,
    keys: RwLock<CredentialSet>,
}

impl CredentialStore {
    /// Loads keys from `path`.
    ///
    /// A missing file yields an empty store. A file that cannot be parsed is
    /// reported as [`CoreError::ConfigCorrupt`] and left untouched.
    #[instrument(skip_all)]
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let path = path.into();
        let keys = load_json_if_exists::<CredentialSet>(&path)
            .await
            .map_err(|e| e.into_read_error(&path))?
            .unwrap_or_default();

        debug!(path = %path.display(), configured = keys.len(), "Credentials loaded");
        Ok(Self {
            path: Some(path),
            keys: RwLock::new(keys),
        })
    }

    /// Creates a store that is never persisted.
    pub fn in_memory() -> Self {
        Self::from_set(CredentialSet::new())
    }

    /// Creates an unpersisted store holding `keys`.
    pub fn from_set(keys: CredentialSet) -> Self {
        Self {
            path: None,
            keys: RwLock::new(keys),
        }
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Writes the full set to disk. A no-op for in-memory stores.
    pub async fn save(&self) -> Result<(), CoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let snapshot = self.snapshot();
        save_json(path, &snapshot)
            .await
            .map_err(|e| e.into_write_error(path))?;
        info!(path = %path.display(), configured = snapshot.len(), "Credentials saved");
        Ok(())
    }

    /// Stores a key for `provider`. Surrounding whitespace is trimmed.
    pub fn set(&self, provider: ProviderId, key: &str) -> Result<(), CoreError> {
        let key = SecretKey::new(key.trim());
        if key.is_blank() {
            return Err(CoreError::InvalidParameter {
                operation: "set-key".to_string(),
                parameter: provider.id().to_string(),
                reason: "API key is empty".to_string(),
            });
        }
        self.write().insert(provider, key);
        debug!(%provider, "Credential set");
        Ok(())
    }

    /// Forgets the key for `provider`. Returns true if one was present.
    pub fn remove(&self, provider: ProviderId) -> bool {
        let removed = self.write().remove(provider).is_some();
        debug!(%provider, removed, "Credential removed");
        removed
    }

    /// Masked preview of the key, for status display.
    pub fn masked(&self, provider: ProviderId) -> Option<String> {
        self.read().get(provider).map(SecretKey::masked)
    }

    /// Providers with a configured key.
    pub fn configured(&self) -> Vec<ProviderId> {
        self.read().providers().collect()
    }

    /// Copy of the current set.
    pub fn snapshot(&self) -> CredentialSet {
        self.read().clone()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, CredentialSet> {
        self.keys.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, CredentialSet> {
        self.keys.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Credentials for CredentialStore {
    fn api_key(&self, provider: ProviderId) -> Option<SecretKey> {
        self.read().get(provider).cloned()
    }
}

// ============================================================================
// Tests
// ============================================================================
