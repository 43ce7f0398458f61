//! File persistence helpers.
//!
//! Every file is written atomically (temp file + rename) and restricted to
//! the owner: 0600 for files, 0700 for the data directory.

use serde::{Serialize, de::DeserializeOwned};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::StoreError;

/// Name of the data directory under the home directory.
const DATA_DIR_NAME: &str = ".tgintel";

/// Credentials file name.
pub const CREDENTIALS_FILE: &str = "credentials.json";

/// Usage ledger file name.
pub const USAGE_FILE: &str = "usage.json";

/// Settings file name.
pub const SETTINGS_FILE: &str = "settings.json";

// ============================================================================
// Default Paths
// ============================================================================

/// Returns the default data directory, `~/.tgintel`.
///
/// Falls back to `./.tgintel` when no home directory is known.
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME)
}

/// Locations of every persisted file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    root: PathBuf,
}

impl DataPaths {
    /// Uses `root` as the data directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The data directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the credentials file.
    pub fn credentials(&self) -> PathBuf {
        self.root.join(CREDENTIALS_FILE)
    }

    /// Path of the usage file.
    pub fn usage(&self) -> PathBuf {
        self.root.join(USAGE_FILE)
    }

    /// Path of the settings file.
    pub fn settings(&self) -> PathBuf {
        self.root.join(SETTINGS_FILE)
    }
}

impl Default for DataPaths {
    fn default() -> Self {
        Self::new(default_data_dir())
    }
}

// ============================================================================
// Security: File Permissions
// ============================================================================

/// Sets restrictive directory permissions (0o700) on Unix systems.
#[cfg(unix)]
async fn set_restrictive_dir_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = tokio::fs::metadata(path).await?.permissions();
    perms.set_mode(0o700);
    tokio::fs::set_permissions(path, perms).await?;

    debug!(path = %path.display(), mode = "0700", "Set restrictive directory permissions");
    Ok(())
}

/// No-op for non-Unix systems.
#[cfg(not(unix))]
async fn set_restrictive_dir_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

// ============================================================================
// File Operations
// ============================================================================

/// Ensures a directory exists with secure permissions.
pub async fn ensure_dir(path: &Path) -> Result<(), StoreError> {
    if !tokio::fs::try_exists(path).await? {
        debug!(path = %path.display(), "Creating directory");
        tokio::fs::create_dir_all(path).await?;
        set_restrictive_dir_permissions(path).await?;
    }
    Ok(())
}

/// Saves data to a JSON file with secure permissions.
///
/// Creates the parent directory if needed, writes to a uniquely named 0600
/// temp file next to the target and renames it into place. Concurrent savers
/// never share a temp file; the last rename wins.
pub async fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<(), StoreError> {
    debug!(path = %path.display(), "Saving JSON file");

    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            ensure_dir(parent).await?;
            parent.to_path_buf()
        }
        None => PathBuf::from("."),
    };

    let json = serde_json::to_vec_pretty(data)?;
    let target = path.to_path_buf();
    tokio::task::spawn_blocking(move || write_atomic(&dir, &target, &json))
        .await
        .map_err(std::io::Error::other)??;

    debug!(path = %path.display(), "JSON file saved securely");
    Ok(())
}

/// Writes `bytes` to a fresh temp file in `dir` and renames it over `target`.
///
/// The temp file is created owner-only, so the content is never readable by
/// others, not even before the rename.
fn write_atomic(dir: &Path, target: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut temp = tempfile::Builder::new()
        .prefix(".tgintel-")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    temp.persist(target).map_err(|e| e.error)?;
    Ok(())
}

/// Loads data from a JSON file.
pub async fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    debug!(path = %path.display(), "Loading JSON file");

    let content = tokio::fs::read_to_string(path).await?;
    let data = serde_json::from_str(&content)?;

    debug!(path = %path.display(), "JSON file loaded");
    Ok(data)
}

/// Loads data from a JSON file, returning `None` if the file does not exist.
///
/// Unreadable or unparsable files are errors.
pub async fn load_json_if_exists<T: DeserializeOwned>(
    path: &Path,
) -> Result<Option<T>, StoreError> {
    match load_json(path).await {
        Ok(data) => Ok(Some(data)),
        Err(e) if e.is_not_found() => {
            debug!(path = %path.display(), "File not found");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

// ============================================================================
// Tests
// ============================================================================
