//! Store error types.

use std::path::Path;
use thiserror::Error;
use tgintel_core::CoreError;

/// Errors raised by the persistence helpers.
///
/// Callers outside this crate see [`CoreError`]; use
/// [`StoreError::into_read_error`] and [`StoreError::into_write_error`] at the
/// store boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Returns true if the file does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }

    /// Maps a failed read of `path` into [`CoreError::ConfigCorrupt`].
    pub fn into_read_error(self, path: &Path) -> CoreError {
        CoreError::ConfigCorrupt {
            path: path.to_path_buf(),
            reason: self.to_string(),
        }
    }

    /// Maps a failed write of `path` into [`CoreError::ConfigWriteError`].
    pub fn into_write_error(self, path: &Path) -> CoreError {
        CoreError::ConfigWriteError {
            path: path.to_path_buf(),
            reason: self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_not_found_detection() {
        let err = StoreError::Io(std::io::Error::from(std::io::ErrorKind::NotFound));
        assert!(err.is_not_found());

        let err = StoreError::Io(std::io::Error::from(std::io::ErrorKind::PermissionDenied));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_read_error_keeps_path() {
        let parse = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = StoreError::from(parse).into_read_error(Path::new("/tmp/usage.json"));
        match err {
            CoreError::ConfigCorrupt { path, .. } => {
                assert_eq!(path, PathBuf::from("/tmp/usage.json"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
