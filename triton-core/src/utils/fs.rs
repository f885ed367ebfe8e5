//! Filesystem utilities.
//!
//! Small wrappers that map `std::io::Error` into [`CoreError::Filesystem`] so
//! callers get the offending path in the message.

use crate::error::CoreError;
use std::fs;
use std::path::Path;

/// Ensures that a directory exists at the given path, creating parents as needed.
///
/// # Errors
///
/// Returns [`CoreError::Filesystem`] if the path exists but is not a directory, or
/// if directory creation fails.
pub fn ensure_dir_exists(path: &Path) -> Result<(), CoreError> {
    if path.exists() {
        if path.is_dir() {
            Ok(())
        } else {
            Err(CoreError::Filesystem {
                message: "Path exists but is not a directory".to_string(),
                path: path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::AlreadyExists,
                    "Path exists but is not a directory",
                ),
            })
        }
    } else {
        fs::create_dir_all(path).map_err(|e| CoreError::Filesystem {
            message: "Failed to create directory".to_string(),
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Async variant of [`ensure_dir_exists`] for use inside tokio tasks.
pub async fn ensure_dir_exists_async(path: &Path) -> Result<(), CoreError> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(CoreError::Filesystem {
            message: "Path exists but is not a directory".to_string(),
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::AlreadyExists, "Path exists but is not a directory"),
        }),
        Err(_) => tokio::fs::create_dir_all(path).await.map_err(|e| CoreError::Filesystem {
            message: "Failed to create directory".to_string(),
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_ensure_dir_exists_creates_nested() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        ensure_dir_exists(&nested).unwrap();
        assert!(nested.is_dir());
        // Second call is a no-op.
        ensure_dir_exists(&nested).unwrap();
    }

    #[test]
    fn test_ensure_dir_exists_rejects_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("file.txt");
        fs::write(&file_path, "x").unwrap();
        match ensure_dir_exists(&file_path) {
            Err(CoreError::Filesystem { path, .. }) => assert_eq!(path, file_path),
            other => panic!("Expected Filesystem error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_ensure_dir_exists_async() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("store");
        ensure_dir_exists_async(&nested).await.unwrap();
        assert!(nested.is_dir());
    }
}
