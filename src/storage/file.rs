//! Filesystem-backed durable store.
//!
//! Stores each key as an individual JSON file under a base directory.
//!
//! # Security
//!
//! Keys are validated before touching the filesystem:
//! - **Path traversal**: only alphanumerics, dashes, and underscores are
//!   accepted, so a key can never escape the base directory
//! - **File size limits**: a maximum file size is enforced on reads to
//!   prevent memory exhaustion from a corrupted or hostile snapshot

use std::fs;
use std::path::{Path, PathBuf};

use super::DurableStore;
use crate::{Error, Result};

/// Maximum size of a single value file (64MB).
///
/// Registry snapshots embed base64 raster images, so the bound is sized
/// for image payloads rather than plain-text records.
const MAX_FILE_SIZE: u64 = 64 * 1024 * 1024;

/// Durable store writing one file per key.
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Base directory for storage.
    base_path: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `base_path`.
    ///
    /// Directory creation is attempted but deferred failures surface on
    /// the first write instead.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        let path = base_path.into();
        let _ = fs::create_dir_all(&path);
        Self { base_path: path }
    }

    /// Creates a store with checked directory creation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if the directory cannot be created.
    pub fn with_create(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path).map_err(|e| Error::Storage {
            operation: "create_storage_dir".to_string(),
            cause: e.to_string(),
        })?;
        Ok(Self { base_path })
    }

    /// Returns the base path.
    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Returns the file path for a key.
    ///
    /// The key is validated first so a crafted key cannot address a file
    /// outside the base directory.
    fn key_path(&self, key: &str) -> Result<PathBuf> {
        if !Self::is_safe_key(key) {
            return Err(Error::Validation(format!(
                "storage key contains invalid characters: {key}"
            )));
        }

        let path = self.base_path.join(format!("{key}.json"));

        // The character check above already rejects ".." and separators;
        // this guards against surprises in path joining.
        if !path.starts_with(&self.base_path) {
            return Err(Error::Validation(format!(
                "path traversal attempt detected for key: {key}"
            )));
        }

        Ok(path)
    }

    /// Checks whether a key is safe to use as a filename.
    fn is_safe_key(key: &str) -> bool {
        !key.is_empty()
            && key.len() <= 255
            && key
                .chars()
                .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    }
}

impl DurableStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let Ok(path) = self.key_path(key) else {
            // An unusable key addresses nothing.
            return Ok(None);
        };

        if !path.exists() {
            return Ok(None);
        }

        let metadata = fs::metadata(&path).map_err(|e| Error::Storage {
            operation: "read_file_metadata".to_string(),
            cause: e.to_string(),
        })?;
        if metadata.len() > MAX_FILE_SIZE {
            return Err(Error::Storage {
                operation: "read_value_file".to_string(),
                cause: format!(
                    "value file exceeds maximum size of {MAX_FILE_SIZE} bytes: {}",
                    path.display()
                ),
            });
        }

        let contents = fs::read_to_string(&path).map_err(|e| Error::Storage {
            operation: "read_value_file".to_string(),
            cause: e.to_string(),
        })?;
        Ok(Some(contents))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _ = fs::create_dir_all(&self.base_path);
        let path = self.key_path(key)?;

        // Write to a sibling temp file, then rename: a reader never
        // observes a partially written snapshot.
        let tmp_path = self.base_path.join(format!("{key}.json.tmp"));
        fs::write(&tmp_path, value).map_err(|e| Error::Storage {
            operation: "write_value_file".to_string(),
            cause: e.to_string(),
        })?;
        fs::rename(&tmp_path, &path).map_err(|e| Error::Storage {
            operation: "commit_value_file".to_string(),
            cause: e.to_string(),
        })?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let Ok(path) = self.key_path(key) else {
            return Ok(());
        };
        if path.exists() {
            fs::remove_file(&path).map_err(|e| Error::Storage {
                operation: "remove_value_file".to_string(),
                cause: e.to_string(),
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, FileStore) {
        let dir = TempDir::new().unwrap();
        let store = FileStore::with_create(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_set_then_get_round_trip() {
        let (_dir, store) = store();
        store.set("layers", r#"{"layers":[]}"#).unwrap();
        assert_eq!(
            store.get("layers").unwrap(),
            Some(r#"{"layers":[]}"#.to_string())
        );
    }

    #[test]
    fn test_get_missing_key_is_none() {
        let (_dir, store) = store();
        assert_eq!(store.get("absent").unwrap(), None);
    }

    #[test]
    fn test_set_replaces_previous_value() {
        let (_dir, store) = store();
        store.set("k", "first").unwrap();
        store.set("k", "second").unwrap();
        assert_eq!(store.get("k").unwrap(), Some("second".to_string()));
    }

    #[test]
    fn test_remove_deletes_value() {
        let (_dir, store) = store();
        store.set("k", "v").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
        // Removing again is a no-op.
        store.remove("k").unwrap();
    }

    #[test]
    fn test_traversal_keys_are_rejected_on_write() {
        let (_dir, store) = store();
        assert!(store.set("../escape", "v").is_err());
        assert!(store.set("a/b", "v").is_err());
        assert!(store.set("", "v").is_err());
    }

    #[test]
    fn test_traversal_keys_read_as_absent() {
        let (_dir, store) = store();
        assert_eq!(store.get("../etc/passwd").unwrap(), None);
    }

    #[test]
    fn test_no_partial_file_left_behind() {
        let (dir, store) = store();
        store.set("snapshot", "payload").unwrap();
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
