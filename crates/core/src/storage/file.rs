//! File-based storage
//!
//! Each key is stored as `<dir>/<key>.json`.

use async_trait::async_trait;
use std::path::PathBuf;

use super::{validate_key, KeyValueStorage};
use crate::{Error, Result};

pub struct FileStorage {
    /// Directory holding one file per key
    dir: PathBuf,
}

impl FileStorage {
    /// Create a new FileStorage rooted at `dir`
    ///
    /// The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl KeyValueStorage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(Error::Storage(format!(
                "Failed to read {}: {}",
                path.display(),
                err
            ))),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;

        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            Error::Storage(format!("Failed to create directory: {}", e))
        })?;

        // Write beside the target and rename so readers never see a partial file
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value).await.map_err(|e| {
            Error::Storage(format!("Failed to write {}: {}", tmp.display(), e))
        })?;
        tokio::fs::rename(&tmp, &path).await.map_err(|e| {
            Error::Storage(format!("Failed to replace {}: {}", path.display(), e))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());

        assert!(storage.get("todo-tasks").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_creates_directory_and_file() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("nested").join("data");
        let storage = FileStorage::new(&dir);

        storage.set("todo-tasks", "[]").await.unwrap();

        assert!(dir.join("todo-tasks.json").exists());
        assert!(!dir.join("todo-tasks.json.tmp").exists());
        assert_eq!(
            storage.get("todo-tasks").await.unwrap(),
            Some("[]".to_string())
        );
    }

    #[tokio::test]
    async fn test_rejects_path_like_keys() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());

        for key in ["", "../escape", "a/b", ".hidden"] {
            match storage.set(key, "[]").await {
                Err(Error::InvalidInput(msg)) => assert!(msg.contains("Invalid storage key")),
                other => panic!("Expected InvalidInput for {:?}, got: {:?}", key, other),
            }
        }
    }
}
