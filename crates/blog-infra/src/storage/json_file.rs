//! JSON array files with atomic replace.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use blog_core::error::RepoError;

/// A JSON file holding an array of records.
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Read all records.
    ///
    /// A missing file is an empty collection. So is unparseable content, which
    /// is logged and will be overwritten by the next save.
    pub async fn load<T: DeserializeOwned>(&self) -> Result<Vec<T>, RepoError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "Data file not found, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(RepoError::Io(e.to_string())),
        };

        match serde_json::from_slice(&bytes) {
            Ok(records) => Ok(records),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Data file is not valid JSON, starting empty"
                );
                Ok(Vec::new())
            }
        }
    }

    /// Replace the file contents with `records`.
    ///
    /// Data is written to `<path>.tmp` and renamed over the target, so the
    /// file on disk is always either the old or the new collection.
    pub async fn save<T: Serialize>(&self, records: &[T]) -> Result<(), RepoError> {
        let body = serde_json::to_vec_pretty(records)
            .map_err(|e| RepoError::Serialization(e.to_string()))?;
        let temp = self.temp_path();

        tokio::fs::write(&temp, body)
            .await
            .map_err(|e| RepoError::Io(format!("writing {}: {}", temp.display(), e)))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| RepoError::Io(format!("replacing {}: {}", self.path.display(), e)))?;

        tracing::debug!(path = %self.path.display(), records = records.len(), "Data file saved");
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A fresh path under the system temp directory.
    pub(crate) fn temp_file(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("blog-infra-{}-{}.json", name, uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let file = JsonFile::new(temp_file("missing"));
        let records: Vec<u32> = file.load().await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_json_is_empty() {
        let path = temp_file("invalid");
        tokio::fs::write(&path, b"{ not json").await.unwrap();

        let records: Vec<u32> = JsonFile::new(&path).load().await.unwrap();

        assert!(records.is_empty());
        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let path = temp_file("save");
        let file = JsonFile::new(&path);

        file.save(&[1u32, 2, 3]).await.unwrap();
        let records: Vec<u32> = file.load().await.unwrap();

        assert_eq!(records, vec![1, 2, 3]);
        assert!(!file.temp_path().exists());
        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_save_into_missing_directory_fails() {
        let file = JsonFile::new(temp_file("dir").join("nested.json"));

        let result = file.save(&[1u32]).await;

        assert!(matches!(result, Err(RepoError::Io(_))));
    }
}
