//! File-backed document store
//!
//! The documentation is kept as the JSON text of a single `<key>.json` file
//! inside the configured directory. Writes go through a temporary file in
//! the same directory and are renamed into place.

use async_trait::async_trait;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::domain::{DocumentStore, Documentation, StoreError};

pub struct FileDocumentStore {
    dir: PathBuf,
    key: String,
}

impl FileDocumentStore {
    pub fn new(dir: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            key: key.into(),
        }
    }

    /// Path of the file holding the documentation
    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.key))
    }

    fn write_atomic(dir: &Path, path: &Path, contents: &[u8]) -> Result<(), StoreError> {
        std::fs::create_dir_all(dir)?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(contents)?;
        tmp.flush()?;
        tmp.persist(path).map_err(|e| StoreError::Persist {
            path: path.display().to_string(),
            reason: e.error.to_string(),
        })?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FileDocumentStore {
    async fn load(&self) -> Result<Option<Documentation>, StoreError> {
        let path = self.path();
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        debug!("Loaded documentation from {}", path.display());
        Ok(Some(serde_json::from_str(&content)?))
    }

    async fn save(&self, documentation: &Documentation) -> Result<(), StoreError> {
        let contents = serde_json::to_vec_pretty(documentation)?;
        let dir = self.dir.clone();
        let path = self.path();

        tokio::task::spawn_blocking(move || Self::write_atomic(&dir, &path, &contents))
            .await
            .map_err(|e| StoreError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))??;

        debug!("Saved documentation to {}", self.path().display());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        match tokio::fs::remove_file(self.path()).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::route_generator::generate_routes;
    use serde_json::json;
    use tempfile::TempDir;

    fn documentation() -> Documentation {
        let sample = json!({ "posts": [{ "id": 1, "title": "Hello" }] });
        Documentation {
            routes: generate_routes(&sample, "/api/v1"),
            api_prefix: "/api/v1".to_string(),
            json_structure: sample.clone(),
            json_data: Some(sample),
            timestamp: Some(chrono::Utc::now()),
        }
    }

    #[tokio::test]
    async fn test_missing_file_loads_none() {
        let dir = TempDir::new().unwrap();
        let store = FileDocumentStore::new(dir.path(), "api-documentation");
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_round_trip_creates_directory() {
        let dir = TempDir::new().unwrap();
        let store = FileDocumentStore::new(dir.path().join("nested"), "docs");
        let doc = documentation();

        store.save(&doc).await.unwrap();
        assert!(store.path().exists());
        assert_eq!(store.load().await.unwrap(), Some(doc));
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = FileDocumentStore::new(dir.path(), "docs");

        store.save(&documentation()).await.unwrap();
        store.clear().await.unwrap();
        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = FileDocumentStore::new(dir.path(), "docs");
        std::fs::write(store.path(), "not json").unwrap();

        assert!(matches!(store.load().await, Err(StoreError::Json(_))));
    }
}
