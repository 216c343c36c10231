//! JSON file key-value backend.
//!
//! All keys live in one JSON object on disk. Every write rewrites the whole
//! file through a temporary sibling and a rename, so readers see either the
//! old or the new file.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{Result, TrackerError};
use crate::traits::store::KeyValueBackend;

type Slots = BTreeMap<String, Value>;

/// File-backed storage for a single-user host.
pub struct JsonFileBackend {
    path: PathBuf,
    // Serialises read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl JsonFileBackend {
    /// Use `path` as the storage file. It is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_slots(&self) -> Result<Slots> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Slots::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Slots::new()),
            Err(e) => Err(TrackerError::storage(e)),
        }
    }

    async fn write_slots(&self, slots: &Slots) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(TrackerError::storage)?;
            }
        }

        let bytes = serde_json::to_vec_pretty(slots)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(TrackerError::storage)?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(TrackerError::storage)?;

        debug!(path = %self.path.display(), keys = slots.len(), "Storage file written");
        Ok(())
    }
}

#[async_trait]
impl KeyValueBackend for JsonFileBackend {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let mut slots = self.read_slots().await?;
        Ok(slots.remove(key))
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut slots = self.read_slots().await?;
        slots.insert(key.to_string(), value);
        self.write_slots(&slots).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut slots = self.read_slots().await?;
        if slots.remove(key).is_some() {
            self.write_slots(&slots).await?;
        }
        Ok(())
    }

    async fn get_many(&self, keys: &[&str]) -> Result<Vec<(String, Value)>> {
        let mut slots = self.read_slots().await?;
        Ok(keys
            .iter()
            .filter_map(|key| slots.remove(*key).map(|v| (key.to_string(), v)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("storage.json"));

        assert!(backend.get("applications").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_values_survive_a_new_instance() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let backend = JsonFileBackend::new(&path);
        backend.set("currentDomain", json!("acme.com")).await.unwrap();
        backend.set("applications", json!([])).await.unwrap();

        let reopened = JsonFileBackend::new(&path);
        assert_eq!(
            reopened.get("currentDomain").await.unwrap(),
            Some(json!("acme.com"))
        );
        assert_eq!(reopened.get("applications").await.unwrap(), Some(json!([])));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "{not json").unwrap();

        let backend = JsonFileBackend::new(&path);
        assert!(matches!(
            backend.get("applications").await,
            Err(TrackerError::Json(_))
        ));
    }

    #[tokio::test]
    async fn test_remove() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("storage.json"));

        backend.set("a", json!(1)).await.unwrap();
        backend.set("b", json!(2)).await.unwrap();
        backend.remove("a").await.unwrap();
        backend.remove("missing").await.unwrap();

        let found = backend.get_many(&["a", "b"]).await.unwrap();
        assert_eq!(found, vec![("b".to_string(), json!(2))]);
    }
}
