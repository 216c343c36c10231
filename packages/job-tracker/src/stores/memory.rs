//! In-memory key-value backend for testing and development.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::error::Result;
use crate::traits::store::KeyValueBackend;

/// In-memory key-value storage.
///
/// Useful for testing and for hosts that keep everything in one process.
/// Data is lost on restart.
#[derive(Default)]
pub struct MemoryBackend {
    slots: RwLock<HashMap<String, Value>>,
}

impl MemoryBackend {
    /// Create a new empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.slots.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl KeyValueBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self
            .slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        self.slots
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.slots
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::store::KeyValueExt;
    use serde_json::json;

    #[tokio::test]
    async fn test_set_get_remove() {
        let backend = MemoryBackend::new();
        assert!(backend.get("missing").await.unwrap().is_none());

        backend.set("currentDomain", json!("acme.com")).await.unwrap();
        assert_eq!(
            backend.get("currentDomain").await.unwrap(),
            Some(json!("acme.com"))
        );

        backend.remove("currentDomain").await.unwrap();
        backend.remove("currentDomain").await.unwrap();
        assert!(backend.is_empty());
    }

    #[tokio::test]
    async fn test_typed_helpers() {
        let backend = MemoryBackend::new();
        backend.save("numbers", &vec![1u32, 2, 3]).await.unwrap();

        let numbers: Option<Vec<u32>> = backend.load("numbers").await.unwrap();
        assert_eq!(numbers, Some(vec![1, 2, 3]));

        let wrong: crate::error::Result<Option<String>> = backend.load("numbers").await;
        assert!(wrong.is_err());
    }

    #[tokio::test]
    async fn test_get_many_skips_missing() {
        let backend = MemoryBackend::new();
        backend.set("a", json!(1)).await.unwrap();

        let found = backend.get_many(&["a", "b"]).await.unwrap();
        assert_eq!(found, vec![("a".to_string(), json!(1))]);
    }
}
