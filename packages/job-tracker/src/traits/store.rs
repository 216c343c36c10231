//! Durable key-value storage, the host primitive the store builds on.
//!
//! The backend only knows keys and JSON values. Typed access goes through
//! [`KeyValueExt`], which every backend gets for free.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::error::Result;

/// Key under which the application records are persisted.
pub const APPLICATIONS_KEY: &str = "applications";

/// Key holding the highest application id ever assigned, so ids of deleted
/// records are never handed out again.
pub const LAST_APPLICATION_ID_KEY: &str = "lastApplicationId";

/// Key holding the last domain seen in a completed tab load.
pub const CURRENT_DOMAIN_KEY: &str = "currentDomain";

/// Key holding the relay slot's signal.
pub const AUTO_FILL_DATA_KEY: &str = "autoFillData";

/// Key holding the relay slot's capture time (epoch milliseconds).
pub const AUTO_FILL_TIMESTAMP_KEY: &str = "autoFillTimestamp";

/// Durable key-value slot storage.
///
/// Reads and writes are whole values: callers do read-modify-write and no
/// isolation between concurrent writers is provided. The later write wins.
#[async_trait]
pub trait KeyValueBackend: Send + Sync {
    /// Get the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Replace the value stored under `key`.
    async fn set(&self, key: &str, value: Value) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Get several keys at once; missing keys are left out.
    async fn get_many(&self, keys: &[&str]) -> Result<Vec<(String, Value)>> {
        let mut found = Vec::with_capacity(keys.len());
        for key in keys {
            if let Some(value) = self.get(key).await? {
                found.push((key.to_string(), value));
            }
        }
        Ok(found)
    }
}

/// Typed helpers over any [`KeyValueBackend`].
#[async_trait]
pub trait KeyValueExt: KeyValueBackend {
    /// Load and decode the value under `key`.
    async fn load<T: DeserializeOwned + Send>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Encode and store `value` under `key`.
    async fn save<T: Serialize + Sync>(&self, key: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.set(key, value).await
    }
}

impl<B: KeyValueBackend + ?Sized> KeyValueExt for B {}
