use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::Result;

/// Core trait for key-value store implementations.
///
/// Each key names a single slot holding a text value. Writes replace the
/// whole value; there are no partial updates and no versioning.
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// Returns None if the key has never been written or was removed.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrites the value stored under `key`.
    async fn set(&self, key: &str, value: String) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Extension trait providing JSON helpers for key-value stores.
#[async_trait]
pub trait KvStoreExt: KvStore {
    /// Reads and deserializes the JSON value stored under `key`.
    async fn get_json<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        match self.get(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Serializes `value` as JSON and stores it under `key`.
    async fn set_json<T>(&self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize + Sync,
    {
        let raw = serde_json::to_string(value)?;
        self.set(key, raw).await
    }

    /// Checks if a value exists under `key`.
    async fn contains_key(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }
}

// Blanket implementation for all KvStore implementations
impl<T: KvStore + ?Sized> KvStoreExt for T {}

#[async_trait]
impl<T: KvStore + ?Sized> KvStore for std::sync::Arc<T> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key).await
    }
}
