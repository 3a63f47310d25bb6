use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{Result, StorageError, store::KvStore};

/// In-memory key-value store.
///
/// Provides the same interface as the file-backed store. Clones share
/// the same underlying map, so a test can keep a handle and inspect what
/// another component wrote.
#[derive(Debug, Clone, Default)]
pub struct InMemoryKvStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
    fail_on_write: Arc<AtomicBool>,
}

impl InMemoryKvStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the store to reject writes and removals.
    pub fn set_fail_on_write(&self, fail: bool) {
        self.fail_on_write.store(fail, Ordering::SeqCst);
    }

    /// Returns the number of keys stored.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns true if no keys are stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Clears all keys.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    fn check_writable(&self, key: &str) -> Result<()> {
        if self.fail_on_write.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(format!(
                "write to {key} rejected"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl KvStore for InMemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.check_writable(key)?;
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.check_writable(key)?;
        self.entries.write().await.remove(key);
        Ok(())
    }
}
