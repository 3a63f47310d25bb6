use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{KvStore, KvStoreExt, Result};

/// A single named slot in a key-value store holding one JSON value.
///
/// The slot is read once when a component starts and overwritten
/// wholesale every time the value changes.
#[derive(Debug)]
pub struct Slot<S, T> {
    store: S,
    key: String,
    _phantom: PhantomData<fn() -> T>,
}

impl<S, T> Slot<S, T>
where
    S: KvStore,
    T: Serialize + DeserializeOwned + Send + Sync,
{
    /// Creates a slot for `key` in `store`.
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            _phantom: PhantomData,
        }
    }

    /// Returns the key this slot is bound to.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads the value held in the slot.
    ///
    /// Returns None if the slot is empty and a serialization error if its
    /// content does not parse as `T`.
    pub async fn load(&self) -> Result<Option<T>> {
        self.store.get_json(&self.key).await
    }

    /// Overwrites the slot with `value`.
    pub async fn save(&self, value: &T) -> Result<()> {
        self.store.set_json(&self.key, value).await
    }

    /// Empties the slot.
    pub async fn clear(&self) -> Result<()> {
        self.store.remove(&self.key).await
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;
    use crate::{InMemoryKvStore, StorageError};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct TestState {
        value: i32,
        name: String,
    }

    #[tokio::test]
    async fn empty_slot_loads_none() {
        let slot: Slot<_, TestState> = Slot::new(InMemoryKvStore::new(), "state");
        assert!(slot.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_and_load() {
        let slot = Slot::new(InMemoryKvStore::new(), "state");
        let original = TestState {
            value: 42,
            name: "test".to_string(),
        };

        slot.save(&original).await.unwrap();

        assert_eq!(slot.load().await.unwrap(), Some(original));
    }

    #[tokio::test]
    async fn clear_empties_slot() {
        let slot = Slot::new(InMemoryKvStore::new(), "state");
        slot.save(&TestState {
            value: 1,
            name: "x".to_string(),
        })
        .await
        .unwrap();

        slot.clear().await.unwrap();

        assert!(slot.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn invalid_content_is_a_serialization_error() {
        let store = InMemoryKvStore::new();
        store.set("state", "{\"value\":".to_string()).await.unwrap();
        let slot: Slot<_, TestState> = Slot::new(store, "state");

        assert!(matches!(
            slot.load().await,
            Err(StorageError::Serialization(_))
        ));
    }
}
