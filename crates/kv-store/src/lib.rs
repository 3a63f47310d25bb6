//! Persistent key-value storage for the shopping cart.
//!
//! A [`KvStore`] holds named slots of serialized text. Two backends are
//! provided: [`InMemoryKvStore`] for tests and ephemeral sessions, and
//! [`FileKvStore`] which keeps one file per key on disk. [`Slot`] layers
//! typed JSON load/save on top of a single key.

pub mod error;
pub mod file;
pub mod memory;
pub mod slot;
pub mod store;

pub use error::{Result, StorageError};
pub use file::FileKvStore;
pub use memory::InMemoryKvStore;
pub use slot::Slot;
pub use store::{KvStore, KvStoreExt};
