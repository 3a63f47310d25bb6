use thiserror::Error;

/// Errors that can occur when reading or writing a key-value store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The key cannot be used by this store.
    #[error("Invalid key: {0:?}")]
    InvalidKey(String),

    /// An I/O error occurred while accessing a key.
    #[error("I/O error on key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backend refused the operation.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Result type for key-value store operations.
pub type Result<T> = std::result::Result<T, StorageError>;
