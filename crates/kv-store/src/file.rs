use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::{Result, StorageError, store::KvStore};

/// File-backed key-value store.
///
/// Each key is kept in its own file inside a root directory. Writes go to a
/// temporary sibling file which is then renamed over the target, so a crash
/// mid-write leaves either the old value or the new one.
#[derive(Debug, Clone)]
pub struct FileKvStore {
    root: PathBuf,
}

impl FileKvStore {
    /// Creates a store rooted at `root`.
    ///
    /// The directory is created lazily on the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        Ok(self.root.join(encode_key(key)?))
    }
}

/// Maps a key onto a file name. Characters outside `[A-Za-z0-9._-]` are
/// percent-encoded so distinct keys never share a file.
fn encode_key(key: &str) -> Result<String> {
    if key.is_empty() || key == "." || key == ".." {
        return Err(StorageError::InvalidKey(key.to_string()));
    }

    let mut encoded = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'.' | b'_' | b'-' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded.push_str(".json");
    Ok(encoded)
}

fn io_error(key: &str, source: std::io::Error) -> StorageError {
    StorageError::Io {
        key: key.to_string(),
        source,
    }
}

#[async_trait]
impl KvStore for FileKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(key, e)),
        }
    }

    #[tracing::instrument(skip(self, value))]
    async fn set(&self, key: &str, value: String) -> Result<()> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| io_error(key, e))?;

        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, value.as_bytes())
            .await
            .map_err(|e| io_error(key, e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| io_error(key, e))?;

        tracing::debug!(path = %path.display(), "slot written");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(key, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_key_escapes_reserved_characters() {
        assert_eq!(
            encode_key("@RocketShoes:cart").unwrap(),
            "%40RocketShoes%3Acart.json"
        );
        assert_eq!(encode_key("plain-key_1.v2").unwrap(), "plain-key_1.v2.json");
        assert_eq!(encode_key("../etc").unwrap(), "..%2Fetc.json");
    }

    #[test]
    fn encode_key_rejects_unusable_keys() {
        assert!(matches!(encode_key(""), Err(StorageError::InvalidKey(_))));
        assert!(matches!(encode_key(".."), Err(StorageError::InvalidKey(_))));
    }

    #[test]
    fn encode_key_keeps_distinct_keys_apart() {
        assert_ne!(encode_key("a:b").unwrap(), encode_key("a_b").unwrap());
        assert_ne!(encode_key("a/b").unwrap(), encode_key("a%2Fb").unwrap());
    }
}
