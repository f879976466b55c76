//! Where the Decoder gets its [`RecordStore`] from.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::TransportError;
use crate::protocol::RecordStore;

/// A fetchable, read-only record store.
///
/// Each call fetches the whole store; callers treat the result as immutable
/// for the resolution that requested it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch and parse the full store.
    async fn fetch(&self) -> Result<RecordStore, TransportError>;

    /// Short human-readable description for logs and health output.
    fn describe(&self) -> String;
}

/// Reads the store from a JSON file on local disk.
#[derive(Debug, Clone)]
pub struct FileRecordSource {
    path: PathBuf,
}

impl FileRecordSource {
    /// Create a source reading from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this source reads.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RecordSource for FileRecordSource {
    async fn fetch(&self) -> Result<RecordStore, TransportError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| TransportError::Io {
                path: self.path.display().to_string(),
                source,
            })?;
        Ok(RecordStore::from_slice(&bytes)?)
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn reads_store_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"alice": {{"iv": "a", "salt": "b", "ciphertext": "c"}}}}"#).unwrap();
        let source = FileRecordSource::new(file.path());
        let store = source.fetch().await.unwrap();
        assert_eq!(store.get("alice").unwrap().iv, "a");
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileRecordSource::new(dir.path().join("messages-encrypted.json"));
        assert!(matches!(source.fetch().await, Err(TransportError::Io { .. })));
    }

    #[tokio::test]
    async fn invalid_json_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let source = FileRecordSource::new(file.path());
        assert!(matches!(source.fetch().await, Err(TransportError::Parse(_))));
    }

    #[test]
    fn describe_names_the_path() {
        let source = FileRecordSource::new("/srv/card/messages-encrypted.json");
        assert_eq!(source.describe(), "file:/srv/card/messages-encrypted.json");
    }
}
