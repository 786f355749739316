use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use ysws_notifier_core::kv::KeyValueStore;
use ysws_notifier_core::Result;

use crate::errors::{IntoCore, StorageError};

type Document = BTreeMap<String, String>;

/// A key-value store persisted as one JSON object in a file.
///
/// The document is loaded once on [`open`](Self::open) and kept in memory.
/// Writes go to a sibling temp file which is then renamed over the existing file,
/// so a crash mid-write leaves the previous document intact. The cache is
/// only updated after the rename succeeds.
pub struct FileKeyValueStore {
    path: PathBuf,
    document: Mutex<Document>,
}

impl FileKeyValueStore {
    /// Opens the store at `path`, creating parent directories as needed.
    ///
    /// A missing file is an empty store. A file that is not a JSON object of
    /// strings is rejected rather than silently overwritten.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| StorageError::WriteFailed {
                    path: parent.to_path_buf(),
                    source,
                })
                .into_core()?;
        }

        let document = read_document(&path).await.into_core()?;
        log::info!(
            "Opened file store at {} ({} keys)",
            path.display(),
            document.len()
        );

        Ok(Self {
            path,
            document: Mutex::new(document),
        })
    }

    async fn persist(&self, document: &Document) -> std::result::Result<(), StorageError> {
        let contents = serde_json::to_vec_pretty(document)?;
        let tmp_path = self.path.with_extension("json.tmp");

        tokio::fs::write(&tmp_path, &contents)
            .await
            .map_err(|source| StorageError::WriteFailed {
                path: tmp_path.clone(),
                source,
            })?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|source| StorageError::WriteFailed {
                path: self.path.clone(),
                source,
            })
    }
}

async fn read_document(path: &Path) -> std::result::Result<Document, StorageError> {
    match tokio::fs::read(path).await {
        Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Document::new()),
        Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| StorageError::Corrupt {
            path: path.to_path_buf(),
            source,
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Document::new()),
        Err(source) => Err(StorageError::ReadFailed {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let document = self.document.lock().await;
        Ok(document.get(key).cloned())
    }

    async fn put(&self, key: &str, value: String) -> Result<()> {
        let mut document = self.document.lock().await;
        let mut updated = document.clone();
        updated.insert(key.to_string(), value);

        self.persist(&updated).await.into_core()?;
        *document = updated;
        log::debug!("Persisted key '{}' to {}", key, self.path.display());
        Ok(())
    }
}
