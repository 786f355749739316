//! Storage-specific error types for the file store.
//!
//! These wrap I/O and JSON failures and are converted to
//! `ysws_notifier_core::Error::Storage` before reaching callers.

use std::path::PathBuf;

use thiserror::Error;
use ysws_notifier_core::errors::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Store file {path} is not a JSON object of strings: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        Error::Storage(err.to_string())
    }
}

/// Extension trait for converting storage results to core results.
pub trait IntoCore<T> {
    fn into_core(self) -> ysws_notifier_core::Result<T>;
}

impl<T> IntoCore<T> for std::result::Result<T, StorageError> {
    fn into_core(self) -> ysws_notifier_core::Result<T> {
        self.map_err(Error::from)
    }
}
