//! Core error types for the notifier.
//!
//! Adapter-specific errors (HTTP clients, file systems) are converted to these
//! types by the crates that implement the capability traits.

use thiserror::Error;

use crate::push::VapidError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the notifier.
#[derive(Error, Debug)]
pub enum Error {
    /// The upstream catalog could not be fetched or parsed.
    #[error("Catalog fetch failed: {0}")]
    Catalog(String),

    /// The durable key-value store failed or returned unreadable data.
    #[error("Storage operation failed: {0}")]
    Storage(String),

    #[error("Input validation failed: {0}")]
    Validation(String),

    #[error("VAPID error: {0}")]
    Vapid(#[from] VapidError),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// Whether the error was caused by caller input rather than the system.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}
