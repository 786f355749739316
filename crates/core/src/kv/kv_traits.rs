use async_trait::async_trait;

use crate::errors::Result;

/// Durable, process-external key-value storage.
///
/// Values are whole documents: `put` always overwrites, there are no partial
/// updates. Implementations map their own failures to `Error::Storage`.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if it was never written.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn put(&self, key: &str, value: String) -> Result<()>;
}
