use async_trait::async_trait;

use crate::errors::Result;
use crate::programs::ProgramRecord;
use crate::subscriptions::PushSubscription;

/// Access layer over the durable store for subscriptions and the catalog snapshot.
///
/// Every operation is a whole-value read or read-modify-write against the
/// underlying key-value store.
#[async_trait]
pub trait SubscriptionStoreTrait: Send + Sync {
    /// Returns all stored subscriptions, or an empty list if none were ever saved.
    async fn load_subscriptions(&self) -> Result<Vec<PushSubscription>>;

    /// Appends `subscription` unless its endpoint is already stored.
    ///
    /// Returns `true` if the stored list changed.
    async fn add_subscription(&self, subscription: PushSubscription) -> Result<bool>;

    /// Removes every subscription with this endpoint.
    ///
    /// Returns `true` if anything was removed; an unknown endpoint is not an error.
    async fn remove_subscription(&self, endpoint: &str) -> Result<bool>;

    /// Returns the last snapshot, or `None` if no cycle has completed yet.
    async fn load_snapshot_if_present(&self) -> Result<Option<Vec<ProgramRecord>>>;

    /// Returns the last snapshot, or an empty list if none exists.
    async fn load_snapshot(&self) -> Result<Vec<ProgramRecord>> {
        Ok(self.load_snapshot_if_present().await?.unwrap_or_default())
    }

    async fn save_snapshot(&self, records: &[ProgramRecord]) -> Result<()>;
}

/// Registration state machine behind the public control API.
#[async_trait]
pub trait SubscriptionServiceTrait: Send + Sync {
    /// Registers a subscription. Repeating a registration is a no-op.
    async fn register(&self, subscription: PushSubscription) -> Result<bool>;

    /// Unregisters by endpoint. Unregistering an unknown endpoint is a no-op.
    async fn unregister(&self, endpoint: &str) -> Result<bool>;

    async fn list(&self) -> Result<Vec<PushSubscription>>;
}
