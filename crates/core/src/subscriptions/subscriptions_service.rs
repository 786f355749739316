use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::{Error, Result};
use crate::subscriptions::{PushSubscription, SubscriptionServiceTrait, SubscriptionStoreTrait};

/// Validates control API requests before they reach the store.
pub struct SubscriptionService {
    store: Arc<dyn SubscriptionStoreTrait>,
}

impl SubscriptionService {
    pub fn new(store: Arc<dyn SubscriptionStoreTrait>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl SubscriptionServiceTrait for SubscriptionService {
    async fn register(&self, subscription: PushSubscription) -> Result<bool> {
        subscription.validate()?;
        let added = self.store.add_subscription(subscription).await?;
        if added {
            log::info!("Registered new push subscription");
        } else {
            log::debug!("Push subscription already registered");
        }
        Ok(added)
    }

    /// Removes `endpoint` if present. Any non-blank endpoint is accepted so
    /// stale or malformed entries can still be dropped.
    async fn unregister(&self, endpoint: &str) -> Result<bool> {
        if endpoint.trim().is_empty() {
            return Err(Error::Validation(
                "Subscription endpoint is required".to_string(),
            ));
        }
        let removed = self.store.remove_subscription(endpoint).await?;
        if removed {
            log::info!("Removed push subscription");
        }
        Ok(removed)
    }

    async fn list(&self) -> Result<Vec<PushSubscription>> {
        self.store.load_subscriptions().await
    }
}
