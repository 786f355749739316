use std::sync::Arc;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::Mutex;

use crate::constants::{SNAPSHOT_KEY, SUBSCRIPTIONS_KEY};
use crate::errors::{Error, Result};
use crate::kv::KeyValueStore;
use crate::programs::ProgramRecord;
use crate::subscriptions::{PushSubscription, SubscriptionStoreTrait};

/// `SubscriptionStoreTrait` over any `KeyValueStore`, storing JSON arrays.
///
/// Adds and removes are read-modify-write on one value, so they are
/// serialized through `write_lock` for as long as the list is held.
pub struct SubscriptionStore {
    kv: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
}

impl SubscriptionStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            write_lock: Mutex::new(()),
        }
    }

    async fn read_list<T: DeserializeOwned>(&self, key: &str) -> Result<Option<Vec<T>>> {
        let Some(raw) = self.kv.get(key).await? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| Error::Storage(format!("Stored value under '{key}' is unreadable: {e}")))
    }

    async fn write_list<T: Serialize>(&self, key: &str, items: &[T]) -> Result<()> {
        let raw = serde_json::to_string(items)?;
        self.kv.put(key, raw).await
    }
}

#[async_trait]
impl SubscriptionStoreTrait for SubscriptionStore {
    async fn load_subscriptions(&self) -> Result<Vec<PushSubscription>> {
        Ok(self.read_list(SUBSCRIPTIONS_KEY).await?.unwrap_or_default())
    }

    async fn add_subscription(&self, subscription: PushSubscription) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut subscriptions = self.load_subscriptions().await?;
        if subscriptions
            .iter()
            .any(|s| s.endpoint == subscription.endpoint)
        {
            return Ok(false);
        }

        subscriptions.push(subscription);
        self.write_list(SUBSCRIPTIONS_KEY, &subscriptions).await?;
        Ok(true)
    }

    async fn remove_subscription(&self, endpoint: &str) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut subscriptions = self.load_subscriptions().await?;
        let before = subscriptions.len();
        subscriptions.retain(|s| s.endpoint != endpoint);
        let removed = subscriptions.len() != before;

        self.write_list(SUBSCRIPTIONS_KEY, &subscriptions).await?;
        Ok(removed)
    }

    async fn load_snapshot_if_present(&self) -> Result<Option<Vec<ProgramRecord>>> {
        self.read_list(SNAPSHOT_KEY).await
    }

    async fn save_snapshot(&self, records: &[ProgramRecord]) -> Result<()> {
        self.write_list(SNAPSHOT_KEY, records).await
    }
}
