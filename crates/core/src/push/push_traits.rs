use async_trait::async_trait;

use crate::push::{DeliveryResult, PushMessage, PushResponse};

/// Delivers one push message to its endpoint.
///
/// Implementations return the push service's HTTP status as a `PushResponse`
/// and reserve `Err` for failures where no response was received. Status
/// interpretation is left to the dispatcher.
#[async_trait]
pub trait PushTransport: Send + Sync {
    async fn deliver(&self, message: &PushMessage) -> DeliveryResult<PushResponse>;
}
