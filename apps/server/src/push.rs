//! HTTP adapter that hands signed messages to browser push services.

use async_trait::async_trait;
use tracing::debug;
use ysws_notifier_core::push::{
    DeliveryError, DeliveryResult, PushMessage, PushResponse, PushTransport,
};
use ysws_notifier_core::{Error, Result};

/// Posts each message to its endpoint. Per-delivery deadlines are enforced by
/// the dispatcher, so the client itself has none.
pub struct HttpPushTransport {
    client: reqwest::Client,
}

impl HttpPushTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::Unexpected(format!("Failed to initialize HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PushTransport for HttpPushTransport {
    async fn deliver(&self, message: &PushMessage) -> DeliveryResult<PushResponse> {
        let mut request = self.client.post(&message.endpoint);
        for (name, value) in &message.headers {
            request = request.header(name, value);
        }

        let response = request
            .body(message.body.to_vec())
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        debug!("[Push] {} answered {}", message.endpoint, status);
        Ok(PushResponse::new(status))
    }
}
