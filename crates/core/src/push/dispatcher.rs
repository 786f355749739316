use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};

use crate::constants::{
    DEFAULT_NOTIFICATION_URL, DEFAULT_PUSH_CONCURRENCY, DEFAULT_PUSH_TIMEOUT_MS,
    NOTIFICATION_TITLE, PUSH_TTL_SECS,
};
use crate::errors::Result;
use crate::programs::ProgramRecord;
use crate::push::{
    DeliveryError, DeliveryFailure, DeliveryReport, DeliveryResult, NotificationPayload,
    PushMessage, PushTransport, VapidSigner,
};
use crate::subscriptions::PushSubscription;

/// Tuning for one fan-out.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Deliveries in flight at once.
    pub max_concurrency: usize,
    /// Upper bound on a single delivery, including the transport round trip.
    pub delivery_timeout: Duration,
    pub ttl_secs: u32,
    pub title: String,
    pub notification_url: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_PUSH_CONCURRENCY,
            delivery_timeout: Duration::from_millis(DEFAULT_PUSH_TIMEOUT_MS),
            ttl_secs: PUSH_TTL_SECS,
            title: NOTIFICATION_TITLE.to_string(),
            notification_url: DEFAULT_NOTIFICATION_URL.to_string(),
        }
    }
}

/// Sends one notification per subscription, isolating per-subscriber failures.
///
/// Each delivery is signed for its own endpoint origin, so subscribers on
/// different push services can share a cycle. Nothing is retried; failures
/// are collected into the returned [`DeliveryReport`].
pub struct NotificationDispatcher {
    transport: Arc<dyn PushTransport>,
    signer: Arc<VapidSigner>,
    config: DispatchConfig,
}

impl NotificationDispatcher {
    pub fn new(
        transport: Arc<dyn PushTransport>,
        signer: Arc<VapidSigner>,
        config: DispatchConfig,
    ) -> Self {
        Self {
            transport,
            signer,
            config,
        }
    }

    /// Delivers a notification about `new_programs` to every subscription.
    ///
    /// Returns once every delivery has either succeeded or failed. Only a
    /// failure to build the payload is returned as `Err`.
    pub async fn dispatch(
        &self,
        new_programs: &[ProgramRecord],
        subscriptions: &[PushSubscription],
    ) -> Result<DeliveryReport> {
        if new_programs.is_empty() || subscriptions.is_empty() {
            return Ok(DeliveryReport::default());
        }

        let payload = NotificationPayload::for_new_programs(
            &self.config.title,
            new_programs,
            &self.config.notification_url,
        );
        let body: Arc<[u8]> = payload.to_bytes()?.into();

        // Owned endpoints keep the fan-out future `Send` for callers behind `async_trait`.
        let endpoints: Vec<(usize, String)> = subscriptions
            .iter()
            .map(|s| s.endpoint.clone())
            .enumerate()
            .collect();

        let mut outcomes: Vec<(usize, String, DeliveryResult<()>)> = stream::iter(endpoints)
            .map(|(index, endpoint)| {
                let body = body.clone();
                async move {
                    let outcome = self.deliver_one(&endpoint, body).await;
                    (index, endpoint, outcome)
                }
            })
            .buffer_unordered(self.config.max_concurrency.max(1))
            .collect()
            .await;
        outcomes.sort_by_key(|(index, _, _)| *index);

        let mut report = DeliveryReport {
            attempted: outcomes.len(),
            ..Default::default()
        };
        for (_, endpoint, outcome) in outcomes {
            match outcome {
                Ok(()) => report.delivered += 1,
                Err(error) => {
                    log::warn!("Push delivery to {} failed: {}", endpoint, error);
                    report.failures.push(DeliveryFailure { endpoint, error });
                }
            }
        }

        log::info!(
            "Push fan-out finished: {} delivered, {} failed",
            report.delivered,
            report.failed()
        );
        Ok(report)
    }

    async fn deliver_one(&self, endpoint: &str, body: Arc<[u8]>) -> DeliveryResult<()> {
        let mut headers = self.signer.sign_for_endpoint(endpoint)?;
        headers.insert(
            "Content-Type".to_string(),
            "application/octet-stream".to_string(),
        );
        headers.insert("TTL".to_string(), self.config.ttl_secs.to_string());

        let message = PushMessage {
            endpoint: endpoint.to_string(),
            headers,
            body,
        };

        let timeout = self.config.delivery_timeout;
        let response = tokio::time::timeout(timeout, self.transport.deliver(&message))
            .await
            .map_err(|_| DeliveryError::TimedOut(timeout))??;

        if response.is_success() {
            Ok(())
        } else {
            Err(DeliveryError::Rejected {
                status: response.status,
            })
        }
    }
}
