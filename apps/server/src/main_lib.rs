use std::sync::Arc;
use std::time::Duration;

use crate::{
    catalog::HttpCatalogSource,
    config::{Config, LogFormat},
    push::HttpPushTransport,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use ysws_notifier_core::{
    detection::{DetectionService, DetectionServiceTrait},
    kv::KeyValueStore,
    programs::CatalogSource,
    push::{DispatchConfig, NotificationDispatcher, PushTransport, VapidKeys, VapidSigner},
    subscriptions::{
        SubscriptionService, SubscriptionServiceTrait, SubscriptionStore, SubscriptionStoreTrait,
    },
};
use ysws_notifier_storage_file::FileKeyValueStore;

pub struct AppState {
    pub subscription_service: Arc<dyn SubscriptionServiceTrait>,
    pub subscription_store: Arc<dyn SubscriptionStoreTrait>,
    pub detection_service: Arc<dyn DetectionServiceTrait>,
    pub check_interval: Duration,
}

pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init(),
    }
}

/// Builds the application state with the HTTP catalog and push adapters.
pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let catalog: Arc<dyn CatalogSource> = Arc::new(HttpCatalogSource::new(
        config.catalog_url.clone(),
        config.request_timeout,
    )?);
    let transport: Arc<dyn PushTransport> = Arc::new(HttpPushTransport::new()?);
    build_state_with(config, catalog, transport).await
}

/// Builds the application state around the given catalog and push transport.
pub async fn build_state_with(
    config: &Config,
    catalog: Arc<dyn CatalogSource>,
    transport: Arc<dyn PushTransport>,
) -> anyhow::Result<Arc<AppState>> {
    let kv: Arc<dyn KeyValueStore> = Arc::new(FileKeyValueStore::open(&config.data_path).await?);
    tracing::info!("Store path in use: {}", config.data_path.display());

    let keys = VapidKeys::from_base64(&config.vapid_public_key, &config.vapid_private_key)?;
    let signer = Arc::new(VapidSigner::new(keys, config.vapid_subject.clone())?);

    let subscription_store: Arc<dyn SubscriptionStoreTrait> =
        Arc::new(SubscriptionStore::new(kv));
    let subscription_service: Arc<dyn SubscriptionServiceTrait> =
        Arc::new(SubscriptionService::new(subscription_store.clone()));

    let dispatcher = Arc::new(NotificationDispatcher::new(
        transport,
        signer,
        DispatchConfig {
            max_concurrency: config.push_concurrency,
            delivery_timeout: config.push_timeout,
            notification_url: config.notification_url.clone(),
            ..Default::default()
        },
    ));

    let detection_service: Arc<dyn DetectionServiceTrait> = Arc::new(
        DetectionService::new(catalog, subscription_store.clone(), dispatcher)
            .with_pruning(config.prune_gone_subscriptions),
    );

    Ok(Arc::new(AppState {
        subscription_service,
        subscription_store,
        detection_service,
        check_interval: config.check_interval,
    }))
}
