use std::sync::Arc;

use async_trait::async_trait;

use crate::detection::{CycleReport, DetectionServiceTrait};
use crate::errors::Result;
use crate::programs::{detect_new_programs, CatalogSource, ProgramRecord};
use crate::push::NotificationDispatcher;
use crate::subscriptions::SubscriptionStoreTrait;

/// Runs detection cycles: fetch the catalog, diff it against the stored
/// snapshot, notify subscribers about new programs, then advance the snapshot.
///
/// The snapshot is written at the end of every completed cycle, after all
/// deliveries have finished, whether or not anything was new or delivered.
/// When no snapshot exists yet the cycle only records the catalog, so the
/// first deployment does not announce every existing program.
pub struct DetectionService {
    catalog: Arc<dyn CatalogSource>,
    store: Arc<dyn SubscriptionStoreTrait>,
    dispatcher: Arc<NotificationDispatcher>,
    prune_gone_subscriptions: bool,
}

impl DetectionService {
    pub fn new(
        catalog: Arc<dyn CatalogSource>,
        store: Arc<dyn SubscriptionStoreTrait>,
        dispatcher: Arc<NotificationDispatcher>,
    ) -> Self {
        Self {
            catalog,
            store,
            dispatcher,
            prune_gone_subscriptions: false,
        }
    }

    /// Remove subscriptions whose push service answers 404/410.
    pub fn with_pruning(mut self, enabled: bool) -> Self {
        self.prune_gone_subscriptions = enabled;
        self
    }

    /// Processes an already fetched catalog against an explicit previous
    /// snapshot (`None` when no cycle has completed before).
    pub async fn process_catalog(
        &self,
        current: Vec<ProgramRecord>,
        previous: Option<Vec<ProgramRecord>>,
    ) -> Result<CycleReport> {
        let first_run = previous.is_none();
        let previous = previous.unwrap_or_default();
        let new_programs = detect_new_programs(&current, &previous);

        let mut report = CycleReport {
            fetched: current.len(),
            first_run,
            ..Default::default()
        };

        if first_run {
            log::info!(
                "No previous snapshot; recording {} programs without notifying",
                current.len()
            );
        } else if new_programs.is_empty() {
            log::debug!("No new programs among {} fetched", current.len());
        } else {
            log::info!("Detected {} new programs", new_programs.len());
            let subscriptions = self.store.load_subscriptions().await?;
            let delivery = self
                .dispatcher
                .dispatch(&new_programs, &subscriptions)
                .await?;
            report.delivery = Some(delivery);
        }

        self.store.save_snapshot(&current).await?;

        if self.prune_gone_subscriptions {
            if let Some(delivery) = &report.delivery {
                for endpoint in delivery.gone_endpoints() {
                    match self.store.remove_subscription(endpoint).await {
                        Ok(true) => report.pruned += 1,
                        Ok(false) => {}
                        Err(e) => log::warn!("Failed to prune subscription {}: {}", endpoint, e),
                    }
                }
                if report.pruned > 0 {
                    log::info!("Pruned {} expired subscriptions", report.pruned);
                }
            }
        }

        report.new_programs = new_programs;
        Ok(report)
    }
}

#[async_trait]
impl DetectionServiceTrait for DetectionService {
    async fn run_cycle(&self) -> Result<CycleReport> {
        let current = self.catalog.fetch_programs().await?;
        let previous = self.store.load_snapshot_if_present().await?;
        self.process_catalog(current, previous).await
    }
}
