//! Background scheduler for periodic program detection.
//!
//! Cycles run one after another on a fixed interval; a slow cycle delays the
//! next tick instead of overlapping with it.

use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::main_lib::AppState;

/// Initial delay before the first cycle, to let the server finish starting.
const INITIAL_DELAY_SECS: u64 = 5;

/// Starts the background detection scheduler.
pub fn start_detection_scheduler(state: Arc<AppState>) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Detection scheduler started ({}s interval)",
            state.check_interval.as_secs()
        );

        tokio::time::sleep(Duration::from_secs(INITIAL_DELAY_SECS)).await;

        let mut ticker = interval(state.check_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            run_scheduled_cycle(&state).await;
        }
    })
}

/// Runs a single detection cycle and logs its outcome.
pub async fn run_scheduled_cycle(state: &AppState) {
    debug!("Running scheduled detection cycle...");

    match state.detection_service.run_cycle().await {
        Ok(report) if report.first_run => {
            info!(
                "Initial catalog snapshot recorded: {} programs",
                report.fetched
            );
        }
        Ok(report) => match report.delivery {
            Some(delivery) => info!(
                "Detection cycle completed: {} new programs, {} delivered, {} failed, {} pruned",
                report.new_programs.len(),
                delivery.delivered,
                delivery.failed(),
                report.pruned
            ),
            None => info!(
                "Detection cycle completed: {} programs fetched, {} new",
                report.fetched,
                report.new_programs.len()
            ),
        },
        Err(e) => warn!("Detection cycle skipped: {}", e),
    }
}
