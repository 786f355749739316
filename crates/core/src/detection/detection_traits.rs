use async_trait::async_trait;

use crate::detection::CycleReport;
use crate::errors::Result;

/// Trait for running detection cycles.
#[async_trait]
pub trait DetectionServiceTrait: Send + Sync {
    /// Runs one full cycle. An `Err` means the cycle was skipped before the
    /// snapshot could be written (catalog or store unavailable).
    async fn run_cycle(&self) -> Result<CycleReport>;
}
