use async_trait::async_trait;

use crate::errors::Result;
use crate::programs::ProgramRecord;

/// Source of the current program catalog.
///
/// Implementations validate upstream data into `ProgramRecord`s and return
/// them in catalog order. Any failure aborts the detection cycle that asked.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_programs(&self) -> Result<Vec<ProgramRecord>>;
}
