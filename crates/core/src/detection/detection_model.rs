use crate::programs::ProgramRecord;
use crate::push::DeliveryReport;

/// Summary of one completed detection cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Number of records the catalog returned.
    pub fetched: usize,
    pub new_programs: Vec<ProgramRecord>,
    /// No snapshot existed before this cycle, so dispatch was skipped.
    pub first_run: bool,
    /// `None` when nothing was dispatched.
    pub delivery: Option<DeliveryReport>,
    /// Subscriptions removed because their push service reported them gone.
    pub pruned: usize,
}
