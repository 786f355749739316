//! Detection module - the fetch, diff, dispatch and snapshot cycle.

mod detection_model;
mod detection_service;
mod detection_traits;

pub use detection_model::CycleReport;
pub use detection_service::DetectionService;
pub use detection_traits::DetectionServiceTrait;
