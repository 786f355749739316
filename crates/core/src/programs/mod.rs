//! Programs module - catalog records, the catalog capability and change detection.

mod change_detector;
mod programs_model;
mod programs_traits;

pub use change_detector::detect_new_programs;
pub use programs_model::{parse_catalog, ProgramRecord};
pub use programs_traits::CatalogSource;
