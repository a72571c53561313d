//! Data Transfer Objects

mod carve_options;
mod carve_summary;
mod generate_options;
mod validate_options;
mod validation_report;

pub use carve_options::CarveOptions;
pub use carve_summary::CarveSummary;
pub use generate_options::{
    DEFAULT_DISK_IMAGE, DEFAULT_DISK_SIZE, DEFAULT_GROUND_TRUTH, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_SOURCE_DIR, GenerateOptions, GenerationSummary,
};
pub use validate_options::{FALSE_POSITIVES_DIR, VERIFIED_DIR, ValidateOptions};
pub use validation_report::ValidationReport;
