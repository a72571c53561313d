pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
pub mod utils;

pub use domain::entities::{CarveReport, CarvedFile, FileSignature, FileType, ScanProgress};
pub use domain::services::{CarveEngine, CarveSession, DEFAULT_MAX_FILE_SIZE, SignatureRegistry};
