//! Domain entities
//!
//! Core business objects that represent the fundamental concepts
//! in the file carving domain.

mod carved_file;
mod file_signature;
mod ground_truth;
mod scan_result;

pub use carved_file::{CarveEvent, CarveRecord, CarvedFile, PersistStatus, RejectReason};
pub use file_signature::{FileSignature, FileType, FooterRule, SignatureError};
pub use ground_truth::GroundTruthEntry;
pub use scan_result::{CarveReport, ScanProgress};
