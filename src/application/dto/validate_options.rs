//! Validation options DTO

use std::path::PathBuf;

/// Folder for recovered files that match the ground truth
pub const VERIFIED_DIR: &str = "verified_evidence";

/// Folder for recovered files that match nothing
pub const FALSE_POSITIVES_DIR: &str = "false_positives";

/// Options for scoring a recovery against its ground truth
#[derive(Debug, Clone)]
pub struct ValidateOptions {
    /// Directory of recovered files (not searched recursively)
    pub recovered_dir: PathBuf,
    /// Ground-truth manifest
    pub ground_truth: PathBuf,
    /// Where to save the text report
    pub report_path: Option<PathBuf>,
    /// Move each file into the verified or false-positive folder
    pub sort: bool,
}

impl ValidateOptions {
    pub fn new(recovered_dir: impl Into<PathBuf>, ground_truth: impl Into<PathBuf>) -> Self {
        Self {
            recovered_dir: recovered_dir.into(),
            ground_truth: ground_truth.into(),
            report_path: None,
            sort: false,
        }
    }

    pub fn with_report(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_path = Some(path.into());
        self
    }

    /// Sorts files into evidence folders after scoring
    pub fn sorted(mut self) -> Self {
        self.sort = true;
        self
    }
}
