//! Carve options DTO

use crate::domain::entities::FileType;
use crate::domain::services::DEFAULT_MAX_FILE_SIZE;
use std::path::PathBuf;

/// Options for carving one disk image
#[derive(Debug, Clone)]
pub struct CarveOptions {
    /// Path to the disk image
    pub input: PathBuf,
    /// Directory receiving `recovered_<offset>.<ext>` files
    pub output_dir: PathBuf,
    /// Largest candidate that will be extracted
    pub max_file_size: u64,
    /// File types to carve (empty = all)
    pub file_types: Vec<FileType>,
    /// Require a well-formed IEND chunk before accepting a PNG footer
    pub strict_png: bool,
    /// Optional JSON dump of every extraction record
    pub records_path: Option<PathBuf>,
}

impl Default for CarveOptions {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output_dir: PathBuf::from("recovered_files"),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            file_types: Vec::new(),
            strict_png: false,
            records_path: None,
        }
    }
}

impl CarveOptions {
    /// Creates options carving `input` into `output_dir`
    pub fn new(input: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_dir: output_dir.into(),
            ..Default::default()
        }
    }

    /// Sets the file types to carve
    pub fn with_types(mut self, types: Vec<FileType>) -> Self {
        self.file_types = types;
        self
    }

    /// Sets the size bound in bytes
    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    pub fn with_strict_png(mut self, strict: bool) -> Self {
        self.strict_png = strict;
        self
    }

    /// Writes the extraction records as JSON to `path` after the run
    pub fn with_records(mut self, path: impl Into<PathBuf>) -> Self {
        self.records_path = Some(path.into());
        self
    }
}
