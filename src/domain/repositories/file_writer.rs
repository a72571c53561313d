//! Carved file writer trait
//!
//! Defines the output sink that persists extracted byte ranges.

use crate::domain::entities::CarvedFile;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when writing carved files
#[derive(Error, Debug)]
pub enum FileWriterError {
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("File already exists: {0}")]
    FileExists(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result of writing a single file
#[derive(Debug, Clone)]
pub struct WriteResult {
    /// Path where the file was saved
    pub saved_path: PathBuf,
    /// Size in bytes of the saved file
    pub saved_size: u64,
}

/// Trait for persisting carved files
///
/// A failed write is reported to the caller and never retried; the carving
/// session records it and moves on.
///
/// # Example
///
/// ```ignore
/// let writer = LocalFileWriter::new(Path::new("recovered"))?;
/// let result = writer.write(&carved, &image[carved.range()])?;
/// println!("Saved to: {}", result.saved_path.display());
/// ```
pub trait CarvedFileWriter: Send + Sync {
    /// Writes the exact bytes of `file`
    fn write(&self, file: &CarvedFile, bytes: &[u8]) -> Result<WriteResult, FileWriterError>;

    /// Returns the output directory
    fn output_dir(&self) -> &Path;

    /// Returns the number of files written so far
    fn files_written(&self) -> usize;

    /// Returns the total bytes written so far
    fn bytes_written(&self) -> u64;
}
