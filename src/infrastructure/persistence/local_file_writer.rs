//! Local file writer implementation
//!
//! Writes carved files into a flat output directory as
//! `recovered_<start_offset>.<ext>`.

use crate::domain::entities::CarvedFile;
use crate::domain::repositories::{CarvedFileWriter, FileWriterError, WriteResult};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Local file system writer
pub struct LocalFileWriter {
    output_dir: PathBuf,
    overwrite: bool,
    files_written: AtomicUsize,
    bytes_written: AtomicU64,
}

impl LocalFileWriter {
    /// Creates a writer, creating `output_dir` if needed
    pub fn new(output_dir: &Path) -> Result<Self, FileWriterError> {
        if !output_dir.exists() {
            fs::create_dir_all(output_dir).map_err(|e| {
                if e.kind() == std::io::ErrorKind::PermissionDenied {
                    FileWriterError::PermissionDenied(output_dir.display().to_string())
                } else {
                    FileWriterError::IoError(e)
                }
            })?;
        }

        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            overwrite: true,
            files_written: AtomicUsize::new(0),
            bytes_written: AtomicU64::new(0),
        })
    }

    /// Refuses to replace files already present in the output directory
    pub fn without_overwrite(mut self) -> Self {
        self.overwrite = false;
        self
    }

    /// Generates the output path for a file
    pub fn output_path(&self, file: &CarvedFile) -> PathBuf {
        self.output_dir.join(file.file_name())
    }
}

impl CarvedFileWriter for LocalFileWriter {
    fn write(&self, file: &CarvedFile, bytes: &[u8]) -> Result<WriteResult, FileWriterError> {
        if !self.output_dir.is_dir() {
            return Err(FileWriterError::DirectoryNotFound(
                self.output_dir.display().to_string(),
            ));
        }

        let output_path = self.output_path(file);

        if !self.overwrite && output_path.exists() {
            return Err(FileWriterError::FileExists(
                output_path.display().to_string(),
            ));
        }

        let mut output_file = File::create(&output_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::PermissionDenied {
                FileWriterError::PermissionDenied(output_path.display().to_string())
            } else {
                FileWriterError::IoError(e)
            }
        })?;
        output_file.write_all(bytes)?;
        output_file.sync_all()?;

        let saved_size = bytes.len() as u64;

        self.files_written.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(saved_size, Ordering::Relaxed);

        Ok(WriteResult {
            saved_path: output_path,
            saved_size,
        })
    }

    fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn files_written(&self) -> usize {
        self.files_written.load(Ordering::Relaxed)
    }

    fn bytes_written(&self) -> u64 {
        self.bytes_written.load(Ordering::Relaxed)
    }
}
