//! Disk image source trait
//!
//! Defines read-only access to the raw byte stream being carved.
//! The carving engine only ever sees the bytes through a shared slice.

use std::io;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when opening a disk image
///
/// Any of these at session start is fatal: the input is missing or unreadable.
#[derive(Error, Debug)]
pub enum DiskImageError {
    #[error("Disk image not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    #[error("Failed to memory-map {path}: {source}")]
    MapFailed {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl DiskImageError {
    /// Maps an open/read error for `path` onto the matching variant
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => DiskImageError::NotFound(path.display().to_string()),
            io::ErrorKind::PermissionDenied => {
                DiskImageError::PermissionDenied(path.display().to_string())
            }
            _ => DiskImageError::IoError(err),
        }
    }
}

/// An immutable, randomly addressable byte sequence
///
/// # Example
///
/// ```ignore
/// let image = MmapDiskImage::open(Path::new("disk.img"))?;
/// let header = image.slice_at(0, 2);
/// ```
pub trait DiskImageSource: Send + Sync {
    /// Opens the image for reading
    fn open(path: &Path) -> Result<Self, DiskImageError>
    where
        Self: Sized;

    /// Returns the whole image
    fn as_bytes(&self) -> &[u8];

    /// Returns where the image came from
    fn path(&self) -> &Path;

    /// Returns the total size in bytes
    fn size(&self) -> u64 {
        self.as_bytes().len() as u64
    }

    /// Returns `length` bytes at `offset`, or `None` past the end
    fn slice_at(&self, offset: u64, length: usize) -> Option<&[u8]> {
        let start = usize::try_from(offset).ok()?;
        let end = start.checked_add(length)?;
        self.as_bytes().get(start..end)
    }
}
