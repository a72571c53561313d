//! Memory-mapped disk image implementation
//!
//! Maps the image file read-only for the lifetime of the value, so the
//! carving engine can address every byte without copying.

use crate::domain::repositories::{DiskImageError, DiskImageSource};
use memmap2::Mmap;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// Read-only memory-mapped disk image
///
/// Zero-length files are valid input and are represented without a mapping,
/// since an empty mapping cannot be created.
///
/// # Example
///
/// ```ignore
/// let image = MmapDiskImage::open(Path::new("test_disk.img"))?;
/// let data = image.slice_at(0, 512);
/// ```
pub struct MmapDiskImage {
    mmap: Option<Mmap>,
    path: PathBuf,
}

impl MmapDiskImage {
    /// Returns a slice of the memory-mapped data
    ///
    /// This is a zero-copy operation and very fast.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        self.mmap.as_deref().unwrap_or(&[])
    }
}

impl DiskImageSource for MmapDiskImage {
    fn open(path: &Path) -> Result<Self, DiskImageError> {
        if !path.exists() {
            return Err(DiskImageError::NotFound(path.display().to_string()));
        }

        let file = OpenOptions::new()
            .read(true)
            .open(path)
            .map_err(|e| DiskImageError::from_io(path, e))?;

        let size = file.metadata().map_err(DiskImageError::IoError)?.len();

        let mmap = if size == 0 {
            None
        } else {
            // The file is opened read-only and the mapping is never handed out mutably.
            let mmap = unsafe { Mmap::map(&file) }.map_err(|source| DiskImageError::MapFailed {
                path: path.display().to_string(),
                source,
            })?;
            Some(mmap)
        };

        tracing::debug!("Mapped {} ({} bytes)", path.display(), size);

        Ok(Self {
            mmap,
            path: path.to_path_buf(),
        })
    }

    fn as_bytes(&self) -> &[u8] {
        self.as_slice()
    }

    fn path(&self) -> &Path {
        &self.path
    }
}
