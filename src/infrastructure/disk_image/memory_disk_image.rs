//! In-memory disk image
//!
//! An owned buffer frozen into a read-only image. Produced by
//! [`DiskImageBuilder`](super::DiskImageBuilder) and handy in tests.

use crate::domain::repositories::{DiskImageError, DiskImageSource};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Immutable disk image held in memory
#[derive(Debug, Clone)]
pub struct MemoryDiskImage {
    data: Box<[u8]>,
    path: PathBuf,
}

impl MemoryDiskImage {
    /// Freezes `data`; `path` only labels where the image came from
    pub fn from_bytes(path: impl Into<PathBuf>, data: Vec<u8>) -> Self {
        Self {
            data: data.into_boxed_slice(),
            path: path.into(),
        }
    }

    /// Writes the image to `path`
    pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(&self.data)?;
        file.sync_all()
    }
}

impl DiskImageSource for MemoryDiskImage {
    fn open(path: &Path) -> Result<Self, DiskImageError> {
        let data = fs::read(path).map_err(|e| DiskImageError::from_io(path, e))?;
        Ok(Self::from_bytes(path, data))
    }

    fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    fn path(&self) -> &Path {
        &self.path
    }
}
