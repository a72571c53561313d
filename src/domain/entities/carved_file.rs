//! Carved file entity
//!
//! A byte range of the disk image that passed footer and size validation.

use super::file_signature::FileType;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::path::PathBuf;
use thiserror::Error;

/// An extracted `[start_offset, end_offset)` range of the disk image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarvedFile {
    file_type: FileType,
    start_offset: u64,
    end_offset: u64,
}

impl CarvedFile {
    /// Creates a new carved file record
    pub fn new(file_type: FileType, start_offset: u64, end_offset: u64) -> Self {
        debug_assert!(start_offset < end_offset);
        Self {
            file_type,
            start_offset,
            end_offset,
        }
    }

    /// Returns the file type
    pub fn file_type(&self) -> FileType {
        self.file_type
    }

    /// Returns the offset of the first byte
    pub fn start_offset(&self) -> u64 {
        self.start_offset
    }

    /// Returns the offset one past the last byte
    pub fn end_offset(&self) -> u64 {
        self.end_offset
    }

    /// Returns the size in bytes
    pub fn size(&self) -> u64 {
        self.end_offset - self.start_offset
    }

    /// Returns the range as slice indices
    pub fn range(&self) -> Range<usize> {
        self.start_offset as usize..self.end_offset as usize
    }

    /// `recovered_<start_offset>.<ext>`; unique because ranges never overlap
    pub fn file_name(&self) -> String {
        format!(
            "recovered_{}.{}",
            self.start_offset,
            self.file_type.extension()
        )
    }

    /// Checks whether this range intersects `other`
    pub fn overlaps(&self, other: &CarvedFile) -> bool {
        self.start_offset < other.end_offset && other.start_offset < self.end_offset
    }
}

/// Whether an extracted file made it to the output sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PersistStatus {
    /// Written to `path`
    Persisted { path: PathBuf },
    /// The sink reported an I/O failure; the range is still consumed
    Failed { error: String },
}

impl PersistStatus {
    pub fn is_persisted(&self) -> bool {
        matches!(self, PersistStatus::Persisted { .. })
    }
}

/// A carved file paired with the outcome of persisting it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarveRecord {
    #[serde(flatten)]
    pub file: CarvedFile,
    /// Name derived from the range, kept even when the write failed
    pub file_name: String,
    #[serde(flatten)]
    pub persist: PersistStatus,
}

impl CarveRecord {
    pub fn new(file: CarvedFile, persist: PersistStatus) -> Self {
        Self {
            file_name: file.file_name(),
            file,
            persist,
        }
    }
}

/// Why a candidate was discarded
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    #[error("no footer found")]
    NoFooterFound,

    #[error("candidate of {size} bytes exceeds the size bound")]
    OversizedCandidate { size: u64 },
}

/// Outcome of resolving one candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CarveEvent {
    /// Header and footer matched within bounds
    Extracted(CarvedFile),
    /// The candidate at `start_offset` was discarded
    Rejected {
        file_type: FileType,
        start_offset: u64,
        reason: RejectReason,
    },
}
