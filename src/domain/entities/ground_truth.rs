//! Ground truth entity
//!
//! One row of the manifest the disk generator writes for every injected image.

use serde::{Deserialize, Serialize};

/// Where an image was injected and what its content hash is
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundTruthEntry {
    pub filename: String,
    /// Hex digest; manifests with an `md5_hash` column are read too
    #[serde(rename = "sha256_hash", alias = "md5_hash")]
    pub content_hash: String,
    #[serde(rename = "start_offset_decimal")]
    pub start_offset: u64,
    #[serde(rename = "file_size_bytes")]
    pub size: u64,
}

impl GroundTruthEntry {
    /// Exclusive end offset of the injected image
    pub fn end_offset(&self) -> u64 {
        self.start_offset + self.size
    }
}
