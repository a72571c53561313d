//! Ground-truth manifest persistence
//!
//! CSV with the header
//! `filename,sha256_hash,start_offset_decimal,file_size_bytes`. Manifests
//! naming the hash column `md5_hash` are accepted on read.

use crate::domain::entities::GroundTruthEntry;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur reading or writing the manifest
#[derive(Error, Debug)]
pub enum GroundTruthError {
    #[error("Ground truth not found: {0}")]
    NotFound(String),

    #[error("Malformed ground truth {path}: {source}")]
    Malformed {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Writes `entries` to `path`, replacing any existing file
pub fn write_ground_truth(path: &Path, entries: &[GroundTruthEntry]) -> Result<(), GroundTruthError> {
    let malformed = |source| GroundTruthError::Malformed {
        path: path.display().to_string(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(malformed)?;
    for entry in entries {
        writer.serialize(entry).map_err(malformed)?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads every entry from `path`
///
/// Surrounding whitespace in fields is ignored.
pub fn read_ground_truth(path: &Path) -> Result<Vec<GroundTruthEntry>, GroundTruthError> {
    if !path.exists() {
        return Err(GroundTruthError::NotFound(path.display().to_string()));
    }

    let malformed = |source| GroundTruthError::Malformed {
        path: path.display().to_string(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(malformed)?;

    reader
        .deserialize()
        .collect::<Result<Vec<GroundTruthEntry>, _>>()
        .map_err(malformed)
}
