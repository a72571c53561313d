//! Small helpers shared across layers

use sha2::{Digest, Sha256};

const KB: u64 = 1024;
const MB: u64 = KB * 1024;
const GB: u64 = MB * 1024;

/// Formats a byte count for humans (`1.50 MB`)
pub fn format_bytes(bytes: u64) -> String {
    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

/// Lowercase hex SHA-256 of `data`, the content hash used in manifests
pub fn content_hash(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Digest behind a manifest hash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HashAlgorithm {
    Sha256,
    Md5,
}

impl HashAlgorithm {
    /// Infers the digest from the length of a hex hash; 32 digits is MD5
    pub fn of_hex(hash: &str) -> Self {
        if hash.len() == 32 {
            HashAlgorithm::Md5
        } else {
            HashAlgorithm::Sha256
        }
    }

    /// Lowercase hex digest of `data`
    pub fn hex_digest(self, data: &[u8]) -> String {
        match self {
            HashAlgorithm::Sha256 => content_hash(data),
            HashAlgorithm::Md5 => format!("{:x}", md5::compute(data)),
        }
    }
}
