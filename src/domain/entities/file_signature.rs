//! File signature entity
//!
//! Represents the magic bytes that open a file of a given format and the
//! rule used to locate where that file ends. This is the foundation of
//! signature-based carving.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Types of files that can be carved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FileType {
    /// JPEG image format
    #[serde(rename = "JPG")]
    Jpeg,
    /// PNG image format
    #[serde(rename = "PNG")]
    Png,
}

impl FileType {
    /// Returns the format tag used in logs and reports
    pub fn tag(&self) -> &'static str {
        match self {
            FileType::Jpeg => "JPG",
            FileType::Png => "PNG",
        }
    }

    /// Returns the file extension, the lowercase format tag
    pub fn extension(&self) -> &'static str {
        match self {
            FileType::Jpeg => "jpg",
            FileType::Png => "png",
        }
    }

    /// Returns a human-readable name for this file type
    pub fn name(&self) -> &'static str {
        match self {
            FileType::Jpeg => "JPEG Image",
            FileType::Png => "PNG Image",
        }
    }

    /// Parses a user-supplied type name (`jpg`, `jpeg`, `png`)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(FileType::Jpeg),
            "png" => Some(FileType::Png),
            _ => None,
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// How the end of a file is located once its header has been found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FooterRule {
    /// The file ends right after a literal end marker (JPEG `FF D9`)
    EndMarker(Vec<u8>),
    /// The file ends `trailer_len` bytes after a literal marker
    /// (PNG `IEND` followed by its CRC).
    ///
    /// With `strict` set, an occurrence only counts when it is preceded by a
    /// zero chunk length and followed by the CRC-32 of the marker.
    MarkerWithTrailer {
        marker: Vec<u8>,
        trailer_len: usize,
        strict: bool,
    },
}

impl FooterRule {
    /// The literal byte sequence searched for
    pub fn marker(&self) -> &[u8] {
        match self {
            FooterRule::EndMarker(marker) => marker,
            FooterRule::MarkerWithTrailer { marker, .. } => marker,
        }
    }

    /// Number of bytes the footer spans starting at the marker position
    pub fn span(&self) -> usize {
        match self {
            FooterRule::EndMarker(marker) => marker.len(),
            FooterRule::MarkerWithTrailer {
                marker,
                trailer_len,
                ..
            } => marker.len() + trailer_len,
        }
    }

    /// Exclusive end offset of a file whose footer marker sits at `marker_pos`
    pub fn candidate_end(&self, marker_pos: usize) -> usize {
        marker_pos + self.span()
    }

    /// Checks whether the marker occurrence at `marker_pos` closes a file.
    ///
    /// The whole footer span must lie inside `data`.
    pub fn accepts(&self, data: &[u8], marker_pos: usize) -> bool {
        let end = self.candidate_end(marker_pos);
        if end > data.len() {
            return false;
        }

        match self {
            FooterRule::EndMarker(_) => true,
            FooterRule::MarkerWithTrailer { strict: false, .. } => true,
            FooterRule::MarkerWithTrailer {
                marker,
                strict: true,
                ..
            } => {
                if marker_pos < CHUNK_LENGTH_SIZE {
                    return false;
                }
                let length = &data[marker_pos - CHUNK_LENGTH_SIZE..marker_pos];
                let trailer = &data[marker_pos + marker.len()..end];
                length.iter().all(|&b| b == 0)
                    && trailer == crc32fast::hash(marker).to_be_bytes().as_slice()
            }
        }
    }

    /// Returns a copy of this rule with chunk validation switched on or off
    pub fn with_strict(self, strict: bool) -> Self {
        match self {
            FooterRule::MarkerWithTrailer {
                marker,
                trailer_len,
                ..
            } => FooterRule::MarkerWithTrailer {
                marker,
                trailer_len,
                strict,
            },
            rule => rule,
        }
    }
}

const CHUNK_LENGTH_SIZE: usize = 4;

/// A signature entry the carving engine cannot work with
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    #[error("{0} signature has an empty header")]
    EmptyHeader(FileType),

    #[error("{0} signature has an empty footer marker")]
    EmptyFooter(FileType),
}

/// A file signature: start marker plus footer rule
#[derive(Debug, Clone)]
pub struct FileSignature {
    /// The type of file this signature identifies
    file_type: FileType,
    /// The header bytes (magic bytes at the start of the file)
    header: Vec<u8>,
    /// How the end of the file is found
    footer: FooterRule,
    /// Distance from the header start before footer search may begin
    min_footer_offset: usize,
}

impl FileSignature {
    /// Creates a new file signature
    ///
    /// Both the header and the footer marker must be non-empty, so every
    /// carved range is at least one byte long.
    pub fn new(
        file_type: FileType,
        header: Vec<u8>,
        footer: FooterRule,
        min_footer_offset: usize,
    ) -> Result<Self, SignatureError> {
        if header.is_empty() {
            return Err(SignatureError::EmptyHeader(file_type));
        }
        if footer.marker().is_empty() {
            return Err(SignatureError::EmptyFooter(file_type));
        }
        Ok(Self::from_parts(file_type, header, footer, min_footer_offset))
    }

    pub(crate) fn from_parts(
        file_type: FileType,
        header: Vec<u8>,
        footer: FooterRule,
        min_footer_offset: usize,
    ) -> Self {
        Self {
            file_type,
            header,
            footer,
            min_footer_offset,
        }
    }

    /// JPEG: `FF D8` .. `FF D9`
    pub fn jpeg() -> Self {
        Self::from_parts(
            FileType::Jpeg,
            vec![0xFF, 0xD8],
            FooterRule::EndMarker(vec![0xFF, 0xD9]),
            2,
        )
    }

    /// PNG: 8-byte signature .. `IEND` + 4-byte CRC
    pub fn png() -> Self {
        Self::from_parts(
            FileType::Png,
            vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A],
            FooterRule::MarkerWithTrailer {
                marker: b"IEND".to_vec(),
                trailer_len: 4,
                strict: false,
            },
            8,
        )
    }

    /// Switches chunk validation of the footer on or off
    pub fn with_strict_footer(mut self, strict: bool) -> Self {
        self.footer = self.footer.with_strict(strict);
        self
    }

    /// Returns the file type this signature identifies
    pub fn file_type(&self) -> FileType {
        self.file_type
    }

    /// Returns the header bytes
    pub fn header(&self) -> &[u8] {
        &self.header
    }

    /// Returns the footer rule
    pub fn footer(&self) -> &FooterRule {
        &self.footer
    }

    /// Returns the minimum header-to-footer-search distance
    pub fn min_footer_offset(&self) -> usize {
        self.min_footer_offset
    }

    /// Checks if `data` carries this signature's header at `offset`
    pub fn matches_header_at(&self, data: &[u8], offset: usize) -> bool {
        data.get(offset..)
            .is_some_and(|tail| tail.starts_with(&self.header))
    }
}
