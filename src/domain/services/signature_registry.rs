//! Signature registry service
//!
//! Holds the ordered signature table consulted by the carving engine.
//! Header search across every registered format runs through a single
//! Aho-Corasick automaton in leftmost-first mode: the earliest match in the
//! buffer wins, and when two headers start at the same offset the one
//! registered first wins.

use crate::domain::entities::{FileSignature, FileType};
use aho_corasick::{AhoCorasick, Input, MatchKind};

/// Ordered registry of file signatures
///
/// # Example
///
/// ```
/// use relic::domain::services::SignatureRegistry;
/// use relic::domain::entities::FileType;
///
/// let registry = SignatureRegistry::default_images();
/// let data = [0x00, 0x00, 0xFF, 0xD8, 0xFF, 0xE0];
/// let (offset, index) = registry.find_next_header(&data, 0).unwrap();
/// assert_eq!(offset, 2);
/// assert_eq!(registry.signatures()[index].file_type(), FileType::Jpeg);
/// ```
#[derive(Debug, Clone)]
pub struct SignatureRegistry {
    signatures: Vec<FileSignature>,
    header_matcher: Option<AhoCorasick>,
}

impl SignatureRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self {
            signatures: Vec::new(),
            header_matcher: None,
        }
    }

    /// Creates a registry with the JPEG and PNG signatures, in that order
    pub fn default_images() -> Self {
        let mut registry = Self::new();
        registry.register(FileSignature::jpeg());
        registry.register(FileSignature::png());
        registry
    }

    /// Appends a signature; it loses ties against everything registered before it
    pub fn register(&mut self, signature: FileSignature) {
        self.signatures.push(signature);
        self.build_header_matcher();
    }

    /// Keeps only the signatures for the given types, preserving order
    pub fn filter_types(&mut self, types: &[FileType]) {
        self.signatures.retain(|s| types.contains(&s.file_type()));
        self.build_header_matcher();
    }

    /// Turns chunk validation of marker-plus-trailer footers on or off
    pub fn set_strict_footers(&mut self, strict: bool) {
        self.signatures = std::mem::take(&mut self.signatures)
            .into_iter()
            .map(|s| s.with_strict_footer(strict))
            .collect();
    }

    fn build_header_matcher(&mut self) {
        self.header_matcher = if self.signatures.is_empty() {
            None
        } else {
            AhoCorasick::builder()
                .match_kind(MatchKind::LeftmostFirst)
                .build(self.signatures.iter().map(|s| s.header()))
                .ok()
        };
    }

    /// All signatures in registration order
    pub fn signatures(&self) -> &[FileSignature] {
        &self.signatures
    }

    /// Returns the signature at `index`
    pub fn get(&self, index: usize) -> Option<&FileSignature> {
        self.signatures.get(index)
    }

    /// Returns the first signature registered for `file_type`
    pub fn signature_for(&self, file_type: FileType) -> Option<&FileSignature> {
        self.signatures.iter().find(|s| s.file_type() == file_type)
    }

    /// Finds the earliest header at or after `from`
    ///
    /// Returns the match offset and the index of the winning signature.
    pub fn find_next_header(&self, data: &[u8], from: usize) -> Option<(usize, usize)> {
        let matcher = self.header_matcher.as_ref()?;
        if from >= data.len() {
            return None;
        }
        matcher
            .find(Input::new(data).span(from..data.len()))
            .map(|m| (m.start(), m.pattern().as_usize()))
    }

    /// Returns the number of registered signatures
    pub fn signature_count(&self) -> usize {
        self.signatures.len()
    }

    /// Returns whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }
}

impl Default for SignatureRegistry {
    fn default() -> Self {
        Self::default_images()
    }
}
