//! Scan result entities
//!
//! Progress snapshots and the outcome of a complete carving session.

use super::carved_file::{CarveRecord, CarvedFile, PersistStatus, RejectReason};
use super::file_signature::FileType;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Read-only view of a session's cursor
///
/// Clones share the same counters. The carving session publishes its cursor
/// after every transition; observers poll on their own schedule and have no
/// way to feed anything back.
#[derive(Debug, Clone, Default)]
pub struct ScanProgress {
    cursor: Arc<AtomicU64>,
    total: Arc<AtomicU64>,
}

impl ScanProgress {
    /// Creates a new progress handle
    pub fn new() -> Self {
        Self::default()
    }

    /// Current cursor position
    pub fn cursor(&self) -> u64 {
        self.cursor.load(Ordering::Relaxed)
    }

    /// Size of the image being scanned
    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    /// Returns the progress percentage (0.0 - 100.0)
    pub fn percentage(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 100.0;
        }
        (self.cursor() as f64 / total as f64) * 100.0
    }

    pub(crate) fn start(&self, total: u64) {
        self.total.store(total, Ordering::Relaxed);
        self.cursor.store(0, Ordering::Relaxed);
    }

    pub(crate) fn publish(&self, cursor: u64) {
        self.cursor.store(cursor, Ordering::Relaxed);
    }
}

/// Everything a carving session produced
#[derive(Debug, Clone, Default)]
pub struct CarveReport {
    records: Vec<CarveRecord>,
    no_footer: usize,
    oversized: usize,
    bytes_scanned: u64,
    cancelled: bool,
}

impl CarveReport {
    /// Creates an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an extracted file together with its persist outcome
    pub fn add_extracted(&mut self, file: CarvedFile, persist: PersistStatus) {
        self.records.push(CarveRecord::new(file, persist));
    }

    /// Counts a rejected candidate
    pub fn add_rejection(&mut self, reason: RejectReason) {
        match reason {
            RejectReason::NoFooterFound => self.no_footer += 1,
            RejectReason::OversizedCandidate { .. } => self.oversized += 1,
        }
    }

    pub(crate) fn finish(&mut self, bytes_scanned: u64, cancelled: bool) {
        self.bytes_scanned = bytes_scanned;
        self.cancelled = cancelled;
    }

    /// All extracted files in ascending offset order
    pub fn records(&self) -> &[CarveRecord] {
        &self.records
    }

    /// Iterates over the carved ranges regardless of persist outcome
    pub fn carved_files(&self) -> impl Iterator<Item = &CarvedFile> {
        self.records.iter().map(|r| &r.file)
    }

    /// Number of extracted files
    pub fn extracted(&self) -> usize {
        self.records.len()
    }

    /// Number of files written successfully
    pub fn persisted(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.persist.is_persisted())
            .count()
    }

    /// Number of files the sink failed to write
    pub fn write_failures(&self) -> usize {
        self.extracted() - self.persisted()
    }

    /// Candidates rejected because no footer followed them
    pub fn rejected_no_footer(&self) -> usize {
        self.no_footer
    }

    /// Candidates rejected for exceeding the size bound
    pub fn rejected_oversized(&self) -> usize {
        self.oversized
    }

    /// Final cursor position
    pub fn bytes_scanned(&self) -> u64 {
        self.bytes_scanned
    }

    /// Whether the scan stopped before reaching the end of the image
    pub fn was_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Extracted file count per type
    pub fn counts_by_type(&self) -> BTreeMap<FileType, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.file.file_type()).or_insert(0) += 1;
        }
        counts
    }

    /// Total bytes written by the sink
    pub fn bytes_persisted(&self) -> u64 {
        self.records
            .iter()
            .filter(|r| r.persist.is_persisted())
            .map(|r| r.file.size())
            .sum()
    }
}
