//! Carve summary DTO

use crate::domain::entities::{CarveReport, FileType};
use crate::utils::format_bytes;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Outcome of one carve run
#[derive(Debug, Clone, Serialize)]
pub struct CarveSummary {
    /// Disk image that was carved
    pub source_path: PathBuf,
    /// Output directory
    pub output_dir: PathBuf,
    /// Files extracted and written
    pub files_recovered: usize,
    /// Extracted files by type, failed writes included
    pub files_by_type: BTreeMap<FileType, usize>,
    /// Extractions whose write failed
    pub failed_writes: usize,
    /// Candidates with no acceptable footer
    pub rejected_no_footer: usize,
    /// Candidates over the size bound
    pub rejected_oversized: usize,
    /// Bytes written to the output directory
    pub bytes_recovered: u64,
    /// Cursor position when the run stopped
    pub bytes_scanned: u64,
    /// Size of the disk image
    pub image_size: u64,
    /// Whether the run was interrupted before the end of the image
    pub cancelled: bool,
    /// Wall time of the run
    pub duration: Duration,
}

impl CarveSummary {
    /// Builds a summary from a finished report
    pub fn from_report(
        source_path: PathBuf,
        output_dir: PathBuf,
        image_size: u64,
        report: &CarveReport,
        duration: Duration,
    ) -> Self {
        Self {
            source_path,
            output_dir,
            files_recovered: report.persisted(),
            files_by_type: report.counts_by_type(),
            failed_writes: report.write_failures(),
            rejected_no_footer: report.rejected_no_footer(),
            rejected_oversized: report.rejected_oversized(),
            bytes_recovered: report.bytes_persisted(),
            bytes_scanned: report.bytes_scanned(),
            image_size,
            cancelled: report.was_cancelled(),
            duration,
        }
    }

    /// Throughput in bytes per second
    pub fn throughput(&self) -> u64 {
        let secs = self.duration.as_secs_f64();
        if secs <= 0.0 {
            return self.bytes_scanned;
        }
        (self.bytes_scanned as f64 / secs) as u64
    }

    /// Returns a summary string
    pub fn summary(&self) -> String {
        let mut summary = String::new();

        if self.cancelled {
            summary.push_str(&format!(
                "Carving interrupted at {} of {}\n",
                format_bytes(self.bytes_scanned),
                format_bytes(self.image_size)
            ));
        }

        summary.push_str(&format!(
            "Carving complete: {} files recovered ({})\n",
            self.files_recovered,
            format_bytes(self.bytes_recovered)
        ));

        for (file_type, count) in &self.files_by_type {
            summary.push_str(&format!("  {}: {}\n", file_type.tag(), count));
        }

        summary.push_str(&format!(
            "Rejected: {} without footer, {} oversized\n",
            self.rejected_no_footer, self.rejected_oversized
        ));

        if self.failed_writes > 0 {
            summary.push_str(&format!("Failed writes: {}\n", self.failed_writes));
        }

        summary.push_str(&format!(
            "Scanned {} in {:.2}s ({}/s)\n",
            format_bytes(self.bytes_scanned),
            self.duration.as_secs_f64(),
            format_bytes(self.throughput())
        ));
        summary.push_str(&format!("Output: {}", self.output_dir.display()));

        summary
    }
}
