//! Synthetic disk generation DTOs

use crate::utils::format_bytes;
use std::path::PathBuf;
use std::time::Duration;

/// Default synthetic disk size (100 MiB)
pub const DEFAULT_DISK_SIZE: usize = 100 * 1024 * 1024;

/// Placement attempts per payload before it is skipped
pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;

pub const DEFAULT_SOURCE_DIR: &str = "./dataset_source";
pub const DEFAULT_DISK_IMAGE: &str = "./test_disk.img";
pub const DEFAULT_GROUND_TRUTH: &str = "./ground_truth.csv";

/// Options for building a synthetic disk image
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Directory holding the `.jpg`, `.jpeg` and `.png` files to inject
    pub source_dir: PathBuf,
    /// Where the image is written
    pub output_image: PathBuf,
    /// Where the ground-truth manifest is written
    pub ground_truth: PathBuf,
    /// Image size in bytes
    pub disk_size: usize,
    /// Placement attempts per payload
    pub max_attempts: u32,
    /// Fixed RNG seed for reproducible images
    pub seed: Option<u64>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from(DEFAULT_SOURCE_DIR),
            output_image: PathBuf::from(DEFAULT_DISK_IMAGE),
            ground_truth: PathBuf::from(DEFAULT_GROUND_TRUTH),
            disk_size: DEFAULT_DISK_SIZE,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            seed: None,
        }
    }
}

impl GenerateOptions {
    pub fn new(
        source_dir: impl Into<PathBuf>,
        output_image: impl Into<PathBuf>,
        ground_truth: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source_dir: source_dir.into(),
            output_image: output_image.into(),
            ground_truth: ground_truth.into(),
            ..Default::default()
        }
    }

    /// Sets the image size in bytes
    pub fn with_disk_size(mut self, bytes: usize) -> Self {
        self.disk_size = bytes;
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Outcome of a generation run
#[derive(Debug, Clone)]
pub struct GenerationSummary {
    pub output_image: PathBuf,
    pub ground_truth: PathBuf,
    pub disk_size: u64,
    /// Files found in the source directory
    pub candidates: usize,
    /// Files placed in the image
    pub injected: usize,
    /// Files that could not be placed
    pub skipped: Vec<String>,
    pub injected_bytes: u64,
    pub duration: Duration,
}

impl GenerationSummary {
    /// Share of the image covered by injected files, in percent
    pub fn utilization(&self) -> f64 {
        if self.disk_size == 0 {
            return 0.0;
        }
        self.injected_bytes as f64 / self.disk_size as f64 * 100.0
    }

    /// Returns a summary string
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Injected {} of {} files ({}, {:.2}% of {})\n",
            self.injected,
            self.candidates,
            format_bytes(self.injected_bytes),
            self.utilization(),
            format_bytes(self.disk_size)
        );
        for name in &self.skipped {
            summary.push_str(&format!("  skipped: {}\n", name));
        }
        summary.push_str(&format!(
            "Image: {}\nGround truth: {}\nDone in {:.2}s",
            self.output_image.display(),
            self.ground_truth.display(),
            self.duration.as_secs_f64()
        ));
        summary
    }
}
