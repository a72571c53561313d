//! CLI commands using clap

use crate::application::dto::{
    DEFAULT_DISK_IMAGE, DEFAULT_DISK_SIZE, DEFAULT_GROUND_TRUTH, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_SOURCE_DIR,
};
use crate::domain::entities::FileType;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

const MIB: u64 = 1024 * 1024;

/// Relic - JPEG and PNG file carver
///
/// Recovers images from raw disk images by their header and footer
/// signatures, without any file system metadata.
#[derive(Parser, Debug)]
#[command(name = "relic")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Carve JPEG and PNG files out of raw disk images", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Carve a disk image into recovered_<offset>.<ext> files
    Carve {
        /// Disk image to carve
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory for recovered files
        #[arg(short, long, default_value = "./recovered_files")]
        output: PathBuf,

        /// Largest file to extract, in MiB
        #[arg(long, default_value_t = 10)]
        max_size_mb: u64,

        /// File types to carve (jpg, png)
        #[arg(short = 't', long, value_delimiter = ',')]
        types: Option<Vec<String>>,

        /// Only accept PNG footers whose IEND chunk is well formed
        #[arg(long)]
        strict_png: bool,

        /// Write every extraction record as JSON to this file
        #[arg(long)]
        records: Option<PathBuf>,

        /// Hide the progress bar
        #[arg(long)]
        no_progress: bool,
    },

    /// Build a synthetic disk image from a folder of images
    Generate {
        /// Folder of .jpg, .jpeg and .png files
        #[arg(short, long, default_value = DEFAULT_SOURCE_DIR)]
        source: PathBuf,

        /// Disk image to write
        #[arg(short, long, default_value = DEFAULT_DISK_IMAGE)]
        output: PathBuf,

        /// Ground-truth CSV to write (sha256_hash column)
        #[arg(short, long, default_value = DEFAULT_GROUND_TRUTH)]
        ground_truth: PathBuf,

        /// Image size in MiB
        #[arg(long, default_value_t = DEFAULT_DISK_SIZE as u64 / MIB)]
        size_mb: u64,

        /// Placement attempts per file
        #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
        max_attempts: u32,

        /// Seed for a reproducible image
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Score recovered files against a ground-truth CSV
    Validate {
        /// Directory of recovered files
        #[arg(short, long, default_value = "./recovered_files")]
        recovered: PathBuf,

        /// Ground-truth CSV with a sha256_hash or md5_hash column
        #[arg(short, long, default_value = DEFAULT_GROUND_TRUTH)]
        ground_truth: PathBuf,

        /// Save the report to this file
        #[arg(long)]
        report: Option<PathBuf>,

        /// Move files into verified_evidence/ and false_positives/
        #[arg(long)]
        sort: bool,
    },

    /// List supported file signatures
    ListSignatures,
}

/// Parses file type strings to FileType enum
pub fn parse_file_types(types: Option<Vec<String>>) -> Vec<FileType> {
    match types {
        None => vec![], // All types
        Some(names) => names
            .iter()
            .filter_map(|name| {
                let parsed = FileType::from_name(name);
                if parsed.is_none() {
                    tracing::warn!("Unknown file type '{}'", name);
                }
                parsed
            })
            .collect(),
    }
}

/// Converts a MiB count from the command line to bytes
pub fn mib(value: u64) -> u64 {
    value.saturating_mul(MIB)
}
