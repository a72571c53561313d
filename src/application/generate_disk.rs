//! Generate disk use case
//!
//! Builds a synthetic disk image from a folder of JPEG and PNG files and
//! records where each one landed, so a later carve can be scored.

use crate::application::dto::{GenerateOptions, GenerationSummary};
use crate::domain::entities::GroundTruthEntry;
use crate::infrastructure::disk_image::DiskImageBuilder;
use crate::infrastructure::persistence::write_ground_truth;
use crate::utils::content_hash;
use anyhow::{Context, Result, bail};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// A source file read into memory
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub filename: String,
    pub data: Vec<u8>,
    pub content_hash: String,
}

/// Generate disk use case
#[derive(Debug, Default)]
pub struct GenerateDiskUseCase;

impl GenerateDiskUseCase {
    pub fn new() -> Self {
        Self
    }

    /// Executes the generation
    pub fn execute(&self, options: &GenerateOptions) -> Result<GenerationSummary> {
        let start_time = Instant::now();

        let sources = collect_source_images(&options.source_dir)?;
        if sources.is_empty() {
            bail!(
                "No .jpg, .jpeg or .png files found in {}",
                options.source_dir.display()
            );
        }

        let mut rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        tracing::info!(
            "Injecting {} files into a {} byte image",
            sources.len(),
            options.disk_size
        );

        let mut builder = DiskImageBuilder::new(options.disk_size);
        let mut entries = Vec::with_capacity(sources.len());
        let mut skipped = Vec::new();

        for source in &sources {
            match builder.inject(&source.data, options.max_attempts, &mut rng) {
                Ok(offset) => {
                    tracing::debug!("Injected {} at offset {}", source.filename, offset);
                    entries.push(GroundTruthEntry {
                        filename: source.filename.clone(),
                        content_hash: source.content_hash.clone(),
                        start_offset: offset,
                        size: source.data.len() as u64,
                    });
                }
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", source.filename, e);
                    skipped.push(source.filename.clone());
                }
            }
        }

        let injected_bytes = builder.injected_bytes();
        let disk_size = builder.capacity();
        builder.fill_noise(&mut rng);

        let image = builder.finish(&options.output_image);
        image
            .write_to(&options.output_image)
            .with_context(|| format!("Cannot write image {}", options.output_image.display()))?;

        write_ground_truth(&options.ground_truth, &entries).with_context(|| {
            format!(
                "Cannot write ground truth {}",
                options.ground_truth.display()
            )
        })?;

        Ok(GenerationSummary {
            output_image: options.output_image.clone(),
            ground_truth: options.ground_truth.clone(),
            disk_size,
            candidates: sources.len(),
            injected: entries.len(),
            skipped,
            injected_bytes,
            duration: start_time.elapsed(),
        })
    }
}

/// Reads every image file directly inside `dir`, sorted by name
pub fn collect_source_images(dir: &Path) -> Result<Vec<SourceImage>> {
    if !dir.is_dir() {
        bail!("Source folder {} does not exist", dir.display());
    }

    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Cannot list {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && has_image_extension(path))
        .collect();
    paths.sort();

    paths
        .into_iter()
        .map(|path| {
            let data = fs::read(&path).with_context(|| format!("Cannot read {}", path.display()))?;
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            tracing::trace!("Hashed {}", filename);
            Ok(SourceImage {
                content_hash: content_hash(&data),
                filename,
                data,
            })
        })
        .collect()
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}
