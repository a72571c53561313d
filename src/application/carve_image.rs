//! Carve image use case
//!
//! Opens a disk image, carves it front to back and persists every
//! extraction into the output directory.

use crate::application::dto::{CarveOptions, CarveSummary};
use crate::domain::entities::{CarveReport, ScanProgress};
use crate::domain::repositories::{CarvedFileWriter, DiskImageSource};
use crate::domain::services::{CarveEngine, SignatureRegistry};
use crate::infrastructure::disk_image::MmapDiskImage;
use crate::infrastructure::persistence::LocalFileWriter;
use anyhow::{Context, Result, bail};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Instant;

/// Carve image use case
pub struct CarveImageUseCase {
    engine: CarveEngine,
}

impl CarveImageUseCase {
    /// Creates a use case around a configured engine
    pub fn new(engine: CarveEngine) -> Self {
        Self { engine }
    }

    /// Builds the signature table and size bound described by `options`
    pub fn from_options(options: &CarveOptions) -> Result<Self> {
        let mut registry = SignatureRegistry::default_images();
        if !options.file_types.is_empty() {
            registry.filter_types(&options.file_types);
        }
        registry.set_strict_footers(options.strict_png);

        if registry.is_empty() {
            bail!("No signatures selected");
        }

        let engine = CarveEngine::new(Arc::new(registry)).with_max_file_size(options.max_file_size);
        Ok(Self::new(engine))
    }

    pub fn engine(&self) -> &CarveEngine {
        &self.engine
    }

    /// Executes the carve
    ///
    /// A missing or unreadable input fails before the output directory is
    /// touched. Write failures on individual files are reported in the
    /// summary and never abort the run.
    pub fn execute(
        &self,
        options: &CarveOptions,
        progress: &ScanProgress,
        running: &AtomicBool,
    ) -> Result<(CarveSummary, CarveReport)> {
        let start_time = Instant::now();

        let image = MmapDiskImage::open(&options.input)
            .with_context(|| format!("Cannot open disk image {}", options.input.display()))?;

        tracing::info!(
            "Carving {} ({} bytes) into {}, files up to {} bytes",
            options.input.display(),
            image.size(),
            options.output_dir.display(),
            self.engine.max_file_size()
        );

        let writer = LocalFileWriter::new(&options.output_dir).with_context(|| {
            format!(
                "Cannot create output directory {}",
                options.output_dir.display()
            )
        })?;

        let report = self.carve_source(&image, &writer, progress, running);
        let duration = start_time.elapsed();

        if let Some(path) = &options.records_path {
            write_records(path, &report)
                .with_context(|| format!("Cannot write records to {}", path.display()))?;
        }

        let summary = CarveSummary::from_report(
            options.input.clone(),
            options.output_dir.clone(),
            image.size(),
            &report,
            duration,
        );

        tracing::info!(
            "Carve complete: {} files in {:.2}s",
            summary.files_recovered,
            duration.as_secs_f64()
        );

        Ok((summary, report))
    }

    /// Carves an already opened source into `writer`
    pub fn carve_source<S, W>(
        &self,
        image: &S,
        writer: &W,
        progress: &ScanProgress,
        running: &AtomicBool,
    ) -> CarveReport
    where
        S: DiskImageSource + ?Sized,
        W: CarvedFileWriter + ?Sized,
    {
        self.engine
            .session(image.as_bytes())
            .with_progress(progress.clone())
            .run(writer, running)
    }
}

fn write_records(path: &Path, report: &CarveReport) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut out, report.records())?;
    out.flush()?;
    Ok(())
}
