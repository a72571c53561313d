//! Carving engine
//!
//! Drives a forward-only cursor through an immutable buffer:
//!
//! ```text
//! SEEK_HEADER -> SEEK_FOOTER -> EXTRACT | REJECT -> SEEK_HEADER ... -> DONE
//! ```
//!
//! An extraction moves the cursor to the end of the carved range; a
//! rejection moves it one byte past the rejected header, so the range stays
//! available to later candidates.

use crate::domain::entities::{
    CarveEvent, CarveReport, CarvedFile, PersistStatus, RejectReason, ScanProgress,
};
use crate::domain::repositories::CarvedFileWriter;
use crate::domain::services::pattern_scanner::{PatternId, PatternScanner};
use crate::domain::services::signature_registry::SignatureRegistry;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Default upper bound on a carved file (10 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Carving configuration shared by every session
#[derive(Debug, Clone)]
pub struct CarveEngine {
    registry: Arc<SignatureRegistry>,
    max_file_size: u64,
}

impl CarveEngine {
    /// Creates an engine over the given signature table
    pub fn new(registry: Arc<SignatureRegistry>) -> Self {
        Self {
            registry,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    /// Creates an engine with the JPEG and PNG signatures
    pub fn with_default_signatures() -> Self {
        Self::new(Arc::new(SignatureRegistry::default_images()))
    }

    /// Sets the size bound for carved files
    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    pub fn registry(&self) -> &SignatureRegistry {
        &self.registry
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Starts a session over `image`
    pub fn session<'a>(&'a self, image: &'a [u8]) -> CarveSession<'a> {
        CarveSession::new(self, image)
    }

    /// Carves `image` and returns the extracted ranges, without persisting
    pub fn carve(&self, image: &[u8]) -> Vec<CarvedFile> {
        self.session(image)
            .filter_map(|event| match event {
                CarveEvent::Extracted(file) => Some(file),
                CarveEvent::Rejected { .. } => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    SeekHeader,
    Done,
}

/// One pass over one buffer
///
/// All session state is the cursor plus whatever the caller collected from
/// previous events, so dropping a session between events loses nothing.
#[derive(Debug)]
pub struct CarveSession<'a> {
    engine: &'a CarveEngine,
    image: &'a [u8],
    scanner: PatternScanner<'a>,
    footer_ids: Vec<PatternId>,
    cursor: usize,
    state: State,
    progress: ScanProgress,
}

impl<'a> CarveSession<'a> {
    fn new(engine: &'a CarveEngine, image: &'a [u8]) -> Self {
        let mut scanner = PatternScanner::new(image);
        let footer_ids = engine
            .registry
            .signatures()
            .iter()
            .map(|sig| scanner.register(sig.footer().marker()))
            .collect();

        let progress = ScanProgress::new();
        progress.start(image.len() as u64);

        Self {
            engine,
            image,
            scanner,
            footer_ids,
            cursor: 0,
            state: State::SeekHeader,
            progress,
        }
    }

    /// Publishes the cursor through `progress` instead of a private handle
    pub fn with_progress(mut self, progress: ScanProgress) -> Self {
        progress.start(self.image.len() as u64);
        progress.publish(self.cursor as u64);
        self.progress = progress;
        self
    }

    /// Current cursor position
    pub fn cursor(&self) -> u64 {
        self.cursor as u64
    }

    /// Whether the cursor has reached the end of the buffer
    pub fn is_done(&self) -> bool {
        self.state == State::Done
    }

    /// Handle observers can poll
    pub fn progress(&self) -> ScanProgress {
        self.progress.clone()
    }

    /// Resolves the next candidate, or `None` once no header remains
    pub fn step(&mut self) -> Option<CarveEvent> {
        if self.state == State::Done {
            return None;
        }

        let Some((start, index)) = self
            .engine
            .registry
            .find_next_header(self.image, self.cursor)
        else {
            self.cursor = self.image.len();
            self.state = State::Done;
            self.progress.publish(self.cursor as u64);
            return None;
        };

        let file_type = self.engine.registry.signatures()[index].file_type();

        let event = match self.seek_footer(start, index) {
            Ok(end) => {
                tracing::trace!(%file_type, start, end, "extract");
                self.cursor = end;
                CarveEvent::Extracted(CarvedFile::new(file_type, start as u64, end as u64))
            }
            Err(reason) => {
                tracing::trace!(%file_type, start, %reason, "reject");
                self.cursor = start + 1;
                CarveEvent::Rejected {
                    file_type,
                    start_offset: start as u64,
                    reason,
                }
            }
        };

        if self.cursor >= self.image.len() {
            self.state = State::Done;
        }
        self.progress.publish(self.cursor as u64);

        Some(event)
    }

    fn seek_footer(&mut self, start: usize, index: usize) -> Result<usize, RejectReason> {
        let engine = self.engine;
        let signature = &engine.registry.signatures()[index];
        let rule = signature.footer();
        let max = engine.max_file_size;
        let id = self.footer_ids[index];

        let mut from = start + signature.min_footer_offset();
        loop {
            let pos = self
                .scanner
                .find_next(id, from)
                .ok_or(RejectReason::NoFooterFound)?;
            let end = rule.candidate_end(pos);
            if end <= start {
                return Err(RejectReason::NoFooterFound);
            }
            let size = (end - start) as u64;

            if rule.accepts(self.image, pos) {
                if size > max {
                    return Err(RejectReason::OversizedCandidate { size });
                }
                return Ok(end);
            }

            // every later occurrence ends even further out
            if size > max {
                return Err(RejectReason::OversizedCandidate { size });
            }
            from = pos + 1;
        }
    }

    /// Drives the session to completion, persisting every extraction
    ///
    /// Stops at the next candidate boundary once `running` is cleared. A
    /// failed write is recorded on the file and the cursor still moves past it.
    pub fn run<W>(mut self, writer: &W, running: &AtomicBool) -> CarveReport
    where
        W: CarvedFileWriter + ?Sized,
    {
        let image = self.image;
        let mut report = CarveReport::new();

        while running.load(Ordering::Relaxed) {
            let Some(event) = self.step() else {
                break;
            };

            match event {
                CarveEvent::Extracted(file) => {
                    let persist = match writer.write(&file, &image[file.range()]) {
                        Ok(result) => {
                            tracing::debug!(
                                "Recovered {} ({} bytes) to {}",
                                file.file_type().tag(),
                                result.saved_size,
                                result.saved_path.display()
                            );
                            PersistStatus::Persisted {
                                path: result.saved_path,
                            }
                        }
                        Err(e) => {
                            tracing::warn!("Failed to write {}: {}", file.file_name(), e);
                            PersistStatus::Failed {
                                error: e.to_string(),
                            }
                        }
                    };
                    report.add_extracted(file, persist);
                }
                CarveEvent::Rejected { reason, .. } => report.add_rejection(reason),
            }
        }

        report.finish(self.cursor as u64, !self.is_done());
        report
    }
}

impl Iterator for CarveSession<'_> {
    type Item = CarveEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.step()
    }
}
