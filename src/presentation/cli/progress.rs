//! Progress reporting for CLI

use crate::domain::entities::ScanProgress;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Progress bar fed by polling a [`ScanProgress`] on a background thread
///
/// The carve loop never calls into the bar; it only bumps the shared cursor.
pub struct ProgressReporter {
    bar: Arc<ProgressBar>,
    stop: Arc<AtomicBool>,
    watcher: Option<JoinHandle<()>>,
}

impl ProgressReporter {
    /// Starts watching `progress` for a carve over `total` bytes
    pub fn for_carve(progress: ScanProgress, total: u64) -> Self {
        let bar = Arc::new(ProgressBar::new(total));
        bar.set_style(bar_style());
        bar.set_message("Carving disk image...".to_string());

        let stop = Arc::new(AtomicBool::new(false));
        let watcher = {
            let bar = Arc::clone(&bar);
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                while !stop.load(Ordering::Relaxed) {
                    if progress.total() > 0 {
                        bar.set_length(progress.total());
                    }
                    bar.set_position(progress.cursor());
                    thread::sleep(POLL_INTERVAL);
                }
                bar.set_position(progress.cursor());
            })
        };

        Self {
            bar,
            stop,
            watcher: Some(watcher),
        }
    }

    /// A reporter that draws nothing
    pub fn hidden() -> Self {
        Self {
            bar: Arc::new(ProgressBar::hidden()),
            stop: Arc::new(AtomicBool::new(true)),
            watcher: None,
        }
    }

    /// Stops polling and finishes with a message
    pub fn finish(mut self, message: &str) {
        self.stop_watcher();
        self.bar.finish_with_message(message.to_string());
    }

    fn stop_watcher(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.watcher.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        self.stop_watcher();
    }
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{msg}\n{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({eta})")
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}
