//! Progress reporting utilities using indicatif.
//!
//! This module provides the [`ProgressCallback`] trait the pipeline reports
//! through, and [`Progress`], which draws progress bars on stderr and prints
//! skip diagnostics on stdout without tearing the bars.

use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::scanner::Diagnostic;

/// Progress callback for duplicate finding phases.
///
/// Implement this trait to receive progress updates during
/// the duplicate detection pipeline. Hashing phases call
/// [`on_progress`](Self::on_progress) from worker threads.
pub trait ProgressCallback: Send + Sync {
    /// Called when a phase starts.
    ///
    /// # Arguments
    ///
    /// * `phase` - Name of the phase (`"walking"`, `"prehash"`, `"fullhash"`)
    /// * `total` - Total number of items to process (0 when unknown)
    fn on_phase_start(&self, phase: &str, total: usize);

    /// Called for each item processed.
    ///
    /// # Arguments
    ///
    /// * `current` - Number of items processed so far (1-based)
    /// * `path` - Path being processed
    fn on_progress(&self, current: usize, path: &str);

    /// Called when a phase completes.
    fn on_phase_end(&self, phase: &str);

    /// Called once for every file excluded because of an I/O failure.
    fn on_skipped(&self, _diagnostic: &Diagnostic) {}
}

/// Progress reporter using indicatif.
///
/// Manages one bar per phase of the duplicate detection pipeline.
pub struct Progress {
    multi: MultiProgress,
    walking: Mutex<Option<ProgressBar>>,
    prehash: Mutex<Option<ProgressBar>>,
    fullhash: Mutex<Option<ProgressBar>>,
    hidden: bool,
    diagnostics: Option<Mutex<Box<dyn Write + Send>>>,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `hidden` - If true, no progress bars are drawn.
    /// * `echo_diagnostics` - If true, skip diagnostics are printed to stdout.
    ///
    /// # Examples
    ///
    /// ```
    /// use dupefinder::progress::Progress;
    ///
    /// let progress = Progress::new(true, false);
    /// assert!(progress.is_hidden());
    /// ```
    #[must_use]
    pub fn new(hidden: bool, echo_diagnostics: bool) -> Self {
        let mut progress = Self::build(hidden);
        if echo_diagnostics {
            progress.diagnostics = Some(Mutex::new(Box::new(io::stdout())));
        }
        progress
    }

    /// Create a progress reporter that echoes skip diagnostics to `writer`.
    #[must_use]
    pub fn with_diagnostic_writer(hidden: bool, writer: impl Write + Send + 'static) -> Self {
        let mut progress = Self::build(hidden);
        progress.diagnostics = Some(Mutex::new(Box::new(writer)));
        progress
    }

    fn build(hidden: bool) -> Self {
        let multi = if hidden {
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
        } else {
            MultiProgress::new()
        };
        Self {
            multi,
            walking: Mutex::new(None),
            prehash: Mutex::new(None),
            fullhash: Mutex::new(None),
            hidden,
            diagnostics: None,
        }
    }

    /// Whether bars are suppressed.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Style for the walking phase (spinner).
    fn walking_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}] {pos} files")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
    }

    /// Style for the hashing phases (progress bar).
    fn hashing_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█>-")
    }

    fn slot(&self, phase: &str) -> Option<MutexGuard<'_, Option<ProgressBar>>> {
        let slot = match phase {
            "walking" => &self.walking,
            "prehash" => &self.prehash,
            "fullhash" => &self.fullhash,
            _ => return None,
        };
        Some(slot.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// The bar of the latest phase that is still running.
    fn active_bar(&self) -> Option<ProgressBar> {
        ["fullhash", "prehash", "walking"]
            .into_iter()
            .find_map(|phase| self.slot(phase).and_then(|bar| bar.clone()))
    }
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: &str, total: usize) {
        if self.hidden {
            return;
        }

        let (bar, message) = match phase {
            "walking" => {
                let pb = ProgressBar::new_spinner().with_style(Self::walking_style());
                pb.enable_steady_tick(Duration::from_millis(100));
                (pb, "Walking directory")
            }
            "prehash" => (
                ProgressBar::new(total as u64).with_style(Self::hashing_style()),
                "Prehashing",
            ),
            "fullhash" => (
                ProgressBar::new(total as u64).with_style(Self::hashing_style()),
                "Full hashing",
            ),
            _ => return,
        };

        let bar = self.multi.add(bar);
        bar.set_message(message);
        if let Some(mut slot) = self.slot(phase) {
            *slot = Some(bar);
        }
    }

    fn on_progress(&self, _current: usize, path: &str) {
        if self.hidden {
            return;
        }

        if let Some(pb) = self.active_bar() {
            pb.inc(1);
            pb.set_message(truncate_path(path, 30));
        }
    }

    fn on_phase_end(&self, phase: &str) {
        if self.hidden {
            return;
        }

        let message = match phase {
            "walking" => "Walking complete",
            "prehash" => "Prehashing complete",
            "fullhash" => "Full hashing complete",
            _ => return,
        };
        if let Some(pb) = self.slot(phase).and_then(|mut slot| slot.take()) {
            pb.finish_with_message(message);
        }
    }

    fn on_skipped(&self, diagnostic: &Diagnostic) {
        let Some(out) = &self.diagnostics else {
            return;
        };
        // Bars live on stderr; suspend them so the line lands cleanly.
        self.multi.suspend(|| {
            let mut out = out.lock().unwrap_or_else(PoisonError::into_inner);
            if let Err(e) = writeln!(out, "{diagnostic}").and_then(|()| out.flush()) {
                log::debug!("Failed to print diagnostic: {}", e);
            }
        });
    }
}

/// Truncate a path for display in the progress bar.
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.chars().count() <= max_len {
        return path.to_string();
    }

    let file_name = std::path::Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let name_len = file_name.chars().count();
    if name_len >= max_len {
        let tail: String = file_name.chars().skip(name_len + 3 - max_len).collect();
        return format!("...{tail}");
    }

    format!(".../{file_name}")
}
