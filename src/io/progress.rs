//! Progress reporting and cooperative abort for row synthesis
//!
//! The engine increments a shared line counter as rows complete and checks
//! an abort flag at row granularity. Both use relaxed atomics: the fraction
//! is advisory only and is never used for correctness.

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::LazyLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Shared progress state for one synthesis call
///
/// Cloneable across threads via `Arc`; the generator writes, observers read.
#[derive(Debug, Default)]
pub struct GenerationProgress {
    completed: AtomicUsize,
    total: AtomicUsize,
    abort: AtomicBool,
}

impl GenerationProgress {
    /// Create an idle progress tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the number of rows the upcoming synthesis will produce
    pub fn set_total_lines(&self, total: usize) {
        self.total.store(total, Ordering::Relaxed);
        self.completed.store(0, Ordering::Relaxed);
    }

    /// Record one completed row
    pub fn complete_line(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    /// Rows completed so far
    pub fn completed_lines(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    /// Total rows for the current synthesis, zero when idle
    pub fn total_lines(&self) -> usize {
        self.total.load(Ordering::Relaxed)
    }

    /// Advisory completion fraction in [0, 1]
    pub fn fraction(&self) -> f64 {
        let total = self.total_lines();
        if total == 0 {
            return 0.0;
        }
        (self.completed_lines() as f64 / total as f64).min(1.0)
    }

    /// Request that the in-flight synthesis stop at the next row boundary
    ///
    /// Remaining rows are skipped and the call reports an aborted outcome
    /// rather than returning a partial image.
    pub fn request_abort(&self) {
        self.abort.store(true, Ordering::Relaxed);
    }

    /// Whether an abort has been requested
    pub fn is_abort_requested(&self) -> bool {
        self.abort.load(Ordering::Relaxed)
    }

    /// Clear counters and the abort flag before a new synthesis
    pub fn reset(&self) {
        self.completed.store(0, Ordering::Relaxed);
        self.total.store(0, Ordering::Relaxed);
        self.abort.store(false, Ordering::Relaxed);
    }
}

static LINE_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("{msg} [{bar:30.cyan/blue}] {pos}/{len} rows")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Terminal progress bar fed from a `GenerationProgress`
pub struct ProgressRenderer {
    bar: ProgressBar,
}

impl ProgressRenderer {
    /// Create a bar for the given row count and label
    pub fn new(total_lines: usize, message: String) -> Self {
        let bar = ProgressBar::new(total_lines as u64);
        bar.set_style(LINE_STYLE.clone());
        bar.set_message(message);
        Self { bar }
    }

    /// Refresh the bar from the shared counter
    pub fn update(&self, progress: &GenerationProgress) {
        self.bar.set_position(progress.completed_lines() as u64);
    }

    /// Fill and close the bar
    pub fn finish(&self) {
        self.bar.finish();
    }

    /// Close the bar without filling it, e.g. after an abort
    pub fn abandon(&self) {
        self.bar.abandon();
    }
}
