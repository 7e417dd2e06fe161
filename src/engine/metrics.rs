//! Engine run metrics.
//!
//! A flatten run records one [`FileMetrics`] entry per visited file, in visit
//! order (the top-level document first, then each include as it is entered).
//! Collection is cheap and always on; [`crate::flatten_with`] simply discards
//! everything but the total, while the verbose API surfaces the per-file
//! entries for inspection and reporting.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Timings and counts for one flatten run.
#[derive(Debug, Default, Clone)]
pub struct RunMetrics {
    /// Total elapsed time for the run.
    pub total: Duration,
    /// Per-file measurements, in visit order.
    pub files: Vec<FileMetrics>,
}

/// Measurements for a single visited file.
#[derive(Debug, Default, Clone)]
pub struct FileMetrics {
    pub path: PathBuf,
    /// Number of segments the file split into.
    pub segments: usize,
    /// Includes spliced from this file.
    pub includes: usize,
    /// Duplicate includes suppressed in this file.
    pub duplicates: usize,
    /// Elapsed time resolving this file, nested includes included.
    pub duration: Duration,
}

impl RunMetrics {
    /// The most recent entry for `path`. Searched from the back: the entry
    /// being filled in is always the newest one for its path.
    pub(crate) fn file_mut(&mut self, path: &Path) -> Option<&mut FileMetrics> {
        self.files.iter_mut().rev().find(|f| f.path == path)
    }
}

/// Resolver output bundled with timing information.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// The fully resolved document text.
    pub text: String,
    /// Timing measurements for the run.
    pub metrics: RunMetrics,
}
