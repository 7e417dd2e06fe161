use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::engine::{Resolver, RunMetrics};
use crate::error::Error;
use crate::host::{FsHost, Host};

/// Options that affect resolution behavior.
#[derive(Debug, Clone)]
pub struct Options {
    /// Wrap each `include`-spliced file in `fest-file-begin`/`fest-file-end`
    /// markers naming the included URL. Never applies to `insert`.
    pub comments: bool,
    /// Emit a warning when a duplicate include is suppressed.
    pub warnings: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self { comments: true, warnings: true }
    }
}

/// Result from [`flatten`] and [`flatten_with`].
#[derive(Debug, Clone)]
pub struct FlattenResult {
    /// The top-level document that was flattened.
    pub path: PathBuf,
    /// The fully resolved output text.
    pub text: String,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Per-file summary used in verbose results.
#[derive(Debug, Clone)]
pub struct FileSummary {
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

/// Additional details returned by [`flatten_verbose_with`].
///
/// This is intentionally compact: enough to see which files a document pulled
/// in and where the time went, without exposing the internal segment stream.
#[derive(Debug, Clone)]
pub struct FlattenDetails {
    /// Total elapsed time.
    pub total: Duration,
    /// Visited files in visit order, top-level document first.
    pub files: Vec<FileSummary>,
}

/// Result from [`flatten_verbose_with`].
#[derive(Debug, Clone)]
pub struct FlattenResultVerbose {
    pub path: PathBuf,
    pub text: String,
    pub elapsed: Duration,
    pub details: FlattenDetails,
}

/// Flatten the document at `path` using the default filesystem host and
/// default [`Options`].
///
/// # Example
/// ```no_run
/// use std::path::Path;
///
/// let out = festweld::flatten(Path::new("pages/main.xml")).unwrap();
/// println!("{}", out.text);
/// ```
pub fn flatten(path: &Path) -> Result<FlattenResult, Error> {
    flatten_with(path, &FsHost, &Options::default())
}

/// Flatten the document at `path` with the provided `host` and `options`.
///
/// Each call runs one session: duplicate tracking starts empty and is
/// dropped with the call, so independent documents can be flattened
/// concurrently without interfering.
pub fn flatten_with(path: &Path, host: &dyn Host, options: &Options) -> Result<FlattenResult, Error> {
    let run = Resolver::new(host, options).run(path)?;
    Ok(FlattenResult { path: path.to_path_buf(), text: run.text, elapsed: run.metrics.total })
}

/// Flatten `path` and return extra (compact) per-file details.
///
/// Useful for build diagnostics and the CLI's `--stats` report. The plain
/// [`flatten_with`] path does not allocate the summaries.
pub fn flatten_verbose_with(path: &Path, host: &dyn Host, options: &Options) -> Result<FlattenResultVerbose, Error> {
    let run = Resolver::new(host, options).run(path)?;
    let details = details_from(&run.metrics);
    Ok(FlattenResultVerbose {
        path: path.to_path_buf(),
        text: run.text,
        elapsed: run.metrics.total,
        details,
    })
}

fn details_from(metrics: &RunMetrics) -> FlattenDetails {
    FlattenDetails {
        total: metrics.total,
        files: metrics
            .files
            .iter()
            .map(|f| FileSummary {
                path: f.path.clone(),
                segments: f.segments,
                includes: f.includes,
                duplicates: f.duplicates,
                duration: f.duration,
            })
            .collect(),
    }
}
