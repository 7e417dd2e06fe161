//! Segment resolution.
//!
//! The segmenter produces an ordered segment sequence per file; resolution
//! turns that sequence back into text, splicing include targets depth-first:
//!
//! ```text
//! Resolver::run(path)
//!   └─ process_file ── read ── segment ──┬─ Text / Comment  -> verbatim
//!                         ▲              ├─ Template        -> "" when included, verbatim at top level
//!                         │              ├─ Asset           -> attr + sep + host-processed URL
//!                         │              └─ Include ─┬─ fresh  -> mark session, recurse ──┘
//!                         └──────────────────────────┘        (escape for insert,
//!                                                              optionally comment-wrap)
//!                                                    └─ seen   -> Duplicate -> ""
//! ```
//!
//! Output is the concatenation of segment replacements in document order.
//!
//! The session map is written *before* recursing into a target, so a file
//! that includes itself resolves its second occurrence as a duplicate rather
//! than looping. Indirect cycles (A includes B, B includes A) get the same
//! treatment only once each file is marked; a chain of files that never
//! repeats a path recurses without bound, as in the original tool.
//!
//! File-read failures abort the run and propagate to the caller; nothing in
//! this module recovers them.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, warn};

use super::markup::{comment_wrap, escape_angle};
use super::metrics::{FileMetrics, RunMetrics, RunResult};
use super::segmenter::segment;
use crate::host::Host;
use crate::{Error, FileCx, IncludeKind, Options, Segment, Session};

/// Resolver orchestrates one flatten run over a recursion tree of files.
///
/// Usage: create with `Resolver::new(host, options)`, then call `run(path)`.
/// The resolver owns the run's [`Session`], so every recursive call sees the
/// same duplicate ledger and independent runs cannot interfere.
pub(crate) struct Resolver<'h> {
    host: &'h dyn Host,
    options: &'h Options,
    session: Session,
    metrics: RunMetrics,
}

impl<'h> Resolver<'h> {
    pub fn new(host: &'h dyn Host, options: &'h Options) -> Self {
        Resolver { host, options, session: Session::default(), metrics: RunMetrics::default() }
    }

    /// Flatten the document rooted at `path`.
    pub fn run(mut self, path: &Path) -> Result<RunResult, Error> {
        let started = Instant::now();
        let text = self.process_file(path.to_path_buf(), None)?;
        self.metrics.total = started.elapsed();
        Ok(RunResult { text, metrics: self.metrics })
    }

    /// Read, segment and resolve one file. Includes recurse through here with
    /// the including file's context as their parent.
    fn process_file(&mut self, path: PathBuf, parent: Option<&FileCx<'_>>) -> Result<String, Error> {
        let started = Instant::now();
        let raw = self.host.read(&path)?;
        let cx = FileCx { path, parent };
        let segments = segment(&raw, self.host, &cx.path);
        debug!(path = %cx.path.display(), depth = cx.depth(), segments = segments.len(), "resolving file");

        self.metrics.files.push(FileMetrics {
            path: cx.path.clone(),
            segments: segments.len(),
            ..FileMetrics::default()
        });

        let mut out = String::new();
        for segment in segments {
            out.push_str(&self.resolve_segment(&cx, segment)?);
        }

        if let Some(entry) = self.metrics.file_mut(&cx.path) {
            entry.duration = started.elapsed();
        }
        Ok(out)
    }

    /// Produce the replacement text for one segment.
    fn resolve_segment(&mut self, cx: &FileCx<'_>, segment: Segment) -> Result<String, Error> {
        match segment {
            Segment::Text { text } => Ok(text),
            Segment::Comment { raw } => Ok(raw),
            // Template markers survive only in the top-level document.
            Segment::Template { raw } => Ok(if cx.parent.is_some() { String::new() } else { raw }),
            Segment::Duplicate { .. } => Ok(String::new()),
            Segment::Include { url, kind } => self.resolve_include(cx, url, kind),
            Segment::Asset { attr, separator, url } => {
                let resolved = self.host.process_asset(attr, &url, &cx.path)?;
                Ok(format!("{attr}{separator}{resolved}"))
            }
        }
    }

    /// Splice an include target, or degrade the segment to a duplicate marker
    /// when the session has already seen the resolved path. The target is
    /// marked *before* its content is recursed into.
    fn resolve_include(&mut self, cx: &FileCx<'_>, url: String, kind: IncludeKind) -> Result<String, Error> {
        let target = self.host.path_to(&url, &cx.path);

        if let Some(origin) = self.session.origin_of(&target) {
            if self.options.warnings {
                warn!(
                    path = %target.display(),
                    first_included_by = %origin.display(),
                    "{url} was already included and will be skipped"
                );
            }
            if let Some(entry) = self.metrics.file_mut(&cx.path) {
                entry.duplicates += 1;
            }
            return self.resolve_segment(cx, Segment::Duplicate { url });
        }

        self.session.mark(target.clone(), cx.path.clone());
        if let Some(entry) = self.metrics.file_mut(&cx.path) {
            entry.includes += 1;
        }

        let content = self.process_file(target, Some(cx))?;
        Ok(match kind {
            IncludeKind::Insert => escape_angle(&content),
            IncludeKind::Include if self.options.comments => comment_wrap(&content, &url),
            IncludeKind::Include => content,
        })
    }
}
