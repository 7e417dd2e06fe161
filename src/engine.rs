//! Segmentation and resolution engine.
//!
//! This module is the internal core behind the public [`crate::flatten`]
//! family. Flattening one document is a two-stage pipeline, repeated per
//! file across the include tree:
//!
//! ```text
//! raw text ── segment            (segmenter.rs)
//!                │
//!                v
//!         Vec<Segment> ── Resolver::process_file   (resolver.rs)
//!                │            │
//!                │            └─ recurses into include targets,
//!                │               sharing one Session per run
//!                v
//!           final text ── concatenated in document order
//! ```
//!
//! ## Responsibilities by module
//!
//! - `segmenter.rs`: single combined-pattern scan splitting raw text into
//!   literal runs and typed directive markers.
//! - `resolver.rs`: exhaustive per-segment dispatch, duplicate suppression
//!   against the session ledger, depth-first recursion into includes.
//! - `markup.rs`: pure helpers (quote stripping, attribute scanning,
//!   angle-bracket escaping, begin/end comment wrapping).
//! - `metrics.rs`: per-run and per-file timing/count data.
//!
//! The host pipeline (file access, path resolution, link classification,
//! asset freezing) stays behind [`crate::Host`]; nothing in here touches the
//! filesystem directly.

#[path = "engine/markup.rs"]
mod markup;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/resolver.rs"]
mod resolver;
#[path = "engine/segmenter.rs"]
mod segmenter;

#[cfg(test)]
#[path = "engine/tests.rs"]
mod tests;

#[allow(unused_imports)]
pub use metrics::{FileMetrics, RunMetrics, RunResult};
pub(crate) use resolver::Resolver;
