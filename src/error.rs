use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Engine errors.
///
/// File-access failures are fatal for the document being flattened and
/// propagate to the caller unchanged. Duplicate includes are a policy
/// outcome, not an error, and malformed directive syntax degrades to literal
/// pass-through text without ever reaching this type.
#[derive(Debug, Error)]
pub enum Error {
    /// An include target (or the top-level document) could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The asset link processor rejected a URL.
    #[error("failed to process asset link {url}: {reason}")]
    Asset { url: String, reason: String },
}
