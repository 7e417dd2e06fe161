use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

#[macro_use]
mod macros;
mod api;
mod engine;
mod error;
mod host;

pub use api::{
    FileSummary, FlattenDetails, FlattenResult, FlattenResultVerbose, Options, flatten, flatten_verbose_with,
    flatten_with,
};
pub use error::Error;
pub use host::{FsHost, Host};

// --- Internal types ---------------------------------------------------------

/// One piece of a segmented document: either a literal text run or a typed
/// directive marker. Segment order is document order and reassembly is plain
/// concatenation, so it must be preserved exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    /// Literal output text, opaque to the engine.
    Text { text: String },
    /// A `fest:include`/`fest:insert` tag referencing another file.
    Include { url: String, kind: IncludeKind },
    /// An include whose target was already spliced earlier in the session.
    /// Produced by the resolver, never by the segmenter.
    Duplicate { url: String },
    /// A `fest:template` open or close tag. Stripped when the containing file
    /// was reached via inclusion, passed through otherwise.
    Template { raw: String },
    /// An asset-bearing attribute eligible for link processing.
    Asset { attr: AssetAttr, separator: Separator, url: String },
    /// Any other matched construct (comments, ineligible attribute sites);
    /// passed through verbatim.
    Comment { raw: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IncludeKind {
    /// Splice the resolved content as raw markup.
    Include,
    /// Splice with `<`/`>` escaped, for embedding where raw markup is unsafe.
    Insert,
}

/// Attribute names whose values may refer to processable assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetAttr {
    Src,
    Href,
    Background,
}

impl AssetAttr {
    pub(crate) fn from_matched(name: &str) -> Option<Self> {
        match name {
            "src" => Some(AssetAttr::Src),
            "href" => Some(AssetAttr::Href),
            "background" => Some(AssetAttr::Background),
            _ => None,
        }
    }
}

impl fmt::Display for AssetAttr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetAttr::Src => write!(f, "src"),
            AssetAttr::Href => write!(f, "href"),
            AssetAttr::Background => write!(f, "background"),
        }
    }
}

/// Separator between an asset attribute name and its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Separator {
    Equals,
    Colon,
}

impl Separator {
    pub(crate) fn from_matched(sep: &str) -> Option<Self> {
        match sep {
            "=" => Some(Separator::Equals),
            ":" => Some(Separator::Colon),
            _ => None,
        }
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Separator::Equals => write!(f, "="),
            Separator::Colon => write!(f, ":"),
        }
    }
}

// --- Session: duplicate tracking for one top-level run -----------------------

/// Session-wide inclusion ledger for one top-level flatten call.
///
/// Maps each included absolute path to the file that first included it.
/// First writer wins: once a path is marked, every later include of it
/// (anywhere in the recursion tree, `include` and `insert` alike) resolves to
/// empty output. Entries are never removed during a session; a fresh session
/// is created per top-level call, so concurrent flattens of independent
/// documents cannot interfere.
#[derive(Debug, Default)]
pub(crate) struct Session {
    processed: HashMap<PathBuf, PathBuf>,
}

impl Session {
    /// The file that first included `target`, if any.
    pub fn origin_of(&self, target: &Path) -> Option<&Path> {
        self.processed.get(target).map(PathBuf::as_path)
    }

    /// Record `target` as included by `origin`. Keeps the first writer.
    pub fn mark(&mut self, target: PathBuf, origin: PathBuf) {
        self.processed.entry(target).or_insert(origin);
    }
}

/// Per-file processing context. `parent` is non-null exactly when the file
/// was reached via an include/insert directive; the chain forms a tree rooted
/// at the top-level document, each node owned by the recursive call that
/// created it.
#[derive(Debug)]
pub(crate) struct FileCx<'a> {
    pub path: PathBuf,
    pub parent: Option<&'a FileCx<'a>>,
}

impl FileCx<'_> {
    /// Include nesting depth; 0 for the top-level document.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut cx = self;
        while let Some(parent) = cx.parent {
            depth += 1;
            cx = parent;
        }
        depth
    }
}
