//! Collaborator seam between the engine and the host build pipeline.
//!
//! The engine never touches the filesystem or the asset-freezing subsystem
//! directly; everything it needs from the outside world goes through [`Host`].
//! [`FsHost`] is the default implementation: plain synchronous filesystem
//! reads, lexical path resolution, and an identity asset processor. Build
//! pipelines that freeze assets (content-hash renaming) supply their own
//! implementation, usually by overriding [`Host::process_asset`] and the two
//! link classification checks.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::AssetAttr;
use crate::error::Error;

/// Capabilities the engine must be supplied with.
pub trait Host {
    /// Return the raw text of `path`. Failures abort the whole document.
    fn read(&self, path: &Path) -> Result<String, Error>;

    /// Whether `path` exists on disk. Asset attributes are only eligible for
    /// processing when the document they appear in exists.
    fn exists(&self, path: &Path) -> bool;

    /// Resolve a reference URL against the file it appears in.
    fn path_to(&self, url: &str, from: &Path) -> PathBuf;

    /// Strip a trailing `?query` suffix from a raw path.
    fn process_path<'a>(&self, path: &'a str) -> &'a str;

    /// Whether a URL is a candidate for asset processing at all. External and
    /// fragment-only links are not.
    fn is_link_processable(&self, url: &str) -> bool;

    /// Whether a URL points at a freezable asset kind.
    fn is_freezable_url(&self, url: &str) -> bool;

    /// Produce the final string to emit in place of an asset URL, `from`
    /// being the document the reference appears in.
    fn process_asset(&self, attr: AssetAttr, url: &str, from: &Path) -> Result<String, Error>;
}

/// Extensions the default host treats as freezable assets.
const FREEZABLE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "gif", "ico", "png", "swf", "svg", "ttf", "eot", "otf", "woff", "woff2", "css", "js", "cur",
];

/// Default [`Host`] backed by the local filesystem.
///
/// Asset processing is an identity passthrough: content-hash freezing belongs
/// to the surrounding pipeline, not to this engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsHost;

impl Host for FsHost {
    fn read(&self, path: &Path) -> Result<String, Error> {
        fs::read_to_string(path).map_err(|source| Error::Read { path: path.to_path_buf(), source })
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn path_to(&self, url: &str, from: &Path) -> PathBuf {
        let dir = from.parent().unwrap_or_else(|| Path::new(""));
        normalize(&dir.join(self.process_path(url)))
    }

    fn process_path<'a>(&self, path: &'a str) -> &'a str {
        match path.find('?') {
            Some(idx) => &path[..idx],
            None => path,
        }
    }

    fn is_link_processable(&self, url: &str) -> bool {
        !url.is_empty()
            && !url.starts_with('#')
            && !url.starts_with("//")
            && !regex!(r"^[a-zA-Z][a-zA-Z0-9+.-]*:").is_match(url)
    }

    fn is_freezable_url(&self, url: &str) -> bool {
        match self.process_path(url).rsplit_once('.') {
            Some((_, ext)) => FREEZABLE_EXTENSIONS.iter().any(|f| ext.eq_ignore_ascii_case(f)),
            None => false,
        }
    }

    fn process_asset(&self, _attr: AssetAttr, url: &str, _from: &Path) -> Result<String, Error> {
        Ok(url.to_string())
    }
}

/// Collapse `.` and `..` components without touching the filesystem, so the
/// session's duplicate map compares one canonical spelling per target.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` above an absolute root stays clamped at the root.
                if !out.pop() && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
