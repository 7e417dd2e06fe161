//! Document segmentation.
//!
//! One left-to-right scan over the raw text with a single combined pattern,
//! splitting the document into literal text runs and typed directive markers:
//!
//! ```text
//! raw text ── SEGMENT_RE.captures_iter ──┬─ gap text      -> Segment::Text
//!                                        └─ match ── classify() ─┬─ Comment
//!                                                                ├─ Template
//!                                                                ├─ Include / Insert
//!                                                                └─ Asset (or Comment fallback)
//! ```
//!
//! The combined pattern is an ordered alternation; earlier branches win at
//! any given position, so an attribute inside a comment is swallowed by the
//! comment branch and never matched on its own. The alternation order is:
//!
//! 1. HTML comments (including the self-closing `<!-->` form)
//! 2. `fest:template` open/close tags
//! 3. `fest:include` / `fest:insert` tags
//! 4. bare `src`/`href`/`background` attributes with a quoted value
//!
//! Classification never fails: a directive-shaped match that turns out to be
//! unusable (no `src` attribute, non-processable link) degrades to a
//! pass-through [`Segment::Comment`]. Duplicate detection is not done here;
//! the resolver re-types includes against the session.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::markup::{parse_attrs, strip_quotes};
use crate::host::Host;
use crate::{AssetAttr, IncludeKind, Segment, Separator};

/// Quoted string, single or double, no newlines.
const STRING_RE: &str = r#"(?:(?:'[^'\r\n]*')|(?:"[^"\r\n]*"))"#;

static SEGMENT_RE: Lazy<Regex> = Lazy::new(|| {
    let comment = r"(?:<!-->|<!--[^\[<][\s\S]*?-->)";
    let template = r"(?:<fest:template[^>]*>\n?|</fest:template>)\n?";
    let include = r"(?:<fest:(?P<kind>include|insert)(?P<inc_attrs>[^>]*)>)";
    let attr = format!(r"(?:(?P<attr>src|href|background)\s*(?P<sep>=|:)\s*(?P<value>{STRING_RE}))");
    Regex::new(&format!("{comment}|{template}|{include}|{attr}")).unwrap()
});

/// Split `text` into an ordered segment sequence.
///
/// `path` is the file the text came from; it keys the freezability check for
/// bare asset attributes (the check looks at the *current document's* path,
/// not the attribute's target).
pub(crate) fn segment(text: &str, host: &dyn Host, path: &Path) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut cursor = 0;

    for caps in SEGMENT_RE.captures_iter(text) {
        let m = caps.get(0).unwrap();
        if m.start() > cursor {
            segments.push(Segment::Text { text: text[cursor..m.start()].to_string() });
        }
        cursor = m.end();
        segments.push(classify(&caps, m.as_str(), host, path));
    }

    if segments.is_empty() && cursor == 0 {
        // No directive syntax anywhere: the whole input is one literal run.
        return vec![Segment::Text { text: text.to_string() }];
    }
    if cursor < text.len() {
        segments.push(Segment::Text { text: text[cursor..].to_string() });
    }
    segments
}

fn classify(caps: &Captures<'_>, raw: &str, host: &dyn Host, path: &Path) -> Segment {
    if let Some(kind) = caps.name("kind") {
        let attrs_raw = caps.name("inc_attrs").map(|m| m.as_str()).unwrap_or("");
        if !attrs_raw.is_empty() {
            if let Some(url) = parse_attrs(attrs_raw).remove("src") {
                let kind = if kind.as_str() == "insert" { IncludeKind::Insert } else { IncludeKind::Include };
                return Segment::Include { url, kind };
            }
        }
        // Tag without a usable src attribute: plain pass-through.
        return Segment::Comment { raw: raw.to_string() };
    }

    if let (Some(attr), Some(sep), Some(value)) = (caps.name("attr"), caps.name("sep"), caps.name("value")) {
        let url = strip_quotes(value.as_str());
        if let (Some(attr), Some(separator)) =
            (AssetAttr::from_matched(attr.as_str()), Separator::from_matched(sep.as_str()))
        {
            if !url.is_empty()
                && host.is_link_processable(url)
                && host.exists(path)
                && host.is_freezable_url(url)
            {
                return Segment::Asset { attr, separator, url: url.to_string() };
            }
        }
        return Segment::Comment { raw: raw.to_string() };
    }

    if regex!(r"^</?fest:template").is_match(raw) {
        return Segment::Template { raw: raw.to_string() };
    }

    Segment::Comment { raw: raw.to_string() }
}
