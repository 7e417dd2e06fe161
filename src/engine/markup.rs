//! Pure text helpers shared by the segmenter and resolver.

use std::collections::HashMap;

/// Remove exactly one outermost pair of matching quotes, if present.
/// No further unescaping is performed.
pub(crate) fn strip_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'\'' || first == b'"') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Scan a tag's attribute substring into name/value pairs, stripping the
/// surrounding quotes from each value. Names are kept as written.
pub(crate) fn parse_attrs(raw: &str) -> HashMap<String, String> {
    regex!(r#"(?i)\s+([a-z_:-]+)\s*=\s*((?:'[^'\r\n]*')|(?:"[^"\r\n]*"))"#)
        .captures_iter(raw)
        .map(|caps| (caps[1].to_string(), strip_quotes(&caps[2]).to_string()))
        .collect()
}

/// Escape `<` and `>` for insert-style splicing. No other character changes.
pub(crate) fn escape_angle(s: &str) -> String {
    s.replace('<', "&lt;").replace('>', "&gt;")
}

/// Wrap included content in begin/end markers naming the included URL.
pub(crate) fn comment_wrap(content: &str, url: &str) -> String {
    format!("\n<!-- fest-file-begin:{url} -->\n{content}\n<!-- fest-file-end:{url} -->\n")
}
