use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use super::resolver::Resolver;
use crate::host::{FsHost, Host};
use crate::{AssetAttr, Error, Options};

/// In-memory host over a fixed set of fixture files. Path resolution and
/// link classification reuse the [`FsHost`] rules; asset processing rewrites
/// URLs with a visible `frozen/` prefix so delegation shows up in output.
struct MapHost {
    files: HashMap<PathBuf, String>,
}

impl MapHost {
    fn new(files: &[(&str, &str)]) -> Self {
        MapHost { files: files.iter().map(|(p, c)| (PathBuf::from(p), c.to_string())).collect() }
    }
}

impl Host for MapHost {
    fn read(&self, path: &Path) -> Result<String, Error> {
        self.files.get(path).cloned().ok_or_else(|| Error::Read {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::NotFound, "no such fixture"),
        })
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn path_to(&self, url: &str, from: &Path) -> PathBuf {
        FsHost.path_to(url, from)
    }

    fn process_path<'a>(&self, path: &'a str) -> &'a str {
        FsHost.process_path(path)
    }

    fn is_link_processable(&self, url: &str) -> bool {
        FsHost.is_link_processable(url)
    }

    fn is_freezable_url(&self, url: &str) -> bool {
        FsHost.is_freezable_url(url)
    }

    fn process_asset(&self, _attr: AssetAttr, url: &str, _from: &Path) -> Result<String, Error> {
        Ok(format!("frozen/{url}"))
    }
}

fn run(host: &dyn Host, entry: &str, options: &Options) -> String {
    Resolver::new(host, options).run(Path::new(entry)).unwrap().text
}

fn quiet() -> Options {
    Options { comments: false, warnings: false }
}

#[test]
fn documents_without_directives_are_returned_unchanged() {
    let host = MapHost::new(&[("main.xml", "just\nplain text & nothing else")]);
    assert_eq!(run(&host, "main.xml", &quiet()), "just\nplain text & nothing else");
}

#[test]
fn resolved_segments_concatenate_in_document_order() {
    let host = MapHost::new(&[
        ("main.xml", "start-<fest:include src=\"a.xml\">-mid-<fest:include src=\"b.xml\">-end"),
        ("a.xml", "AAA"),
        ("b.xml", "BBB"),
    ]);
    assert_eq!(run(&host, "main.xml", &quiet()), "start-AAA-mid-BBB-end");
}

#[test]
fn include_splices_raw_content_without_comments() {
    let host = MapHost::new(&[("main.xml", "<fest:include src=\"a.xml\">"), ("a.xml", "Hello")]);
    assert_eq!(run(&host, "main.xml", &quiet()), "Hello");
}

#[test]
fn include_wraps_content_when_comments_enabled() {
    let host = MapHost::new(&[("main.xml", "<fest:include src=\"a.xml\">"), ("a.xml", "Hello")]);
    let options = Options { comments: true, warnings: false };
    assert_eq!(
        run(&host, "main.xml", &options),
        "\n<!-- fest-file-begin:a.xml -->\nHello\n<!-- fest-file-end:a.xml -->\n"
    );
}

#[test]
fn insert_escapes_angle_brackets() {
    let host = MapHost::new(&[("main.xml", "<fest:insert src=\"b.xml\">"), ("b.xml", "<b>")]);
    assert_eq!(run(&host, "main.xml", &quiet()), "&lt;b&gt;");
}

#[test]
fn insert_alters_no_other_characters() {
    let host = MapHost::new(&[("main.xml", "<fest:insert src=\"b.xml\">"), ("b.xml", "a&\"'z\n<i>")]);
    // Comment wrapping never applies to inserts, whatever the option says.
    let options = Options { comments: true, warnings: false };
    assert_eq!(run(&host, "main.xml", &options), "a&\"'z\n&lt;i&gt;");
}

#[test]
fn second_include_of_the_same_target_is_empty() {
    let host = MapHost::new(&[
        ("main.xml", "[<fest:include src=\"c.xml\">][<fest:include src=\"c.xml\">]"),
        ("c.xml", "C"),
    ]);
    assert_eq!(run(&host, "main.xml", &quiet()), "[C][]");
}

#[test]
fn duplicate_rule_spans_the_whole_session() {
    // b.xml is first reached through a.xml; the later sibling include in
    // main.xml is the duplicate.
    let host = MapHost::new(&[
        ("main.xml", "<fest:include src=\"a.xml\">|<fest:include src=\"b.xml\">"),
        ("a.xml", "a(<fest:include src=\"b.xml\">)"),
        ("b.xml", "B"),
    ]);
    assert_eq!(run(&host, "main.xml", &quiet()), "a(B)|");
}

#[test]
fn insert_obeys_the_same_duplicate_rule() {
    let host = MapHost::new(&[
        ("main.xml", "<fest:include src=\"a.xml\"><fest:insert src=\"a.xml\">"),
        ("a.xml", "<x>"),
    ]);
    assert_eq!(run(&host, "main.xml", &quiet()), "<x>");
}

#[test]
fn template_markers_survive_at_top_level() {
    let text = "<fest:template xmlns:fest=\"http://fest.dev\">\nbody\n</fest:template>\n";
    let host = MapHost::new(&[("main.xml", text)]);
    assert_eq!(run(&host, "main.xml", &quiet()), text);
}

#[test]
fn template_markers_stripped_in_included_files() {
    let host = MapHost::new(&[
        ("main.xml", "<fest:include src=\"page.xml\">"),
        ("page.xml", "<fest:template xmlns:fest=\"http://fest.dev\">\nbody\n</fest:template>\n"),
    ]);
    assert_eq!(run(&host, "main.xml", &quiet()), "body\n");
}

#[test]
fn direct_self_include_is_suppressed() {
    let host = MapHost::new(&[("a.xml", "x<fest:include src=\"a.xml\">y")]);
    assert_eq!(run(&host, "a.xml", &quiet()), "xxyy");
}

#[test]
fn query_suffix_is_ignored_for_duplicate_detection() {
    let host = MapHost::new(&[
        ("main.xml", "<fest:include src=\"a.xml\"><fest:include src=\"a.xml?v=2\">"),
        ("a.xml", "A"),
    ]);
    assert_eq!(run(&host, "main.xml", &quiet()), "A");
}

#[test]
fn comment_wrap_labels_use_the_raw_url() {
    let host = MapHost::new(&[("main.xml", "<fest:include src=\"a.xml?v=1\">"), ("a.xml", "A")]);
    let options = Options { comments: true, warnings: false };
    assert_eq!(
        run(&host, "main.xml", &options),
        "\n<!-- fest-file-begin:a.xml?v=1 -->\nA\n<!-- fest-file-end:a.xml?v=1 -->\n"
    );
}

#[test]
fn missing_include_target_aborts_the_run() {
    let host = MapHost::new(&[("main.xml", "<fest:include src=\"gone.xml\">")]);
    let err = Resolver::new(&host, &quiet()).run(Path::new("main.xml")).unwrap_err();
    match err {
        Error::Read { path, .. } => assert_eq!(path, PathBuf::from("gone.xml")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn asset_links_are_rewritten_by_the_host() {
    let host = MapHost::new(&[("main.xml", "<img src=\"logo.png\">")]);
    assert_eq!(run(&host, "main.xml", &quiet()), "<img src=frozen/logo.png>");
}

#[test]
fn nonfreezable_asset_links_pass_through() {
    let host = MapHost::new(&[("main.xml", "<a href=\"page.html\">")]);
    assert_eq!(run(&host, "main.xml", &quiet()), "<a href=\"page.html\">");
}

#[test]
fn external_asset_links_pass_through() {
    let host = MapHost::new(&[("main.xml", "<img src=\"https://cdn.example.com/logo.png\">")]);
    assert_eq!(run(&host, "main.xml", &quiet()), "<img src=\"https://cdn.example.com/logo.png\">");
}

#[test]
fn assets_skipped_when_the_document_is_not_on_disk() {
    /// Same fixtures, but every `exists` probe fails.
    struct GhostHost(MapHost);

    impl Host for GhostHost {
        fn read(&self, path: &Path) -> Result<String, Error> {
            self.0.read(path)
        }
        fn exists(&self, _path: &Path) -> bool {
            false
        }
        fn path_to(&self, url: &str, from: &Path) -> PathBuf {
            self.0.path_to(url, from)
        }
        fn process_path<'a>(&self, path: &'a str) -> &'a str {
            self.0.process_path(path)
        }
        fn is_link_processable(&self, url: &str) -> bool {
            self.0.is_link_processable(url)
        }
        fn is_freezable_url(&self, url: &str) -> bool {
            self.0.is_freezable_url(url)
        }
        fn process_asset(&self, attr: AssetAttr, url: &str, from: &Path) -> Result<String, Error> {
            self.0.process_asset(attr, url, from)
        }
    }

    let host = GhostHost(MapHost::new(&[("main.xml", "<img src='x.png'>")]));
    assert_eq!(run(&host, "main.xml", &quiet()), "<img src='x.png'>");
}

#[test]
fn failing_asset_processor_aborts_the_run() {
    struct RefusingHost(MapHost);

    impl Host for RefusingHost {
        fn read(&self, path: &Path) -> Result<String, Error> {
            self.0.read(path)
        }
        fn exists(&self, path: &Path) -> bool {
            self.0.exists(path)
        }
        fn path_to(&self, url: &str, from: &Path) -> PathBuf {
            self.0.path_to(url, from)
        }
        fn process_path<'a>(&self, path: &'a str) -> &'a str {
            self.0.process_path(path)
        }
        fn is_link_processable(&self, url: &str) -> bool {
            self.0.is_link_processable(url)
        }
        fn is_freezable_url(&self, url: &str) -> bool {
            self.0.is_freezable_url(url)
        }
        fn process_asset(&self, _attr: AssetAttr, url: &str, _from: &Path) -> Result<String, Error> {
            Err(Error::Asset { url: url.to_string(), reason: "freeze store offline".to_string() })
        }
    }

    let host = RefusingHost(MapHost::new(&[("main.xml", "<img src=\"logo.png\">")]));
    let err = Resolver::new(&host, &quiet()).run(Path::new("main.xml")).unwrap_err();
    assert!(matches!(err, Error::Asset { .. }));
}

#[test]
fn warning_toggle_never_changes_output() {
    let fixtures: &[(&str, &str)] =
        &[("main.xml", "<fest:include src=\"c.xml\"><fest:include src=\"c.xml\">"), ("c.xml", "C")];
    let silent = run(&MapHost::new(fixtures), "main.xml", &quiet());
    let loud = run(&MapHost::new(fixtures), "main.xml", &Options { comments: false, warnings: true });
    assert_eq!(silent, loud);
    assert_eq!(loud, "C");
}

#[test]
fn metrics_record_files_in_visit_order() {
    let host = MapHost::new(&[
        ("main.xml", "<fest:include src=\"a.xml\"><fest:include src=\"b.xml\"><fest:include src=\"a.xml\">"),
        ("a.xml", "A"),
        ("b.xml", "B"),
    ]);
    let result = Resolver::new(&host, &quiet()).run(Path::new("main.xml")).unwrap();

    let paths: Vec<_> = result.metrics.files.iter().map(|f| f.path.clone()).collect();
    assert_eq!(paths, vec![PathBuf::from("main.xml"), PathBuf::from("a.xml"), PathBuf::from("b.xml")]);

    let main = &result.metrics.files[0];
    assert_eq!(main.segments, 3);
    assert_eq!(main.includes, 2);
    assert_eq!(main.duplicates, 1);
    assert!(result.metrics.total >= main.duration);
}
