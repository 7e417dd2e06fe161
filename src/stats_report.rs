use festweld::FlattenDetails;

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

/// Print a compact per-file report to stderr (stdout carries the document).
pub fn print_run(details: &FlattenDetails, color: bool) {
    let palette = ansi::Palette::new(color);

    eprintln!("\n{}", palette.paint("━━━ Files ━━━", ansi::GRAY));
    for (idx, file) in details.files.iter().enumerate() {
        let indent = if idx == 0 { "" } else { "  " };
        eprintln!(
            "  {}{} {}",
            indent,
            palette.bold(palette.paint(file.path.display().to_string(), ansi::CYAN)),
            palette.dim(format!("{:?}", file.duration)),
        );
        eprintln!(
            "  {}  {} {}  {} {}  {} {}",
            indent,
            palette.dim("segments:"),
            file.segments,
            palette.dim("includes:"),
            palette.paint(file.includes.to_string(), ansi::GREEN),
            palette.dim("duplicates:"),
            if file.duplicates > 0 {
                palette.paint(file.duplicates.to_string(), ansi::YELLOW)
            } else {
                palette.dim("0")
            },
        );
    }

    let includes: usize = details.files.iter().map(|f| f.includes).sum();
    let duplicates: usize = details.files.iter().map(|f| f.duplicates).sum();
    eprintln!("\n{}", palette.paint("━━━ Totals ━━━", ansi::GRAY));
    eprintln!(
        "  Files: {}  │  Includes: {}  │  Duplicates skipped: {}  │  Total: {}",
        palette.paint(details.files.len().to_string(), ansi::CYAN),
        palette.paint(includes.to_string(), ansi::GREEN),
        palette.paint(duplicates.to_string(), ansi::YELLOW),
        palette.paint(format!("{:?}", details.total), ansi::GREEN),
    );
    eprintln!();
}
