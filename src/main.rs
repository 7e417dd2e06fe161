mod stats_report;

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use festweld::{FsHost, Options, flatten_verbose_with};
use tracing_subscriber::EnvFilter;

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let options = Options { comments: config.comments, warnings: config.warnings };
    let res = match flatten_verbose_with(&config.input, &FsHost, &options) {
        Ok(res) => res,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    if config.stats {
        stats_report::print_run(&res.details, config.color);
    }

    let written = match &config.output {
        Some(path) => std::fs::write(path, &res.text)
            .map_err(|err| format!("error: failed to write {}: {err}", path.display())),
        None => io::stdout()
            .write_all(res.text.as_bytes())
            .map_err(|err| format!("error: failed to write stdout: {err}")),
    };
    if let Err(err) = written {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

struct CliConfig {
    input: PathBuf,
    output: Option<PathBuf>,
    comments: bool,
    warnings: bool,
    stats: bool,
    color: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let defaults = Options::default();
    let mut input: Option<PathBuf> = None;
    let mut output: Option<PathBuf> = None;
    let mut comments = defaults.comments;
    let mut warnings = defaults.warnings;
    let mut stats = false;
    let mut color = io::stderr().is_terminal();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("festweld {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--comments" => comments = true,
            "--no-comments" => comments = false,
            "--warnings" => warnings = true,
            "--no-warnings" => warnings = false,
            "--stats" => stats = true,
            "--color" => color = true,
            "--no-color" => color = false,
            "-o" | "--output" => {
                let value = args.next().ok_or_else(|| "error: --output expects a value".to_string())?;
                if output.is_some() {
                    return Err("error: output provided multiple times".to_string());
                }
                output = Some(PathBuf::from(value));
            }
            _ if arg.starts_with("--output=") => {
                let value = arg.trim_start_matches("--output=");
                if output.is_some() {
                    return Err("error: output provided multiple times".to_string());
                }
                output = Some(PathBuf::from(value));
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(PathBuf::from(arg));
            }
        }
    }

    let input = input.ok_or_else(|| format!("error: no input file provided\n\n{}", help_text()))?;

    Ok(CliConfig { input, output, comments, warnings, stats, color })
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "festweld {version}

Flattens fest-flavored markup: resolves fest:include/fest:insert directives,
strips fest:template markers from included files and rewrites asset links.

Usage:
  festweld [OPTIONS] <input-file>

Options:
  -o, --output <file>        Write the flattened document to <file>.
                             Default: stdout.
  --comments / --no-comments Wrap each included file in fest-file-begin/end
                             markers. Default: on.
  --warnings / --no-warnings Warn when a duplicate include is skipped.
                             Default: on.
  --stats                    Print a per-file report to stderr.
  --color                    Force ANSI color in the stats report.
  --no-color                 Disable ANSI color in the stats report.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Exit codes:
  0  Success.
  1  Read or asset-processing failure.
  2  Invalid arguments.
",
        version = env!("CARGO_PKG_VERSION")
    )
}
