//! # git2prompt Library
//!
//! This crate turns a source repository into one document that can be pasted
//! into a large language model prompt:
//!
//! - Build an ignore list from built-in patterns plus `.gptignore` or `.gitignore`
//! - Walk the repository and read every file that no pattern excludes
//! - Render the files as plain text or JSON, optionally with comments scrubbed
//!   and an approximate token count
//!
//! ## Usage
//!
//! ```rust,no_run
//! use git2prompt::{Config, process_repository};
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut config = Config::new("path/to/repo");
//!     config.estimate = true;
//!
//!     let output = process_repository(&config)?;
//!     println!("{}", output.document);
//!     println!("Estimated tokens: {}", output.token_estimate);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod error;
pub mod filewalker;
pub mod ignore_set;
pub mod pattern;
pub mod scrub;
pub mod utils;
pub mod writer;

pub use cli::Config;
pub use error::Git2PromptError;
pub use filewalker::{FileRecord, scan_repository};
pub use ignore_set::build_ignore_patterns;
pub use pattern::matches;
pub use scrub::scrub_comments;
pub use utils::estimate_tokens;
pub use writer::{FormatOptions, Formatted, OutputFormat, format_output, write_output};

use anyhow::{Context, Result};
use log::debug;
use std::io::{self, Write};

/// Builds the ignore list, scans the repository and renders the document.
pub fn process_repository(config: &Config) -> Result<Formatted> {
    debug!("Building ignore patterns...");
    let patterns = build_ignore_patterns(
        &config.repo_root,
        config.ignore_file.as_ref(),
        config.use_gitignore,
    );
    debug!("Ignore patterns: {patterns:?}");

    debug!("Scanning repository for files...");
    let files = scan_repository(&config.repo_root, &patterns)?;
    debug!("Collected {} files", files.len());

    debug!("Formatting output...");
    let output = format_output(config.format, &files, &config.format_options())?;
    Ok(output)
}

/// Runs the whole tool: renders the document, then writes it to the output
/// file or stdout and prints the token estimate when requested.
pub async fn run_git2prompt(config: Config) -> Result<()> {
    let output = process_repository(&config)
        .with_context(|| format!("Failed to process {}", config.repo_root.display()))?;

    let print_document = match &config.output_path {
        Some(path) => {
            write_output(path, &output.document).await?;
            false
        }
        None if config.quiet => {
            debug!("Debug mode, document not printed");
            false
        }
        None => true,
    };

    print_report(&mut io::stdout().lock(), &output, print_document, config.estimate)
}

/// Prints the document and/or the token estimate to `out`.
///
/// A reader that goes away early (`git2prompt repo | head`) is not an error.
fn print_report<W: Write>(
    out: &mut W,
    output: &Formatted,
    print_document: bool,
    print_estimate: bool,
) -> Result<()> {
    match write_report(out, output, print_document, print_estimate) {
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => {
            debug!("stdout closed early");
            Ok(())
        }
        other => other.context("Failed to write to stdout"),
    }
}

fn write_report<W: Write>(
    out: &mut W,
    output: &Formatted,
    print_document: bool,
    print_estimate: bool,
) -> io::Result<()> {
    if print_document {
        writeln!(out, "{}", output.document)?;
    }
    if print_estimate {
        writeln!(out, "Estimated tokens: {}", output.token_estimate)?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }
    }

    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("no space left"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn sample() -> Formatted {
        Formatted {
            document: "intro\n----\na.txt\nhi\n--END--".to_string(),
            token_estimate: 5,
        }
    }

    #[test]
    fn report_prints_document_then_estimate() {
        let mut out = Vec::new();
        print_report(&mut out, &sample(), true, true).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "intro\n----\na.txt\nhi\n--END--\nEstimated tokens: 5\n"
        );
    }

    #[test]
    fn report_can_print_estimate_only() {
        let mut out = Vec::new();
        print_report(&mut out, &sample(), false, true).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Estimated tokens: 5\n");
    }

    #[test]
    fn closed_pipe_is_not_an_error() {
        assert!(print_report(&mut ClosedPipe, &sample(), true, true).is_ok());
    }

    #[test]
    fn other_write_errors_are_reported() {
        let err = print_report(&mut FullDisk, &sample(), true, false).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to write to stdout"));
    }
}
