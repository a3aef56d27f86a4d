use crate::writer::{FormatOptions, OutputFormat};
use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use log::LevelFilter;
use std::path::PathBuf;

/// Settings for one run, built from the command line.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub repo_root: PathBuf,
    pub preamble_file: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    /// Print the approximate token count after the document.
    pub estimate: bool,
    /// Custom ignore file; `.gptignore` at the repository root when unset.
    pub ignore_file: Option<PathBuf>,
    pub use_gitignore: bool,
    pub format: OutputFormat,
    /// Suppress printing the document to stdout.
    pub quiet: bool,
    pub scrub_comments: bool,
    pub verbose: bool,
}

impl Config {
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
            use_gitignore: true,
            ..Self::default()
        }
    }

    pub fn format_options(&self) -> FormatOptions {
        FormatOptions {
            preamble_file: self.preamble_file.clone(),
            scrub_comments: self.scrub_comments,
            estimate_tokens: self.estimate,
        }
    }
}

pub fn build_command() -> Command {
    let cmd = Command::new("git2prompt")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Converts a repository into a single document for LLM prompts")
        .arg(
            Arg::new("repo_path")
                .value_name("REPO_PATH")
                .help("Path to the repository")
                .required(true)
                .num_args(1),
        )
        .arg(
            Arg::new("preamble")
                .short('p')
                .long("preamble")
                .value_name("FILE")
                .help("Path to preamble text file")
                .num_args(1),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Write the document to FILE instead of stdout (must not exist)")
                .num_args(1),
        )
        .arg(
            Arg::new("estimate")
                .short('e')
                .long("estimate")
                .help("Estimate the number of tokens in the output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("ignore")
                .short('i')
                .long("ignore")
                .value_name("FILE")
                .help("Path to a .gptignore-style file")
                .num_args(1),
        )
        .arg(
            Arg::new("ignore_gitignore")
                .short('g')
                .long("ignore-gitignore")
                .help("Do not use the repository's .gitignore")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("debug")
                .short('d')
                .long("debug")
                .help("Debug mode (no output to stdout)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("scrub_comments")
                .short('s')
                .long("scrub-comments")
                .help("Scrub comments from the output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(ArgAction::SetTrue),
        );

    #[cfg(feature = "json")]
    let cmd = cmd.arg(
        Arg::new("json")
            .short('j')
            .long("json")
            .help("Output JSON")
            .action(ArgAction::SetTrue),
    );

    cmd
}

/// Parses the process arguments.
///
/// Usage errors come back as a [`clap::Error`] inside the `anyhow::Error`
/// instead of exiting, so the caller decides the exit code.
pub fn parse_args() -> Result<Config> {
    let matches = build_command().try_get_matches()?;
    config_from_matches(&matches)
}

pub fn config_from_matches(matches: &ArgMatches) -> Result<Config> {
    let repo_root = matches
        .get_one::<String>("repo_path")
        .map(PathBuf::from)
        .context("Missing repository path")?;

    #[cfg(feature = "json")]
    let format = if matches.get_flag("json") {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    #[cfg(not(feature = "json"))]
    let format = OutputFormat::Text;

    Ok(Config {
        repo_root,
        preamble_file: matches.get_one::<String>("preamble").map(PathBuf::from),
        output_path: matches.get_one::<String>("output").map(PathBuf::from),
        estimate: matches.get_flag("estimate"),
        ignore_file: matches.get_one::<String>("ignore").map(PathBuf::from),
        use_gitignore: !matches.get_flag("ignore_gitignore"),
        format,
        quiet: matches.get_flag("debug"),
        scrub_comments: matches.get_flag("scrub_comments"),
        verbose: matches.get_flag("verbose"),
    })
}

/// Installs the logger at `warn`, or `debug` when `verbose` is set.
/// `RUST_LOG` takes precedence when present.
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let env = env_logger::Env::default().default_filter_or(level.as_str());
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}
