//! Assembles the ignore pattern list for a repository.

use log::{debug, warn};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the prompt-specific ignore file looked up at the repository root.
pub const CUSTOM_IGNORE_FILE: &str = ".gptignore";

/// Name of the repository's own ignore file.
pub const REPO_IGNORE_FILE: &str = ".gitignore";

/// Patterns that apply to every scan: the version-control directory and the
/// ignore files themselves.
pub const BUILTIN_PATTERNS: [&str; 3] = [".git/**", REPO_IGNORE_FILE, CUSTOM_IGNORE_FILE];

/// Builds the deduplicated ignore pattern list for `repo_root`.
///
/// The custom ignore file (`explicit_ignore_file`, or `.gptignore` at the root
/// when none is given) replaces `.gitignore` entirely when it exists. Only when
/// it is absent, and `use_gitignore` is set, are `.gitignore` patterns folded in.
/// The two sources are never merged.
///
/// The result is sorted, but callers should treat it as an unordered set.
pub fn build_ignore_patterns(
    repo_root: &Path,
    explicit_ignore_file: Option<&PathBuf>,
    use_gitignore: bool,
) -> Vec<String> {
    let mut patterns: BTreeSet<String> = BUILTIN_PATTERNS.iter().map(|p| p.to_string()).collect();

    let custom = match explicit_ignore_file {
        Some(path) => {
            if !path.exists() {
                warn!("Ignore file not found: {}", path.display());
            }
            path.clone()
        }
        None => repo_root.join(CUSTOM_IGNORE_FILE),
    };

    if custom.exists() {
        debug!("Using ignore file {}", custom.display());
        patterns.extend(parse_ignore_file(&custom));
    } else if use_gitignore {
        let gitignore = repo_root.join(REPO_IGNORE_FILE);
        if gitignore.exists() {
            debug!("Using {}", gitignore.display());
            patterns.extend(parse_ignore_file(&gitignore));
        }
    }

    patterns.into_iter().collect()
}

/// Reads patterns from an ignore file. An unreadable file yields no patterns.
pub fn parse_ignore_file(path: &Path) -> Vec<String> {
    match fs::read(path) {
        Ok(bytes) => parse_patterns(&String::from_utf8_lossy(&bytes)),
        Err(err) => {
            warn!("Could not read ignore file {}: {err}", path.display());
            Vec::new()
        }
    }
}

/// Parses ignore file contents.
///
/// Trailing whitespace is stripped, blank lines and `#` comments are skipped,
/// and a trailing `/` becomes `/**` so the directory's contents match.
pub fn parse_patterns(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| {
            if line.ends_with('/') {
                format!("{line}**")
            } else {
                line.to_string()
            }
        })
        .collect()
}
