use crate::error::{Git2PromptError, Result};
use crate::pattern::IgnorePattern;
use crate::utils::to_slash_path;
use ignore::WalkBuilder;
use log::{debug, warn};
use std::fs;
use std::path::Path;

/// A file collected from the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Path relative to the repository root, `/`-separated.
    pub relative_path: String,
    pub content: String,
}

impl FileRecord {
    pub fn new(relative_path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
            content: content.into(),
        }
    }
}

/// Recursively collects every file under `repo_root` whose relative path
/// matches none of `ignore_patterns`.
///
/// Files come back in traversal order, which is not sorted. A file that cannot
/// be read is skipped with a warning. Any error raised by the walk itself
/// aborts the scan and discards what was collected so far.
pub fn scan_repository(repo_root: &Path, ignore_patterns: &[String]) -> Result<Vec<FileRecord>> {
    if !repo_root.exists() {
        return Err(Git2PromptError::RepoNotFound(repo_root.to_path_buf()));
    }
    if !repo_root.is_dir() {
        return Err(Git2PromptError::NotADirectory(repo_root.to_path_buf()));
    }

    let patterns: Vec<IgnorePattern> = ignore_patterns
        .iter()
        .map(|p| IgnorePattern::compile(p))
        .collect();

    // Only our own patterns decide what is skipped.
    let walker = WalkBuilder::new(repo_root)
        .standard_filters(false)
        .follow_links(false)
        .build();

    let mut files = Vec::new();

    for result in walker {
        let entry = result.map_err(|source| Git2PromptError::Traversal { source })?;
        let path = entry.path();

        if entry.depth() == 0 || !path.is_file() {
            continue;
        }

        let rel_path = to_slash_path(path.strip_prefix(repo_root).unwrap_or(path));

        if let Some(pattern) = patterns.iter().find(|p| p.is_match(&rel_path)) {
            debug!("Ignored file: {rel_path} (matched '{}')", pattern.as_str());
            continue;
        }

        match fs::read(path) {
            Ok(bytes) => {
                debug!("Collected file: {rel_path} ({} bytes)", bytes.len());
                let content = String::from_utf8_lossy(&bytes).into_owned();
                files.push(FileRecord::new(rel_path, content));
            }
            Err(err) => {
                warn!("Could not open file: {rel_path} ({err})");
            }
        }
    }

    Ok(files)
}
