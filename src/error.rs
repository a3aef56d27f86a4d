//! Error types for the scan and output pipeline.
//!
//! Only fatal conditions are represented here. Unreadable individual files and
//! ignore patterns that fail to compile are handled where they occur and never
//! reach the caller.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Git2PromptError {
    #[error("Repository path does not exist: {}", .0.display())]
    RepoNotFound(PathBuf),

    #[error("Path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Failed to walk repository: {source}")]
    Traversal {
        #[source]
        source: ignore::Error,
    },

    #[error("Output file {} already exists. Aborting.", .0.display())]
    OutputExists(PathBuf),

    #[error("Failed to write output file: {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "json")]
    #[error("JSON serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Git2PromptError>;
