use crate::error::{Git2PromptError, Result};
use crate::filewalker::FileRecord;
use crate::scrub::scrub_comments;
use crate::utils::estimate_tokens;
use log::{debug, info, warn};
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::{AsyncWriteExt, BufWriter};

#[cfg(feature = "json")]
use serde::Serialize;

/// Preamble used when no preamble file is given or it cannot be read.
pub const DEFAULT_PREAMBLE: &str = "The following text is a Git repository with code. \
Sections begin with '----', followed by the file path, then the file contents. \
The repository ends at '--END--'.\n";

/// Line that opens every file section in the text document.
pub const FILE_DELIMITER: &str = "----";

/// Last line of the text document.
pub const END_SENTINEL: &str = "--END--";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    #[cfg(feature = "json")]
    Json,
}

/// Options shared by both output variants.
#[derive(Debug, Clone, Default)]
pub struct FormatOptions {
    pub preamble_file: Option<PathBuf>,
    pub scrub_comments: bool,
    pub estimate_tokens: bool,
}

/// A rendered document and its approximate token count (0 when not requested).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatted {
    pub document: String,
    pub token_estimate: usize,
}

pub fn format_output(
    format: OutputFormat,
    files: &[FileRecord],
    options: &FormatOptions,
) -> Result<Formatted> {
    match format {
        OutputFormat::Text => Ok(format_text(files, options)),
        #[cfg(feature = "json")]
        OutputFormat::Json => format_json(files, options),
    }
}

/// Renders the plain-text variant:
///
/// ```text
/// <preamble>
/// ----
/// <path>
/// <content>
/// ...
/// --END--
/// ```
pub fn format_text(files: &[FileRecord], options: &FormatOptions) -> Formatted {
    let preamble = read_preamble(options.preamble_file.as_deref());

    let mut document = String::new();
    document.push_str(&preamble);
    document.push('\n');

    for file in files {
        debug!("Formatting {}", file.relative_path);
        document.push_str(FILE_DELIMITER);
        document.push('\n');
        document.push_str(&file.relative_path);
        document.push('\n');
        document.push_str(&file_content(file, options.scrub_comments));
        document.push('\n');
    }
    document.push_str(END_SENTINEL);

    let token_estimate = if options.estimate_tokens {
        estimate_tokens(&document)
    } else {
        0
    };

    Formatted {
        document,
        token_estimate,
    }
}

#[cfg(feature = "json")]
#[derive(Serialize)]
struct JsonDocument<'a> {
    preamble: &'a str,
    files: Vec<JsonFile<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    token_estimate: Option<usize>,
}

#[cfg(feature = "json")]
#[derive(Serialize)]
struct JsonFile<'a> {
    path: &'a str,
    content: Cow<'a, str>,
}

/// Renders the JSON variant with keys `preamble`, `files` and `token_estimate`.
///
/// The estimate is counted over the document rendered without the
/// `token_estimate` key, then the final object is rendered with it filled in.
#[cfg(feature = "json")]
pub fn format_json(files: &[FileRecord], options: &FormatOptions) -> Result<Formatted> {
    let preamble = read_preamble(options.preamble_file.as_deref());

    let mut doc = JsonDocument {
        preamble: &preamble,
        files: files
            .iter()
            .map(|file| JsonFile {
                path: &file.relative_path,
                content: file_content(file, options.scrub_comments),
            })
            .collect(),
        token_estimate: None,
    };

    let token_estimate = if options.estimate_tokens {
        estimate_tokens(&serde_json::to_string_pretty(&doc)?)
    } else {
        0
    };

    doc.token_estimate = Some(token_estimate);
    let document = serde_json::to_string_pretty(&doc)?;

    Ok(Formatted {
        document,
        token_estimate,
    })
}

/// Writes `document` to `path`, refusing to replace an existing file.
pub async fn write_output(path: &Path, document: &str) -> Result<()> {
    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
        .map_err(|source| {
            if source.kind() == std::io::ErrorKind::AlreadyExists {
                Git2PromptError::OutputExists(path.to_path_buf())
            } else {
                Git2PromptError::Write {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

    let to_write_error = |source| Git2PromptError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = BufWriter::new(file);
    writer
        .write_all(document.as_bytes())
        .await
        .map_err(to_write_error)?;
    writer.flush().await.map_err(to_write_error)?;

    info!("Wrote {} bytes to {}", document.len(), path.display());
    Ok(())
}

fn read_preamble(preamble_file: Option<&Path>) -> String {
    let Some(path) = preamble_file else {
        return DEFAULT_PREAMBLE.to_string();
    };

    match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            warn!("Could not read preamble file {}: {err}", path.display());
            DEFAULT_PREAMBLE.to_string()
        }
    }
}

fn file_content(file: &FileRecord, scrub: bool) -> Cow<'_, str> {
    if scrub {
        Cow::Owned(scrub_comments(&file.content))
    } else {
        Cow::Borrowed(&file.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_files() -> Vec<FileRecord> {
        vec![
            FileRecord::new("src/main.cpp", "int main() { return 0; }"),
            FileRecord::new("README.md", "# This is readme\nsome content"),
        ]
    }

    fn counting() -> FormatOptions {
        FormatOptions {
            estimate_tokens: true,
            ..FormatOptions::default()
        }
    }

    #[test]
    fn text_has_delimiters_and_sentinel() {
        let out = format_text(&sample_files(), &counting());
        assert!(out.document.starts_with(DEFAULT_PREAMBLE));
        assert!(out.document.contains("----\nsrc/main.cpp\nint main() { return 0; }\n"));
        assert!(out.document.ends_with("some content\n--END--"));
        assert!(out.token_estimate > 0);
        assert_eq!(out.token_estimate, estimate_tokens(&out.document));
    }

    #[test]
    fn text_keeps_input_order() {
        let out = format_text(&sample_files(), &FormatOptions::default());
        let main = out.document.find("src/main.cpp").unwrap();
        let readme = out.document.find("README.md").unwrap();
        assert!(main < readme);
    }

    #[test]
    fn text_without_estimate_counts_zero() {
        let out = format_text(&sample_files(), &FormatOptions::default());
        assert_eq!(out.token_estimate, 0);
    }

    #[test]
    fn text_with_no_files() {
        let out = format_text(&[], &FormatOptions::default());
        assert_eq!(out.document, format!("{DEFAULT_PREAMBLE}\n--END--"));
    }

    #[test]
    fn text_scrubs_when_asked() {
        let options = FormatOptions {
            scrub_comments: true,
            ..FormatOptions::default()
        };
        let out = format_text(&sample_files(), &options);
        assert!(!out.document.contains("# This is readme"));
        assert!(out.document.contains("some content"));
    }

    #[test]
    fn missing_preamble_file_uses_default() {
        let options = FormatOptions {
            preamble_file: Some(PathBuf::from("/definitely/not/here.txt")),
            ..FormatOptions::default()
        };
        let out = format_text(&[], &options);
        assert!(out.document.starts_with(DEFAULT_PREAMBLE));
    }

    #[test]
    fn custom_preamble_file_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let preamble = dir.path().join("preamble.txt");
        fs::write(&preamble, "Custom intro").unwrap();

        let options = FormatOptions {
            preamble_file: Some(preamble),
            ..FormatOptions::default()
        };
        let out = format_text(&[], &options);
        assert_eq!(out.document, "Custom intro\n--END--");
    }

    #[cfg(feature = "json")]
    #[test]
    fn json_has_all_keys_in_order() {
        let out = format_json(&sample_files(), &counting()).unwrap();
        let preamble = out.document.find("\"preamble\"").unwrap();
        let files = out.document.find("\"files\"").unwrap();
        let estimate = out.document.find("\"token_estimate\"").unwrap();
        assert!(preamble < files && files < estimate);
        assert!(out.token_estimate > 0);
    }

    #[cfg(feature = "json")]
    #[test]
    fn json_escapes_and_round_trips_content() {
        let files = vec![FileRecord::new("a \"quoted\".txt", "line1\nline2 \\ \"x\"")];
        let out = format_json(&files, &counting()).unwrap();

        let value: serde_json::Value = serde_json::from_str(&out.document).unwrap();
        assert_eq!(value["files"][0]["path"], "a \"quoted\".txt");
        assert_eq!(value["files"][0]["content"], "line1\nline2 \\ \"x\"");
        assert_eq!(value["token_estimate"], out.token_estimate);
    }

    #[cfg(feature = "json")]
    #[test]
    fn json_without_files_or_estimate() {
        let out = format_json(&[], &FormatOptions::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out.document).unwrap();
        assert_eq!(value["preamble"], DEFAULT_PREAMBLE);
        assert_eq!(value["files"].as_array().map(Vec::len), Some(0));
        assert_eq!(value["token_estimate"], 0);
        assert_eq!(out.token_estimate, 0);
    }

    #[cfg(feature = "json")]
    #[test]
    fn json_estimate_counts_document_without_the_count() {
        let files = sample_files();
        let out = format_json(&files, &counting()).unwrap();
        // The final render only adds the key and the number.
        let full = estimate_tokens(&out.document);
        assert_eq!(full, out.token_estimate + 2);
    }

    #[tokio::test]
    async fn write_output_refuses_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        fs::write(&path, "keep me").unwrap();

        let err = write_output(&path, "new").await.unwrap_err();
        assert!(matches!(err, Git2PromptError::OutputExists(_)));
        assert_eq!(fs::read_to_string(&path).unwrap(), "keep me");
    }

    #[tokio::test]
    async fn write_output_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");

        write_output(&path, "hello\n--END--").await.unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello\n--END--");
    }
}
