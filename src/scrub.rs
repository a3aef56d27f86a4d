//! Best-effort comment removal.
//!
//! This is a language-agnostic heuristic, not a parser. The line-start rule
//! drops anything that looks like a `#`, `--`, `;` or `%` comment, so it also
//! removes Markdown headings, shell directives, SQL-style lines and similar
//! legitimate content. Use it to shrink prompts, not to transform code safely.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

static BLOCK_COMMENTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)/\*.*?\*/|<!--.*?-->|//[^\n]*").expect("block comment regex is valid")
});

static LINE_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(#|--|;|%)+").expect("line comment regex is valid"));

/// Removes comment-like text from `content`.
///
/// First strips `/* ... */`, `<!-- ... -->` and `//` to end of line, then
/// drops whole lines that start with `#`, `--`, `;` or `%` after leading
/// whitespace. Every surviving line is terminated with `\n`.
///
/// The first step repeats until nothing matches, since removing one comment
/// can join the text around it into another (`/<!-- -->*`).
pub fn scrub_comments(content: &str) -> String {
    let mut stripped = content.to_string();
    loop {
        let next = match BLOCK_COMMENTS.replace_all(&stripped, "") {
            Cow::Borrowed(_) => break,
            Cow::Owned(next) => next,
        };
        stripped = next;
    }

    let mut out = String::with_capacity(stripped.len());
    for line in stripped.split_terminator('\n') {
        if LINE_COMMENT.is_match(line) {
            continue;
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}
