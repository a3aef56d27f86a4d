use std::path::{Component, Path};

/// Approximates a token count as the number of whitespace-separated words.
///
/// Whitespace is space, tab, newline, carriage return, form feed and vertical
/// tab. This is not a subword tokenizer; treat the result as a rough size.
pub fn estimate_tokens(text: &str) -> usize {
    text.split(is_token_separator)
        .filter(|word| !word.is_empty())
        .count()
}

fn is_token_separator(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c')
}

/// Joins the normal components of `path` with `/`, whatever the host separator.
pub fn to_slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
