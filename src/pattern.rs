//! Glob-style ignore pattern matching.
//!
//! Patterns support two wildcards:
//!
//! - `**` matches any run of characters, including `/`
//! - `*` matches any run of characters except `/`
//!
//! Every other character is matched literally. A pattern must match the whole
//! path, and matching is case-insensitive. There is no negation (`!`) and no
//! anchoring beyond what the ignore file parser adds for trailing slashes.

use log::debug;
use regex::{Regex, RegexBuilder};

/// A compiled ignore pattern.
#[derive(Debug, Clone)]
pub struct IgnorePattern {
    source: String,
    regex: Option<Regex>,
}

impl IgnorePattern {
    /// Compiles a pattern. Never fails: if the generated expression cannot be
    /// built, the pattern falls back to substring containment.
    pub fn compile(pattern: &str) -> Self {
        let regex = match RegexBuilder::new(&glob_to_regex(pattern))
            .case_insensitive(true)
            .build()
        {
            Ok(re) => Some(re),
            Err(err) => {
                debug!("Pattern '{pattern}' did not compile ({err}), using substring match");
                None
            }
        };

        Self {
            source: pattern.to_string(),
            regex,
        }
    }

    /// The pattern as it was written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, path: &str) -> bool {
        match &self.regex {
            Some(re) => re.is_match(path),
            None => path.contains(&self.source),
        }
    }
}

/// Returns true if `path` matches the glob `pattern`.
///
/// Convenience wrapper that compiles the pattern on every call; use
/// [`IgnorePattern`] when matching many paths.
pub fn matches(path: &str, pattern: &str) -> bool {
    IgnorePattern::compile(pattern).is_match(path)
}

/// Translates a glob into an anchored regular expression in one left-to-right pass.
fn glob_to_regex(pattern: &str) -> String {
    let mut re = String::with_capacity(pattern.len() * 2 + 2);
    re.push('^');

    let mut chars = pattern.chars().peekable();
    let mut buf = [0u8; 4];
    while let Some(c) = chars.next() {
        if c == '*' {
            if chars.peek() == Some(&'*') {
                chars.next();
                re.push_str(".*");
            } else {
                re.push_str("[^/]*");
            }
        } else {
            re.push_str(&regex::escape(c.encode_utf8(&mut buf)));
        }
    }

    re.push('$');
    re
}
