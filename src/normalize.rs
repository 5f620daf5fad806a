//! Text normalization
//!
//! Strips comments and literals so that keyword and type patterns only see
//! code, and derives the declaration view of a type body: everything nested
//! deeper than the member level is dropped, so statements inside method
//! bodies never look like field declarations.

use once_cell::sync::Lazy;
use regex::Regex;

/// Default brace depth kept by [`declaration_view`]: the type body itself
pub const DEFAULT_DECLARATION_DEPTH: usize = 1;

/// Line comments, block comments, string literals and char literals.
///
/// A single alternation so the leftmost construct wins: `"http://x"` is a
/// string, not a comment, and `// "quoted"` is a comment.
static NOISE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)//[^\n]*|/\*.*?\*/|"(?:\\.|[^"\\\n])*"|'(?:\\.|[^'\\\n])*'"#).unwrap()
});

/// Remove comments and string/char literals. Removed text is replaced by
/// nothing, so byte offsets are not preserved.
pub fn strip_comments_and_strings(source: &str) -> String {
    NOISE_REGEX.replace_all(source, "").into_owned()
}

/// Declaration view at the default depth
pub fn declaration_view(normalized: &str) -> String {
    declaration_view_at(normalized, DEFAULT_DECLARATION_DEPTH)
}

/// Keep every character whose brace depth is at most `max_depth`.
///
/// An opening brace belongs to the depth it opens and a closing brace to the
/// depth it closes, so with `max_depth = 1` the class body braces survive and
/// method body braces do not. Text without any block yields an empty view.
pub fn declaration_view_at(normalized: &str, max_depth: usize) -> String {
    if !normalized.contains('{') {
        return String::new();
    }

    let mut view = String::with_capacity(normalized.len());
    let mut depth = 0usize;

    for c in normalized.chars() {
        match c {
            '{' => {
                depth += 1;
                if depth <= max_depth {
                    view.push(c);
                }
            }
            '}' => {
                if depth <= max_depth {
                    view.push(c);
                }
                depth = depth.saturating_sub(1);
            }
            _ => {
                if depth <= max_depth {
                    view.push(c);
                }
            }
        }
    }

    view
}

/// Non-blank lines of raw text
pub fn count_non_blank_lines(source: &str) -> usize {
    source.lines().filter(|line| !line.trim().is_empty()).count()
}
