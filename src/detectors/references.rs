//! Efferent reference scanning
//!
//! A broad, over-inclusive heuristic: any capitalized identifier that appears
//! in an instantiation, a static-style access, a declaration, a parameter
//! list or before a method name counts as a reference, provided it names a
//! corpus entity. The result overlaps freely with the structural relations;
//! the diagram emitter sorts out precedence.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeSet, HashSet};

use super::TYPE_ARGS_PATTERN;

/// `new Type`
static INSTANTIATION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bnew\s+([A-Z][\w$]*)").unwrap());

/// `Type.member`
static STATIC_ACCESS_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([A-Z][\w$]*)\s*\.\s*[A-Za-z_$]").unwrap());

/// `Type name;`, `Type name =`, and parameters `Type name,` / `Type name)`.
/// The type may carry type arguments: `Repository<Customer> repo;`
static DECLARATION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\b([A-Z][\w$]*)(?:\s*{})?\s+[a-z_$][\w$]*\s*[;=,):]",
        TYPE_ARGS_PATTERN
    ))
    .unwrap()
});

/// `Type method(` - a return type in front of a method name
static RETURN_TYPE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\b([A-Z][\w$]*)(?:\s*{})?\s+[a-z_$][\w$]*\s*\(",
        TYPE_ARGS_PATTERN
    ))
    .unwrap()
});

static REFERENCE_PATTERNS: Lazy<[&'static Regex; 4]> = Lazy::new(|| {
    [
        &*INSTANTIATION_REGEX,
        &*STATIC_ACCESS_REGEX,
        &*DECLARATION_REGEX,
        &*RETURN_TYPE_REGEX,
    ]
});

/// Corpus entities referenced by normalized text, excluding `own_name`
pub fn scan_references(
    normalized: &str,
    own_name: &str,
    known: &HashSet<String>,
) -> BTreeSet<String> {
    let mut references = BTreeSet::new();

    for regex in REFERENCE_PATTERNS.iter() {
        for caps in regex.captures_iter(normalized) {
            let Some(name) = caps.get(1).map(|m| m.as_str()) else {
                continue;
            };
            if name != own_name && known.contains(name) {
                references.insert(name.to_string());
            }
        }
    }

    references
}
