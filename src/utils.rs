//! Path and string helpers
//!
//! Corpus paths are provider-relative and always use `/` as the separator,
//! regardless of host platform.

/// Entity name for a corpus path: the trailing component with its extension
/// stripped (`src/shop/Order.java` -> `Order`).
pub fn entity_name_from_path(path: &str) -> &str {
    let file_name = file_name_of(path);
    match file_name.rfind('.') {
        Some(0) | None => file_name,
        Some(dot) => &file_name[..dot],
    }
}

/// Trailing path component (`src/shop/Order.java` -> `Order.java`)
pub fn file_name_of(path: &str) -> &str {
    match path.rfind('/') {
        Some(sep) => &path[sep + 1..],
        None => path,
    }
}

/// Folder of a corpus path, everything before the last separator.
///
/// Top-level files live in the empty folder.
pub fn folder_of(path: &str) -> &str {
    match path.rfind('/') {
        Some(sep) => &path[..sep],
        None => "",
    }
}

/// Whether `path` sits directly inside `folder` (no deeper separator).
pub fn is_direct_child(path: &str, folder: &str) -> bool {
    if folder.is_empty() {
        return !path.contains('/');
    }
    match path.strip_prefix(folder).and_then(|rest| rest.strip_prefix('/')) {
        Some(rest) => !rest.is_empty() && !rest.contains('/'),
        None => false,
    }
}

/// Truncate to at most `max_bytes`, backing off to a UTF-8 char boundary.
pub fn truncate_to_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Fit a name into a fixed-width report column, marking truncation with "...".
pub fn fit_column(s: &str, width: usize) -> String {
    if s.len() <= width {
        s.to_string()
    } else {
        format!(
            "{}...",
            truncate_to_char_boundary(s, width.saturating_sub(3))
        )
    }
}
