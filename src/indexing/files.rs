//! File collection for local corpora
//!
//! Walks a directory with the `ignore` crate (hidden entries and gitignored
//! paths excluded), prunes configured directory names and keeps files with
//! the configured extension.

use ignore::WalkBuilder;
use std::path::Path;
use tracing::debug;

use crate::config::Config;
use crate::error::{ArchlensError, Result};

/// Collect corpus-relative, `/`-separated paths of every source file under
/// `root`, sorted by path.
pub fn collect_files(root: &Path, config: &Config) -> Result<Vec<String>> {
    if !root.is_dir() {
        return Err(ArchlensError::Provider {
            message: format!("{} is not a directory", root.display()),
        });
    }

    let extension = config.normalized_extension().to_string();
    let skip_dirs = config.skip_dirs.clone();

    let walker = WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .git_exclude(true)
        .max_depth(Some(config.max_depth))
        .filter_entry(move |entry| {
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            entry.depth() == 0 || !is_dir || !should_skip_dir(entry.path(), &skip_dirs)
        })
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!(target: "archlens::indexing", error = %e, "Skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }

        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(extension.as_str()) {
            continue;
        }

        if let Some(relative) = relative_path(root, path) {
            files.push(relative);
        }
    }

    files.sort();
    debug!(target: "archlens::indexing", root = %root.display(), files = files.len(), "Collected files");
    Ok(files)
}

/// Whether a directory is pruned from the walk
pub fn should_skip_dir(path: &Path, skip_dirs: &[String]) -> bool {
    match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name.starts_with('.') || skip_dirs.iter().any(|d| d == name),
        None => false,
    }
}

/// `path` relative to `root`, joined with `/` on every platform
fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}
