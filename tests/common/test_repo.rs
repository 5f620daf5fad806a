//! Temporary source trees on disk

use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A temporary directory populated with source files
pub struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    /// Write `content` at `rel`, creating parent directories
    pub fn with_file(self, rel: &str, content: &str) -> Self {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(&path, content).expect("write fixture file");
        self
    }

    /// Write raw bytes, for undecodable files
    pub fn with_bytes(self, rel: &str, bytes: &[u8]) -> Self {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(&path, bytes).expect("write fixture file");
        self
    }

    /// Populate with every `(path, content)` pair
    pub fn with_files(mut self, files: &[(&str, &str)]) -> Self {
        for (rel, content) in files {
            self = self.with_file(rel, content);
        }
        self
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}
