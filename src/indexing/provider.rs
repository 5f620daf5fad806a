//! Source providers
//!
//! A provider hands the engine a list of corpus-relative paths and the text
//! of each one. Hosted repositories plug in by implementing [`SourceProvider`].

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::files::collect_files;
use crate::config::Config;
use crate::error::{ArchlensError, Result};

#[async_trait]
pub trait SourceProvider: Send + Sync {
    /// Human-readable name of the corpus source
    fn describe(&self) -> String;

    /// Corpus-relative, `/`-separated paths, already filtered to one extension
    async fn list_files(&self) -> Result<Vec<String>>;

    /// Text content of one listed path
    async fn fetch_file(&self, path: &str) -> Result<String>;
}

/// Files under a local directory
pub struct LocalProvider {
    root: PathBuf,
    config: Config,
}

impl LocalProvider {
    pub fn new(root: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl SourceProvider for LocalProvider {
    fn describe(&self) -> String {
        self.root.display().to_string()
    }

    async fn list_files(&self) -> Result<Vec<String>> {
        let root = self.root.clone();
        let config = self.config.clone();
        tokio::task::spawn_blocking(move || collect_files(&root, &config))
            .await
            .map_err(|e| ArchlensError::Provider {
                message: format!("file listing task failed: {}", e),
            })?
    }

    async fn fetch_file(&self, path: &str) -> Result<String> {
        let full = self.root.join(path);
        let bytes = tokio::fs::read(&full)
            .await
            .map_err(|e| ArchlensError::SourceFile {
                path: path.to_string(),
                message: e.to_string(),
            })?;
        String::from_utf8(bytes).map_err(|_| ArchlensError::SourceFile {
            path: path.to_string(),
            message: "not valid UTF-8".to_string(),
        })
    }
}

/// An in-memory corpus of `(path, content)` pairs, listed in insertion order
#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    name: String,
    files: Vec<(String, String)>,
}

impl MemoryProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            files: Vec::new(),
        }
    }

    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.push((path.into(), content.into()));
        self
    }

    pub fn from_pairs<I, P, C>(name: impl Into<String>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (P, C)>,
        P: Into<String>,
        C: Into<String>,
    {
        Self {
            name: name.into(),
            files: pairs
                .into_iter()
                .map(|(p, c)| (p.into(), c.into()))
                .collect(),
        }
    }
}

#[async_trait]
impl SourceProvider for MemoryProvider {
    fn describe(&self) -> String {
        self.name.clone()
    }

    async fn list_files(&self) -> Result<Vec<String>> {
        Ok(self.files.iter().map(|(p, _)| p.clone()).collect())
    }

    async fn fetch_file(&self, path: &str) -> Result<String> {
        self.files
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, c)| c.clone())
            .ok_or_else(|| ArchlensError::SourceFile {
                path: path.to_string(),
                message: "no such file".to_string(),
            })
    }
}
