//! Corpus input
//!
//! This module provides the [`SourceProvider`] seam through which the engine
//! receives `(path, content)` pairs, plus two implementations:
//!
//! - **LocalProvider**: a directory on disk, walked with `ignore`
//! - **MemoryProvider**: caller-supplied pairs, kept in insertion order
//!
//! # Example
//!
//! ```ignore
//! use archlens::indexing::{LocalProvider, SourceProvider};
//!
//! let provider = LocalProvider::new("src/main/java", Config::default());
//! let files = provider.list_files().await?;
//! println!("{} files in {}", files.len(), provider.describe());
//! ```

mod files;
mod provider;

pub use files::{collect_files, should_skip_dir};
pub use provider::{LocalProvider, MemoryProvider, SourceProvider};
