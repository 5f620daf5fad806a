//! Error types for archlens
//!
//! Only corpus-level failures are errors. Lexical recognition never fails:
//! unexpected input simply produces empty matches.

use std::process::ExitCode;
use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, ArchlensError>;

#[derive(Debug, Error)]
pub enum ArchlensError {
    /// Missing or invalid configuration; fatal for the current run only
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// The source provider could not list the corpus; aborts the run
    #[error("provider error: {message}")]
    Provider { message: String },

    /// A single file could not be fetched or decoded; the run skips it
    #[error("cannot read {path}: {message}")]
    SourceFile { path: String, message: String },

    /// The run was superseded by a newer request or an explicit clear
    #[error("analysis cancelled")]
    Cancelled,

    /// Results were requested before the analysis published them
    #[error("analysis results are not ready")]
    NotReady,

    #[error("serialization failed: {message}")]
    Serialization { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ArchlensError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Configuration { .. } => ExitCode::from(2),
            Self::Provider { .. } | Self::SourceFile { .. } => ExitCode::from(3),
            Self::Cancelled | Self::NotReady => ExitCode::from(4),
            Self::Serialization { .. } | Self::Io(_) => ExitCode::from(1),
        }
    }

    /// Whether this error aborts a whole corpus run.
    ///
    /// Per-file failures are skipped and counted instead.
    pub fn is_fatal_for_run(&self) -> bool {
        !matches!(self, Self::SourceFile { .. })
    }
}

impl From<serde_json::Error> for ArchlensError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization {
            message: e.to_string(),
        }
    }
}
