//! Analysis configuration
//!
//! Resolution order: an explicit file, else `<config dir>/archlens/config.toml`
//! when it exists, else defaults; environment variables override the file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::detectors::DEFAULT_CONTAINER_TYPES;
use crate::error::{ArchlensError, Result};
use crate::normalize::DEFAULT_DECLARATION_DEPTH;

pub const ENV_EXTENSION: &str = "ARCHLENS_EXTENSION";
pub const ENV_PARALLEL: &str = "ARCHLENS_PARALLEL";
pub const ENV_DECLARATION_DEPTH: &str = "ARCHLENS_DECLARATION_DEPTH";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Source extension, without the dot
    pub extension: String,
    /// Directory names never descended into
    pub skip_dirs: Vec<String>,
    /// Maximum directory depth for local walks
    pub max_depth: usize,
    /// Brace depth kept by the declaration view
    pub declaration_depth: usize,
    /// Analyze files on the rayon pool
    pub parallel: bool,
    /// Generic container type names that signal aggregation
    pub container_types: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extension: "java".to_string(),
            skip_dirs: ["target", "build", "out", "node_modules", ".git"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_depth: 64,
            declaration_depth: DEFAULT_DECLARATION_DEPTH,
            parallel: false,
            container_types: DEFAULT_CONTAINER_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl Config {
    /// Load from `path`, or from the default location, then apply env
    /// overrides. Does not validate; call [`Config::validate`] before use.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        debug!(target: "archlens::config", path = %path.display(), "Loading config");
        let content = fs::read_to_string(path).map_err(|e| ArchlensError::Configuration {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ArchlensError::Configuration {
            message: format!("invalid config: {}", e),
        })
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(ext) = std::env::var(ENV_EXTENSION) {
            self.extension = ext;
        }
        if let Ok(value) = std::env::var(ENV_PARALLEL) {
            self.parallel = parse_bool(ENV_PARALLEL, &value)?;
        }
        if let Ok(value) = std::env::var(ENV_DECLARATION_DEPTH) {
            self.declaration_depth =
                value
                    .trim()
                    .parse()
                    .map_err(|_| ArchlensError::Configuration {
                        message: format!("{} must be a number, got {:?}", ENV_DECLARATION_DEPTH, value),
                    })?;
        }
        Ok(())
    }

    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        let ext = self.extension.trim_start_matches('.');
        if ext.is_empty() {
            return Err(ArchlensError::Configuration {
                message: "extension must not be empty".to_string(),
            });
        }
        if self.declaration_depth == 0 {
            return Err(ArchlensError::Configuration {
                message: "declaration_depth must be at least 1".to_string(),
            });
        }
        if self.container_types.is_empty() {
            return Err(ArchlensError::Configuration {
                message: "container_types must list at least one type".to_string(),
            });
        }
        Ok(())
    }

    /// Extension without a leading dot
    pub fn normalized_extension(&self) -> &str {
        self.extension.trim_start_matches('.')
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ArchlensError::Configuration {
            message: format!("{} must be a boolean, got {:?}", key, value),
        }),
    }
}

/// `<config dir>/archlens/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("archlens").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.normalized_extension(), "java");
        assert!(config.container_types.iter().any(|t| t == "List"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml("parallel = true\nextension = \".java\"\n").unwrap();
        assert!(config.parallel);
        assert_eq!(config.normalized_extension(), "java");
        assert_eq!(config.declaration_depth, DEFAULT_DECLARATION_DEPTH);
    }

    #[test]
    fn test_invalid_toml_is_configuration_error() {
        let err = Config::from_toml("parallel = \"maybe").unwrap_err();
        assert!(matches!(err, ArchlensError::Configuration { .. }));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.extension = ".".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.declaration_depth = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.container_types.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("K", "yes").unwrap());
        assert!(!parse_bool("K", " OFF ").unwrap());
        assert!(parse_bool("K", "perhaps").is_err());
    }

    #[test]
    fn test_load_missing_file_is_configuration_error() {
        let err = Config::load(Some(Path::new("/nonexistent/archlens.toml"))).unwrap_err();
        assert!(matches!(err, ArchlensError::Configuration { .. }));
    }
}
