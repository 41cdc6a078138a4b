//! Configuration schema and loading.
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$FDASH_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/feature-dashboard/config.toml`
//! 3. `~/.feature-dashboard/config.toml`
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides
//! earlier):
//! 1. Default values
//! 2. Config file
//! 3. Environment (`GITHUB_TOKEN` for the token)
//! 4. CLI flags (not handled here)

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },
}

/// Dashboard configuration.
///
/// Every field is optional; the CLI supplies its own defaults and flags
/// override anything loaded here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// GitHub API token. `GITHUB_TOKEN` in the environment wins.
    pub token: Option<String>,
    /// Default repositories to query, as `owner/name`.
    #[serde(default)]
    pub repos: Vec<String>,
    /// Default labels every queried issue must carry.
    #[serde(default)]
    pub labels: Vec<String>,
    /// Default grouping dimensions for `fdash plan`.
    #[serde(default)]
    pub dimensions: Vec<String>,
    /// API base URL override (GitHub Enterprise).
    pub api_base: Option<String>,
}

impl Config {
    /// Load configuration from standard locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed.
    /// A missing config file is not an error (defaults are used).
    pub fn load() -> Result<Config, ConfigError> {
        for path in Self::search_paths() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }
        Ok(Config::default())
    }

    /// Read and parse a specific config file.
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Candidate config file paths, highest priority first.
    fn search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Ok(path) = std::env::var("FDASH_CONFIG") {
            paths.push(PathBuf::from(path));
        }
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("feature-dashboard/config.toml"));
        }
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".feature-dashboard/config.toml"));
        }
        paths
    }

    /// Resolve the API token: `GITHUB_TOKEN` in the environment wins,
    /// then the config file.
    pub fn resolve_token(&self) -> Option<String> {
        std::env::var("GITHUB_TOKEN")
            .ok()
            .filter(|t| !t.is_empty())
            .or_else(|| self.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_from_parses_all_fields() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            r#"
            token = "ghp_example"
            repos = ["example-org/app", "example-org/server"]
            labels = ["feature:reactions"]
            dimensions = ["phase", "repo"]
            "#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.token.as_deref(), Some("ghp_example"));
        assert_eq!(config.repos.len(), 2);
        assert_eq!(config.labels, vec!["feature:reactions"]);
        assert_eq!(config.dimensions, vec!["phase", "repo"]);
        assert!(config.api_base.is_none());
    }

    #[test]
    fn load_from_missing_file_errors() {
        let temp = TempDir::new().unwrap();
        let result = Config::load_from(&temp.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }

    #[test]
    fn unknown_fields_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "unknown_field = true").unwrap();

        let result = Config::load_from(&path);
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn resolve_token_falls_back_to_file() {
        std::env::remove_var("GITHUB_TOKEN");
        let config = Config {
            token: Some("from-file".to_string()),
            ..Default::default()
        };
        assert_eq!(config.resolve_token().as_deref(), Some("from-file"));
    }
}
