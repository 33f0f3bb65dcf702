//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::classify::FileClassifier;
use crate::core::{Error, Result};

/// Default config file looked up in the working directory.
pub const CONFIG_FILE: &str = "refminer.toml";

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the local repository copies.
    pub repos_dir: PathBuf,
    /// Base URL that `<owner>/<name>` identifiers are appended to.
    pub remote_base_url: String,
    /// Source extensions for the test file heuristics.
    pub source_extensions: Vec<String>,
    /// Report output configuration.
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repos_dir: PathBuf::from("repos"),
            remote_base_url: "https://github.com".to_string(),
            source_extensions: vec!["java".to_string()],
            output: OutputConfig::default(),
        }
    }
}

/// Report output configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for the commit reports.
    pub dir: PathBuf,
    /// Directory for error lists.
    pub error_dir: PathBuf,
    /// Persist walk failures next to the repository error list.
    pub walk_errors: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
            error_dir: PathBuf::from("error"),
            walk_errors: false,
        }
    }
}

impl Config {
    /// Load configuration from an explicit file path.
    ///
    /// Errors if the file does not exist. Env vars with `REFMINER_` prefix
    /// override file values.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        Self::extract(Figment::from(Serialized::defaults(Self::default())).merge(Toml::file_exact(path)))
    }

    /// Load `refminer.toml` from a directory if present, defaults otherwise.
    pub fn load_default(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        Self::extract(
            Figment::from(Serialized::defaults(Self::default()))
                .merge(Toml::file(dir.join(CONFIG_FILE))),
        )
    }

    fn extract(figment: Figment) -> Result<Self> {
        let config: Self = figment
            .merge(Env::prefixed("REFMINER_").split("__"))
            .extract()
            .map_err(|e| Error::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.source_extensions.iter().all(|ext| ext.trim_start_matches('.').is_empty()) {
            return Err(Error::config("source_extensions must name at least one extension"));
        }
        if self.remote_base_url.trim().is_empty() {
            return Err(Error::config("remote_base_url must not be empty"));
        }
        Ok(())
    }

    /// File heuristics for the configured extensions.
    pub fn file_classifier(&self) -> FileClassifier {
        FileClassifier::new(&self.source_extensions)
    }

    /// Create default config file content.
    pub fn default_toml() -> &'static str {
        include_str!("default_config.toml")
    }
}
