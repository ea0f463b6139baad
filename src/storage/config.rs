//! User configuration for issue-draft
//!
//! Read from `$ISSUE_DRAFT_CONFIG` when set, otherwise from
//! `config.toml` in the platform config directory
//! (`~/.config/issue-draft/config.toml` on Linux). A missing file means
//! defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "ISSUE_DRAFT_CONFIG";

/// Program used when nothing else names one
pub const DEFAULT_PROGRAM: &str = "gh";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Output format preference
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FormatPreference {
    #[default]
    Text,
    Json,
}

/// External tool settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ToolConfig {
    /// Program invoked as `<program> issue create ...`
    pub program: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
        }
    }
}

/// Contents of `config.toml`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Used when `--format` is not given
    pub default_format: Option<FormatPreference>,

    pub tool: ToolConfig,

    /// File the values came from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Config {
    /// Location of the config file, if one can be determined
    pub fn config_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }

        ProjectDirs::from("dev", "issue-draft", "issue-draft")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Loads configuration from the default location
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Loads configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        let mut config = Self::parse(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        if config.tool.program.trim().is_empty() {
            return Err(ConfigError::Invalid("tool.program must not be empty".into()));
        }
        Ok(config)
    }

    /// Picks the tool program: explicit override, then config
    pub fn program<'a>(&'a self, cli_override: Option<&'a str>) -> &'a str {
        cli_override.unwrap_or(&self.tool.program)
    }
}
