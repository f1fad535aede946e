//! Client configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::http::DEFAULT_TIMEOUT_SECS;

pub const DEFAULT_BASE_URL: &str =
    "https://edusync-webapp-g3esaqdqhygjckbq.centralindia-01.azurewebsites.net/api";

/// Top-level edusync configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdusyncConfig {
    /// Base URL of the LMS REST API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Directory for the session file and result history.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Result history file (default: `<data_dir>/results.json`).
    #[serde(default)]
    pub history_file: Option<PathBuf>,
    /// Session file (default: `<data_dir>/session.json`).
    #[serde(default)]
    pub session_file: Option<PathBuf>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_data_dir() -> PathBuf {
    dirs_path().unwrap_or_else(|| PathBuf::from(".edusync"))
}

impl Default for EdusyncConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            data_dir: default_data_dir(),
            history_file: None,
            session_file: None,
        }
    }
}

impl EdusyncConfig {
    pub fn history_path(&self) -> PathBuf {
        self.history_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join("results.json"))
    }

    pub fn session_path(&self) -> PathBuf {
        self.session_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join("session.json"))
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not scanned again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `edusync.toml` in the current directory
/// 2. `~/.config/edusync/config.toml`
///
/// Environment variable overrides: `EDUSYNC_BASE_URL`, `EDUSYNC_DATA_DIR`.
pub fn load_config() -> Result<EdusyncConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<EdusyncConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("edusync.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<EdusyncConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "config loaded");
            config
        }
        None => EdusyncConfig::default(),
    };

    // Apply env var overrides
    if let Ok(url) = std::env::var("EDUSYNC_BASE_URL") {
        config.base_url = url;
    }
    if let Ok(dir) = std::env::var("EDUSYNC_DATA_DIR") {
        config.data_dir = PathBuf::from(dir);
    }

    config.base_url = resolve_env_vars(&config.base_url);
    config.data_dir = resolve_path(&config.data_dir);
    config.history_file = config.history_file.as_deref().map(resolve_path);
    config.session_file = config.session_file.as_deref().map(resolve_path);

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("edusync"))
}
