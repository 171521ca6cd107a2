//! Configuration management for pingtrail.
//!
//! Configuration is loaded from multiple sources with precedence:
//! 1. Environment variables (PINGTRAIL_*)
//! 2. Config file (PINGTRAIL_CONFIG, or the platform config dir)
//! 3. Default values

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Stored credentials
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL for the ping API
    #[serde(default = "default_api_url")]
    pub url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Code name to sign in with
    pub code_name: Option<String>,

    /// Password; prefer PINGTRAIL_PASSWORD over storing it here
    #[serde(skip_serializing)]
    pub password: Option<String>,
}

// Default value functions
fn default_api_url() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path())?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load from a specific file, falling back to defaults if absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path).context("Failed to read config file")?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    /// Apply PINGTRAIL_* overrides from `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("PINGTRAIL_API_URL") {
            self.api.url = url;
        }
        if let Some(code_name) = lookup("PINGTRAIL_CODE_NAME") {
            self.auth.code_name = Some(code_name);
        }
        if let Some(password) = lookup("PINGTRAIL_PASSWORD") {
            self.auth.password = Some(password);
        }
    }

    /// Save configuration to `path`. The password is never written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Store `code_name` in the file at `path`.
    ///
    /// Starts from the file alone so environment overrides are not written
    /// back.
    pub fn remember_code_name(path: &Path, code_name: &str) -> Result<()> {
        let mut stored = Self::load_from(path)?;
        stored.auth.code_name = Some(code_name.to_string());
        stored.save_to(path)
    }

    /// Get the config file path.
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("PINGTRAIL_CONFIG") {
            return PathBuf::from(path);
        }

        if let Some(proj_dirs) = ProjectDirs::from("dev", "pingtrail", "pingtrail") {
            proj_dirs.config_dir().join("config.toml")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".pingtrail")
                .join("config.toml")
        }
    }
}
