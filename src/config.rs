//! Application configuration.
//!
//! Resolution order, later wins: built-in defaults, the JSON config file,
//! the `SHADOW_REALM_API_URL` environment variable, command-line flags.

use crate::api::StatusPolicy;
use crate::consts::dash_consts::{
    API_URL_ENV_VAR, CONFIG_DIR, CONFIG_FILE, DEFAULT_API_URL, refresh,
};
use crate::environment::Environment;
use crate::workers::core::RefreshConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{fs, io};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid config file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Could not determine the home directory")]
    NoHomeDir,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub refresh_interval_secs: u64,
    pub fetch_limit: u32,
    pub status_policy: StatusPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            refresh_interval_secs: refresh::INTERVAL_MS / 1000,
            fetch_limit: refresh::FETCH_LIMIT,
            status_policy: StatusPolicy::default(),
        }
    }
}

/// Values given on the command line; `None` keeps the lower layer.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_url: Option<String>,
    pub interval_secs: Option<u64>,
    pub fetch_limit: Option<u32>,
    pub status_policy: Option<StatusPolicy>,
}

impl Config {
    /// Loads configuration from a JSON file at the given path.
    ///
    /// Keys missing from the file keep their default values.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let buf = fs::read(path)?;
        Ok(serde_json::from_slice(&buf)?)
    }

    /// Like [`Config::load_from_file`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match Self::load_from_file(path) {
            Err(ConfigError::Io(e)) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            other => other,
        }
    }

    /// Saves the configuration to a JSON file at the given path.
    ///
    /// Directories will be created if they don't exist. This method overwrites existing files.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Applies the backend override from the environment, if set.
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_url) = lookup(API_URL_ENV_VAR).filter(|v| !v.trim().is_empty()) {
            self.api_url = api_url;
        }
        self
    }

    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(api_url) = overrides.api_url {
            self.api_url = api_url;
        }
        if let Some(secs) = overrides.interval_secs {
            self.refresh_interval_secs = secs;
        }
        if let Some(limit) = overrides.fetch_limit {
            self.fetch_limit = limit;
        }
        if let Some(policy) = overrides.status_policy {
            self.status_policy = policy;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.environment()?;
        if self.refresh_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "refresh interval must be at least 1 second".to_string(),
            ));
        }
        if !(1..=refresh::MAX_FETCH_LIMIT).contains(&self.fetch_limit) {
            return Err(ConfigError::Invalid(format!(
                "fetch limit must be between 1 and {}, got {}",
                refresh::MAX_FETCH_LIMIT,
                self.fetch_limit
            )));
        }
        Ok(())
    }

    pub fn environment(&self) -> Result<Environment, ConfigError> {
        self.api_url.parse().map_err(ConfigError::Invalid)
    }

    pub fn refresh_config(&self) -> RefreshConfig {
        RefreshConfig::new(
            Duration::from_secs(self.refresh_interval_secs),
            self.fetch_limit,
        )
    }
}

/// Default config file location, `~/.shadow-realm/config.json`.
pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let home = home::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Full resolution: file (or defaults), environment, then flags.
pub fn resolve(path: &Path, overrides: ConfigOverrides) -> Result<Config, ConfigError> {
    let config = Config::load_or_default(path)?
        .with_env(|key| std::env::var(key).ok())
        .with_overrides(overrides);
    config.validate()?;
    Ok(config)
}
