//! Top-level application configuration.
//!
//! Configuration is stored in `.nyimbo/config.yaml` and includes:
//! - Which document store backs the catalog (local file or HTTP)
//! - Where local data and uploaded files live
//! - The acting user id
//!
//! `NYIMBO_USER` and `NYIMBO_STORE_URL` override the file.

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{NyimboError, Result};
use crate::types::NYIMBO_DIR;

pub const USER_ENV: &str = "NYIMBO_USER";
pub const STORE_URL_ENV: &str = "NYIMBO_STORE_URL";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Document store backend
    #[serde(default)]
    pub store: StoreKind,

    /// Directory for the local catalog file and uploaded objects
    /// (default: `.nyimbo/data`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// HTTP document store settings
    #[serde(default, skip_serializing_if = "HttpConfig::is_default")]
    pub http: HttpConfig,

    /// Acting user id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

/// Supported document store backends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    File,
    Http,
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKind::File => write!(f, "file"),
            StoreKind::Http => write!(f, "http"),
        }
    }
}

impl FromStr for StoreKind {
    type Err = NyimboError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "file" => Ok(StoreKind::File),
            "http" => Ok(StoreKind::Http),
            _ => Err(NyimboError::Config(format!(
                "unknown store '{s}', expected 'file' or 'http'"
            ))),
        }
    }
}

/// HTTP document store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_http_timeout")]
    pub timeout: u64,
}

fn default_http_timeout() -> u64 {
    30
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: default_http_timeout(),
        }
    }
}

impl HttpConfig {
    /// Check if this config is the default (for serialization skip)
    pub fn is_default(&self) -> bool {
        self.base_url.is_none() && self.timeout == default_http_timeout()
    }
}

/// Keys accepted by `config get` and `config set`
pub const CONFIG_KEYS: &[&str] = &["store", "data_dir", "http.base_url", "http.timeout", "user"];

impl Config {
    /// Get the path to the config file under `root`
    pub fn config_path(root: &Path) -> PathBuf {
        root.join(NYIMBO_DIR).join("config.yaml")
    }

    /// Load configuration from file, or return default if not found
    pub fn load(root: &Path) -> Result<Self> {
        let path = Self::config_path(root);
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path)?;
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        let config: Config = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, root: &Path) -> Result<()> {
        let path = Self::config_path(root);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Resolve the data directory against `root`
    pub fn data_dir(&self, root: &Path) -> PathBuf {
        match &self.data_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => root.join(dir),
            None => root.join(NYIMBO_DIR).join("data"),
        }
    }

    /// Acting user from environment variable or config
    pub fn user_id(&self) -> Option<String> {
        if let Ok(user) = env::var(USER_ENV)
            && !user.is_empty()
        {
            return Some(user);
        }

        self.user.clone().filter(|u| !u.is_empty())
    }

    /// HTTP store URL from environment variable or config
    pub fn store_url(&self) -> Option<String> {
        if let Ok(url) = env::var(STORE_URL_ENV)
            && !url.is_empty()
        {
            return Some(url);
        }

        self.http.base_url.clone()
    }

    /// Read a value by dotted key, as stored in the file
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = match key {
            "store" => Some(self.store.to_string()),
            "data_dir" => self.data_dir.as_ref().map(|d| d.display().to_string()),
            "http.base_url" => self.http.base_url.clone(),
            "http.timeout" => Some(self.http.timeout.to_string()),
            "user" => self.user.clone(),
            _ => return Err(unknown_key(key)),
        };
        Ok(value)
    }

    /// Set a value by dotted key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "store" => self.store = value.parse()?,
            "data_dir" => self.data_dir = Some(PathBuf::from(value)),
            "http.base_url" => self.http.base_url = Some(value.to_string()),
            "http.timeout" => {
                self.http.timeout = value.parse().map_err(|_| {
                    NyimboError::Config(format!(
                        "invalid value '{value}' for http.timeout. Expected seconds as an integer"
                    ))
                })?;
            }
            "user" => self.user = Some(value.to_string()),
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }
}

fn unknown_key(key: &str) -> NyimboError {
    NyimboError::Config(format!(
        "unknown config key '{key}'. Valid keys: {}",
        CONFIG_KEYS.join(", ")
    ))
}
