//! Configuration management for airport-search

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// Default page size of the airport list
pub const DEFAULT_PAGE_SIZE: usize = 6;

/// Default durable storage quota (mirrors the usual browser allowance)
pub const DEFAULT_STORAGE_QUOTA: usize = 5 * 1024 * 1024;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Upstream airports API base URL (e.g. `https://api.aviationstack.com/v1`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,

    /// Upstream access credential
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,

    /// Inbound HTTP server settings
    #[serde(default)]
    pub server: ServerSettings,

    /// Client-side store settings
    #[serde(default)]
    pub client: ClientSettings,
}

/// Inbound HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Socket address to bind
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Client-side store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSettings {
    /// Base URL of the inbound airports endpoint. When unset the CLI goes upstream directly.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Airports per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Byte quota of the durable client storage
    #[serde(default = "default_storage_quota")]
    pub storage_quota_bytes: usize,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_storage_quota() -> usize {
    DEFAULT_STORAGE_QUOTA
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_url: None,
            page_size: default_page_size(),
            storage_quota_bytes: default_storage_quota(),
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".airport-search").join("config.yaml"))
    }

    /// Load configuration from a specific path
    pub fn load_from(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()).into());
        }

        let contents = std::fs::read_to_string(&path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;

        if config.client.page_size == 0 {
            return Err(ConfigError::Invalid("client.page_size must be at least 1".to_string()).into());
        }

        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file does not exist.
    ///
    /// An explicit `path` that is missing is still an error.
    pub fn load_at(path: Option<&str>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from(PathBuf::from(p)),
            None => {
                let default = Self::default_path()?;
                if default.exists() {
                    Self::load_from(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents =
            serde_yaml::to_string(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;

        std::fs::write(&path, contents)?;

        // The file holds the access key
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(&path, perms)?;
        }

        Ok(())
    }

    /// Apply command-line / environment overrides on top of the file values.
    pub fn apply_overrides(&mut self, base_url: Option<&str>, access_key: Option<&str>) {
        if let Some(url) = base_url {
            self.api_base_url = Some(url.to_string());
        }
        if let Some(key) = access_key {
            self.access_key = Some(key.to_string());
        }
    }
}
