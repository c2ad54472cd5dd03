//! Configuration management for Leadbook.
//!
//! Handles loading configuration from a TOML file and environment variables.
//! The store URL and anon key may come from the config file, from
//! `SUPABASE_URL` / `SUPABASE_ANON_KEY`, or from CLI flags (highest
//! precedence, applied by the caller).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::{LeadbookError, Result};

/// Main configuration structure for Leadbook.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Remote store settings.
    #[serde(default)]
    pub store: StoreConfig,
}

/// Remote store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the hosted platform (e.g., `https://xyzcompany.supabase.co`).
    pub url: Option<String>,

    /// Publishable anon key used when no user session is present.
    pub anon_key: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: None,
            anon_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl StoreConfig {
    /// Applies environment variables as defaults for unset fields.
    pub fn apply_env_defaults(&mut self) {
        if self.url.is_none() {
            self.url = std::env::var("SUPABASE_URL").ok();
        }
        if self.anon_key.is_none() {
            self.anon_key = std::env::var("SUPABASE_ANON_KEY").ok();
        }
    }

    /// Resolves the config into the concrete values a client needs.
    ///
    /// Fails when the URL or anon key is missing or the URL does not parse.
    pub fn resolve(&self) -> Result<ResolvedStoreConfig> {
        let raw_url = self.url.as_deref().ok_or_else(|| {
            LeadbookError::config(
                "Store URL is not set. Set SUPABASE_URL or [store] url in the config file",
            )
        })?;
        let url = Url::parse(raw_url)
            .map_err(|e| LeadbookError::config(format!("Invalid store URL: {e}")))?;
        let anon_key = self.anon_key.clone().ok_or_else(|| {
            LeadbookError::config(
                "Store anon key is not set. Set SUPABASE_ANON_KEY or [store] anon_key in the config file",
            )
        })?;

        Ok(ResolvedStoreConfig {
            url,
            anon_key,
            timeout_secs: self.timeout_secs,
        })
    }

    /// Returns a display-safe string (no key material) for log output.
    pub fn display_string(&self) -> String {
        self.url.as_deref().unwrap_or("(unset)").to_string()
    }
}

/// Fully resolved store settings handed to clients.
#[derive(Debug, Clone)]
pub struct ResolvedStoreConfig {
    /// Parsed base URL.
    pub url: Url,
    /// Anon key.
    pub anon_key: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("leadbook")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file.
    ///
    /// A missing file yields the default configuration.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| LeadbookError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            LeadbookError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }
}
