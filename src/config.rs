//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\cover-minder\config.toml
//! - macOS: ~/Library/Application Support/cover-minder/config.toml
//! - Linux: ~/.config/cover-minder/config.toml
//!
//! The file only supplies defaults; command-line flags always win.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cover::{CoverFormat, CoverPolicy, DEFAULT_SIZE};
use crate::enrichment::ItunesConfig;
use crate::error::{Error, Result};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Cover normalization defaults
    pub cover: CoverConfig,

    /// Remote lookup settings
    pub remote: RemoteConfig,
}

/// Cover normalization defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverConfig {
    /// Target edge length in pixels
    pub size: u32,

    /// Output encoding: "jpeg" or "png"
    pub format: CoverFormat,

    /// Never resize, only re-encode
    pub keep_size: bool,
}

impl Default for CoverConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            format: CoverFormat::Jpeg,
            keep_size: false,
        }
    }
}

/// Remote lookup settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Whether covers may be downloaded at all
    pub enabled: bool,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// iTunes store country code (e.g. "us", "gb")
    pub country: Option<String>,

    /// Maximum albums per artist search
    pub search_limit: u32,

    /// Search service root
    pub base_url: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        let itunes = ItunesConfig::default();
        Self {
            enabled: true,
            timeout_secs: itunes.timeout.as_secs(),
            country: itunes.country,
            search_limit: itunes.limit,
            base_url: itunes.base_url,
        }
    }
}

impl RemoteConfig {
    /// Client settings for the iTunes lookup
    pub fn itunes(&self) -> ItunesConfig {
        ItunesConfig {
            base_url: self.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(self.timeout_secs.max(1)),
            country: self.country.clone(),
            limit: self.search_limit.max(1),
        }
    }
}

/// Command-line values that override the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub size: Option<u32>,
    pub format: Option<CoverFormat>,
    pub keep_size: bool,
    pub force: bool,
    pub local: bool,
}

impl Config {
    /// Merge command-line overrides into this config.
    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(size) = overrides.size {
            self.cover.size = size;
        }
        if let Some(format) = overrides.format {
            self.cover.format = format;
        }
        self.cover.keep_size |= overrides.keep_size;
        if overrides.local {
            self.remote.enabled = false;
        }
    }

    /// The validated cover policy for a run.
    pub fn policy(&self, force: bool) -> Result<CoverPolicy> {
        let policy = CoverPolicy {
            size: self.cover.size,
            format: self.cover.format,
            keep_size: self.cover.keep_size,
            force,
        };
        policy.validate()?;
        Ok(policy)
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("cover-minder"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the default location.
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };

    if !path.exists() {
        tracing::debug!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match load_from(&path) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            tracing::warn!("Using default configuration");
            Config::default()
        }
    }
}

/// Load configuration from an explicit path.
///
/// Unlike [`load`], a missing or malformed file is an error.
pub fn load_from(path: &Path) -> Result<Config> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| Error::config(format!("Failed to read config file {:?}: {}", path, e)))?;
    let config = toml::from_str(&contents)
        .map_err(|e| Error::config(format!("Failed to parse config file {:?}: {}", path, e)))?;
    tracing::info!("Loaded config from {:?}", path);
    Ok(config)
}

// ============================================================================
// Tests
// ============================================================================
