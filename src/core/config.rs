use crate::core::error::TrackerError;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

pub const API_KEY_VAR: &str = "RAPIDAPI_KEY";
pub const DEFAULT_BASE_URL: &str = "https://sec-edgar-financial-data-api.p.rapidapi.com";
pub const DEFAULT_HOST: &str = "sec-edgar-financial-data-api.p.rapidapi.com";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_top() -> Option<i64> {
    Some(20)
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct EdgarProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Value of the `x-rapidapi-host` header.
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EdgarProviderConfig {
    fn default() -> Self {
        EdgarProviderConfig {
            base_url: default_base_url(),
            host: default_host(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub provider: EdgarProviderConfig,
    /// Positions shown when `--top` is not given. An explicit `null` shows all.
    #[serde(default = "default_top")]
    pub default_top: Option<i64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            api_key: None,
            provider: EdgarProviderConfig::default(),
            default_top: default_top(),
        }
    }
}

impl AppConfig {
    /// Loads the default config file, falling back to built-in defaults when
    /// it does not exist.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(path = %config_path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "fundtrack", "fundtrack")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config.validate()?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    fn validate(&self) -> Result<(), TrackerError> {
        if self.provider.timeout_secs == 0 {
            return Err(TrackerError::InvalidArgument(
                "provider.timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Reads `RAPIDAPI_KEY` from a `key=value` file without touching the
/// process environment.
pub fn read_key_file<P: AsRef<Path>>(path: P) -> Option<String> {
    let entries = dotenvy::from_path_iter(path.as_ref()).ok()?;
    entries
        .filter_map(|entry| entry.ok())
        .find(|(key, _)| key == API_KEY_VAR)
        .map(|(_, value)| value.trim().trim_matches(['"', '\'']).to_string())
}

/// Picks the API key from, in order: the command line, the environment, the
/// key file, the config file. Blank values count as absent.
pub fn resolve_api_key(
    flag: Option<&str>,
    env: Option<&str>,
    key_file: Option<&str>,
    config: Option<&str>,
) -> Result<String, TrackerError> {
    [flag, env, key_file, config]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|key| !key.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            TrackerError::Auth(format!(
                "no API key provided; pass --key, set {API_KEY_VAR}, add it to .env or set api_key in the config file"
            ))
        })
}

/// Discovers the API key from every supported source.
pub fn discover_api_key(flag: Option<&str>, config: &AppConfig) -> Result<String, TrackerError> {
    let env = std::env::var(API_KEY_VAR).ok();
    let key_file = read_key_file(".env");
    resolve_api_key(
        flag,
        env.as_deref(),
        key_file.as_deref(),
        config.api_key.as_deref(),
    )
}
