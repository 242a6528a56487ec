//! Configuration loading
//!
//! Each setting is resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing default config file is not an error. A config file named
//! explicitly on the command line must exist.

use crate::status::DEFAULT_EXPIRING_SOON_DAYS;
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";

pub const ENV_FRONTEND_URLS: &str = "ABUDDY_FRONTEND_URLS";
pub const ENV_IDENTITY_URL: &str = "ABUDDY_IDENTITY_URL";
pub const ENV_IDENTITY_API_KEY: &str = "ABUDDY_IDENTITY_API_KEY";
pub const ENV_EXPIRING_SOON_DAYS: &str = "ABUDDY_EXPIRING_SOON_DAYS";

/// Contents of `config.toml`; every key is optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    pub port: Option<u16>,
    pub database_path: Option<PathBuf>,
    pub frontend_urls: Option<Vec<String>>,
    pub expiring_soon_days: Option<i64>,
    #[serde(default)]
    pub identity: IdentityConfig,
}

/// Identity provider settings
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct IdentityConfig {
    /// Endpoint that resolves a bearer token to `{id, email}`
    pub url: Option<String>,
    /// Sent as the `apikey` header alongside the bearer token
    pub api_key: Option<String>,
    /// Fixed tokens for local development
    #[serde(default)]
    pub static_tokens: Vec<StaticToken>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StaticToken {
    pub token: String,
    pub id: String,
    pub email: String,
}

/// Values supplied on the command line (clap fills these, including their
/// `env` fallbacks)
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub port: Option<u16>,
    pub database_path: Option<PathBuf>,
    pub config_file: Option<PathBuf>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub database_path: PathBuf,
    pub frontend_urls: Vec<String>,
    pub expiring_soon_days: i64,
    pub identity: IdentityConfig,
}

impl ServerConfig {
    /// Resolve configuration from CLI overrides, the process environment and
    /// the TOML file
    pub fn resolve(overrides: ConfigOverrides) -> Result<Self> {
        let toml = match &overrides.config_file {
            Some(path) => {
                info!("Loading config file: {}", path.display());
                load_toml_config(path)?
            }
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => {
                    info!("Loading config file: {}", path.display());
                    load_toml_config(&path)?
                }
                None => {
                    warn!("No config file found, using defaults");
                    TomlConfig::default()
                }
            },
        };

        Self::from_sources(overrides, toml, |key| std::env::var(key).ok())
    }

    /// Merge the configuration sources; `env` looks up environment variables
    pub fn from_sources<F>(overrides: ConfigOverrides, toml: TomlConfig, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = overrides.port.or(toml.port).unwrap_or(DEFAULT_PORT);

        let database_path = overrides
            .database_path
            .or(toml.database_path)
            .unwrap_or_else(default_database_path);

        let frontend_urls = match env(ENV_FRONTEND_URLS) {
            Some(list) => split_url_list(&list),
            None => toml
                .frontend_urls
                .unwrap_or_else(|| vec![DEFAULT_FRONTEND_URL.to_string()]),
        };

        let expiring_soon_days = match env(ENV_EXPIRING_SOON_DAYS) {
            Some(raw) => raw.trim().parse::<i64>().map_err(|_| {
                Error::Config(format!("{} must be an integer, got '{}'", ENV_EXPIRING_SOON_DAYS, raw))
            })?,
            None => toml.expiring_soon_days.unwrap_or(DEFAULT_EXPIRING_SOON_DAYS),
        };
        if expiring_soon_days < 0 {
            return Err(Error::Config(format!(
                "expiring_soon_days must not be negative, got {}",
                expiring_soon_days
            )));
        }

        let mut identity = toml.identity;
        if let Some(url) = env(ENV_IDENTITY_URL) {
            identity.url = Some(url);
        }
        if let Some(key) = env(ENV_IDENTITY_API_KEY) {
            identity.api_key = Some(key);
        }

        Ok(Self {
            port,
            database_path,
            frontend_urls,
            expiring_soon_days,
            identity,
        })
    }
}

/// Read and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Cannot read {}: {}", path.display(), e)))?;

    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)))
}

/// Platform config file location (`~/.config/abuddy/config.toml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("abuddy").join("config.toml"))
}

/// Platform data location for the database file
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("abuddy"))
        .unwrap_or_else(|| PathBuf::from("./abuddy_data"))
        .join("abuddy.db")
}

fn split_url_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .collect()
}
