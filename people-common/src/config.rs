//! Configuration loading
//!
//! Config file resolution follows this priority order:
//! 1. Command-line argument (highest priority)
//! 2. `PEOPLE_CONFIG` environment variable
//! 3. Platform config file (`~/.config/people/config.toml`, then
//!    `/etc/people/config.toml` on Linux)
//! 4. Compiled defaults (fallback)
//!
//! An explicitly named file (1 or 2) that cannot be read is an error; a
//! missing platform file just falls through to the defaults.
//!
//! Loading happens before the tracing subscriber exists, so [`load_config`]
//! reports the resolved [`ConfigSource`] for the caller to log.

use crate::db::PoolSettings;
use crate::{Error, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "PEOPLE_CONFIG";

/// Log output encoding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// External name-inference endpoints
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    pub age_url: String,
    pub gender_url: String,
    pub nation_url: String,
    /// Per-call timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            age_url: "https://api.agify.io/".to_string(),
            gender_url: "https://api.genderize.io/".to_string(),
            nation_url: "https://api.nationalize.io/".to_string(),
            timeout_ms: 5000,
        }
    }
}

impl EnrichmentConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Service configuration, every field defaulted
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Socket address the HTTP server binds to
    pub listen_addr: String,
    /// sqlx connection URL
    pub database_url: String,
    pub max_connections: u32,
    /// Per-statement storage timeout in milliseconds
    pub storage_timeout_ms: u64,
    pub log_format: LogFormat,
    pub enrichment: EnrichmentConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            database_url: "sqlite://people.db?mode=rwc".to_string(),
            max_connections: 10,
            storage_timeout_ms: 5000,
            log_format: LogFormat::default(),
            enrichment: EnrichmentConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Parse a TOML document; absent keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Reject values the service cannot start with
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("listen_addr", &self.listen_addr),
            ("database_url", &self.database_url),
            ("enrichment.age_url", &self.enrichment.age_url),
            ("enrichment.gender_url", &self.enrichment.gender_url),
            ("enrichment.nation_url", &self.enrichment.nation_url),
        ];
        if let Some((key, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(Error::Config(format!("{} must not be empty", key)));
        }

        if self.max_connections == 0 {
            return Err(Error::Config("max_connections must be at least 1".to_string()));
        }
        if self.storage_timeout_ms == 0 || self.enrichment.timeout_ms == 0 {
            return Err(Error::Config("timeouts must be non-zero".to_string()));
        }

        Ok(())
    }

    pub fn storage_timeout(&self) -> Duration {
        Duration::from_millis(self.storage_timeout_ms)
    }

    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            max_connections: self.max_connections,
            acquire_timeout: self.storage_timeout(),
        }
    }
}

/// Where the active configuration was read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    CommandLine(PathBuf),
    Environment(PathBuf),
    Platform(PathBuf),
    Defaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::CommandLine(path) => write!(f, "{} (command line)", path.display()),
            ConfigSource::Environment(path) => {
                write!(f, "{} ({})", path.display(), CONFIG_ENV_VAR)
            }
            ConfigSource::Platform(path) => write!(f, "{}", path.display()),
            ConfigSource::Defaults => f.write_str("compiled defaults"),
        }
    }
}

/// Load configuration following the module-level priority order
pub fn load_config(cli_arg: Option<&Path>) -> Result<(ServiceConfig, ConfigSource)> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        let config = ServiceConfig::from_file(path)?;
        return Ok((config, ConfigSource::CommandLine(path.to_path_buf())));
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        let path = PathBuf::from(path);
        let config = ServiceConfig::from_file(&path)?;
        return Ok((config, ConfigSource::Environment(path)));
    }

    // Priority 3: Platform config file
    if let Some(path) = platform_config_file() {
        let config = ServiceConfig::from_file(&path)?;
        return Ok((config, ConfigSource::Platform(path)));
    }

    // Priority 4: Compiled defaults
    Ok((ServiceConfig::default(), ConfigSource::Defaults))
}

/// First existing platform config file, if any
fn platform_config_file() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("people").join("config.toml"));
    let system_config = if cfg!(target_os = "linux") {
        Some(PathBuf::from("/etc/people/config.toml"))
    } else {
        None
    };

    [user_config, system_config]
        .into_iter()
        .flatten()
        .find(|path| path.exists())
}
