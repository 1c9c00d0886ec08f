//! # Configuration
//!
//! Settings resolve defaults → config file → CLI flags. The library only
//! needs [`PlayerConfig`]; [`AppConfig`] is the whole TOML file read by the
//! binary.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Behaviour switches handed to a player at construction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PlayerConfig {
    /// Log every forward/backward step and fork selection at debug level
    #[serde(default)]
    pub trace_navigation: bool,
}

// ============================================================================
// File format (all fields optional for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// One of `off`, `error`, `warn`, `info`, `debug`, `trace`
    pub level: Option<String>,
    /// Write the log here instead of stderr
    pub file: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    pub forks: Option<bool>,
    pub comments: Option<bool>,
}

pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// A settings file that could not be used
#[derive(Debug)]
pub enum ConfigError {
    /// The file at `path` could not be read
    Unreadable { path: PathBuf, source: io::Error },
    /// The TOML does not describe an [`AppConfig`]
    Invalid(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Unreadable { path, source } => {
                write!(f, "cannot read settings from {}: {}", path.display(), source)
            }
            ConfigError::Invalid(e) => write!(f, "bad player settings: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Unreadable { source, .. } => Some(source),
            ConfigError::Invalid(e) => Some(e),
        }
    }
}

impl AppConfig {
    /// Read a TOML config file
    pub fn load(path: &Path) -> Result<AppConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let config = AppConfig::from_toml(&contents)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<AppConfig, ConfigError> {
        let config: AppConfig = toml::from_str(contents).map_err(ConfigError::Invalid)?;
        debug!("Config: {:?}", config);
        Ok(config)
    }

    pub fn log_level(&self) -> &str {
        self.logging.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}
