//! Configuration file resolution and loading
//!
//! Config file resolution priority:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. Per-user config file (`~/.config/sentir/sentir.toml` on Linux)
//! 4. Built-in defaults (no file)

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "SENTIR_CONFIG";

const CONFIG_DIR_NAME: &str = "sentir";
const CONFIG_FILE_NAME: &str = "sentir.toml";

/// Logging section shared by every service config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG` when set
    pub level: String,
    /// Emit ANSI colour codes
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            ansi: true,
        }
    }
}

/// HTTP listener section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5730,
        }
    }
}

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicit `--config` argument
    CommandLine(PathBuf),
    /// `SENTIR_CONFIG` (or the caller-supplied variable)
    Environment(PathBuf),
    /// Per-user config file that happens to exist
    UserFile(PathBuf),
    /// No file; compiled defaults
    Defaults,
}

impl ConfigSource {
    /// Path to read, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::CommandLine(p)
            | ConfigSource::Environment(p)
            | ConfigSource::UserFile(p) => Some(p),
            ConfigSource::Defaults => None,
        }
    }
}

/// Resolve the config file following the priority order in the module docs
pub fn resolve_config_source(cli_arg: Option<&Path>, env_var_name: &str) -> ConfigSource {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return ConfigSource::CommandLine(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return ConfigSource::Environment(PathBuf::from(path));
        }
    }

    // Priority 3: Per-user config file
    if let Some(path) = default_config_path() {
        if path.exists() {
            return ConfigSource::UserFile(path);
        }
    }

    // Priority 4: Compiled defaults
    ConfigSource::Defaults
}

/// Platform config location (`dirs::config_dir()/sentir/sentir.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Read and parse a TOML file
pub fn load_toml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Read config {} failed: {}", path.display(), e))
    })?;
    let parsed = toml::from_str(&content)?;
    Ok(parsed)
}

/// Load configuration from the resolved source, or defaults when there is none
///
/// Explicitly requested files (CLI or ENV) must exist; a missing per-user
/// file is never an error.
pub fn load_config<T: DeserializeOwned + Default>(source: &ConfigSource) -> Result<T> {
    match source.path() {
        Some(path) => {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            info!("Loading configuration from {}", path.display());
            load_toml(path)
        }
        None => {
            warn!("No configuration file found, using built-in defaults");
            Ok(T::default())
        }
    }
}
