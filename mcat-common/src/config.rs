//! Configuration loading and root folder resolution
//!
//! Every setting resolves in this priority order:
//! 1. Command-line flag (highest priority)
//! 2. Environment variable (`MCAT_*`, read by the CLI layer)
//! 3. TOML config file
//! 4. Default derived from the root folder / OS data directory

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default listen address of the catalogue server
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:6000";

/// Default tracing filter directive
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Contents of `config.toml`; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    pub bind_address: Option<String>,
    pub database: Option<PathBuf>,
    pub streams_dir: Option<PathBuf>,
    pub spool_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub root_folder: Option<PathBuf>,
    pub bind_address: Option<String>,
    pub database: Option<PathBuf>,
    pub streams_dir: Option<PathBuf>,
    pub spool_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub root_folder: PathBuf,
    pub bind_address: String,
    pub database_path: PathBuf,
    /// Base directory of the filesystem stream store
    pub streams_dir: PathBuf,
    /// Where request-scoped temporary buffers are created (system temp dir if unset)
    pub spool_dir: Option<PathBuf>,
    pub log_level: String,
}

impl ServiceConfig {
    /// Merge overrides over the TOML file over defaults
    pub fn resolve(overrides: ConfigOverrides, file: TomlConfig) -> Self {
        let root_folder = overrides
            .root_folder
            .or(file.root_folder)
            .unwrap_or_else(default_root_folder);

        let database_path = overrides
            .database
            .or(file.database)
            .unwrap_or_else(|| root_folder.join("mcat.db"));

        let streams_dir = overrides
            .streams_dir
            .or(file.streams_dir)
            .unwrap_or_else(|| root_folder.join("streams"));

        Self {
            bind_address: overrides
                .bind_address
                .or(file.bind_address)
                .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            spool_dir: overrides.spool_dir.or(file.spool_dir),
            log_level: overrides
                .log_level
                .or(file.log_level)
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            root_folder,
            database_path,
            streams_dir,
        }
    }

    /// Create the root folder, the stream directory and the spool directory
    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root_folder)?;
        std::fs::create_dir_all(&self.streams_dir)?;
        if let Some(spool) = &self.spool_dir {
            std::fs::create_dir_all(spool)?;
        }
        Ok(())
    }
}

/// Load the TOML config file
///
/// An explicitly requested file must exist. Without one, the platform
/// default location is tried and a missing file yields empty settings.
pub fn load_toml_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            path.to_path_buf()
        }
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(TomlConfig::default()),
        },
    };

    let content = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    let config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;

    tracing::debug!(path = %path.display(), "Loaded config file");
    Ok(config)
}

/// `~/.config/mcat/config.toml` (or the platform equivalent)
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("mcat").join("config.toml"))
}

/// OS-dependent default root folder
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("mcat"))
        .unwrap_or_else(|| PathBuf::from("./mcat_data"))
}
