//! Configuration for hostinfo
//!
//! Read from a TOML file; every field is optional and falls back to its
//! default. The default location is the per-user config directory:
//! - Windows: %APPDATA%\hostinfo\config.toml
//! - Linux: $XDG_CONFIG_HOME/hostinfo/config.toml (default: ~/.config/hostinfo/)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::platform::OsKey;

/// Application name for directory paths
const APP_NAME: &str = "hostinfo";

/// Main configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Log level when RUST_LOG is unset (error, warn, info, debug, trace)
    pub log_level: String,

    /// Print JSON instead of text
    pub json: bool,

    /// Registry location of the OS name and system root
    pub os_key: OsKey,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            json: false,
            os_key: OsKey::default(),
        }
    }
}

impl AppConfig {
    /// Load config from TOML file
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save config to TOML file
    pub fn save(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load `explicit` if given (it must exist), otherwise the default file
    /// if present, otherwise defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, Box<dyn std::error::Error>> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match default_path() {
            Some(path) if path.is_file() => {
                debug!("Loading config from {}", path.display());
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }
}

/// File `config --save` writes to: `explicit` or the default location.
pub fn save_target(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit.map(Path::to_path_buf).or_else(default_path)
}

/// Default config file location, if the platform has a config directory.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_NAME).join("config.toml"))
}
