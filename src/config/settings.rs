//! Widget configuration files

use indoor_map_types::{ConfigState, WidgetConfiguration};
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Errors reading or writing configuration files
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in '{}': {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not determine config directory")]
    NoConfigDir,
}

/// Get the default widget configuration file path
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let dirs = directories::ProjectDirs::from("com", "indoor-map", "indoor-map-config")
        .ok_or(ConfigError::NoConfigDir)?;

    Ok(dirs.config_dir().join("widget.json"))
}

/// Load a stored widget configuration
///
/// A missing file is not an error: it means nothing was stored yet.
pub fn load_config_state(path: &Path) -> Result<ConfigState, ConfigError> {
    if !path.exists() {
        debug!("No widget configuration at {}", path.display());
        return Ok(ConfigState::Uninitialized);
    }

    let value: serde_json::Value = read_json(path)?;
    ConfigState::from_json(value).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Save a widget configuration, creating parent directories as needed
pub fn save_config(config: &WidgetConfiguration, path: &Path) -> Result<(), ConfigError> {
    write_json(config, path)?;
    info!("Saved widget configuration to {}", path.display());
    Ok(())
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<(), ConfigError> {
    let io_error = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }

    let content = serde_json::to_string_pretty(value).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, content).map_err(io_error)
}
