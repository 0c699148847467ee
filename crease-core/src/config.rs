//! Configuration loading and root folder resolution

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Environment variable naming the root data folder.
pub const ROOT_FOLDER_ENV: &str = "CREASE_ROOT_FOLDER";

/// Root folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. `CREASE_ROOT_FOLDER` environment variable
/// 3. TOML config file `root_folder` key
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(cli_arg: Option<&str>) -> Result<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Ok(PathBuf::from(path));
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
        return Ok(PathBuf::from(path));
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = locate_config_file() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(root_folder) = config.get("root_folder").and_then(|v| v.as_str()) {
                    return Ok(PathBuf::from(root_folder));
                }
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    Ok(default_root_folder())
}

/// Path of the SQLite database inside the root folder.
pub fn db_path(root_folder: &Path) -> PathBuf {
    root_folder.join("crease.db")
}

/// Directory for stored media (video clips, profile photos).
pub fn media_dir(root_folder: &Path) -> PathBuf {
    root_folder.join("media")
}

/// Get configuration file path for the platform
fn locate_config_file() -> Result<PathBuf> {
    let config_path = if cfg!(target_os = "linux") {
        // Try ~/.config/crease/config.toml first, then /etc/crease/config.toml
        let user_config = dirs::config_dir().map(|d| d.join("crease").join("config.toml"));
        let system_config = PathBuf::from("/etc/crease/config.toml");

        if let Some(path) = user_config {
            if path.exists() {
                return Ok(path);
            }
        }
        if system_config.exists() {
            return Ok(system_config);
        }
        return Err(Error::Config("No config file found".to_string()));
    } else if cfg!(target_os = "macos") || cfg!(target_os = "windows") {
        dirs::config_dir()
            .map(|d| d.join("crease").join("config.toml"))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?
    } else {
        return Err(Error::Config("Unsupported platform".to_string()));
    };

    if config_path.exists() {
        Ok(config_path)
    } else {
        Err(Error::Config(format!(
            "Config file not found: {:?}",
            config_path
        )))
    }
}

/// Get OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/crease (or /var/lib/crease for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("crease"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/crease"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/crease
        dirs::data_dir()
            .map(|d| d.join("crease"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/crease"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\crease
        dirs::data_local_dir()
            .map(|d| d.join("crease"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\crease"))
    } else {
        PathBuf::from("./crease_data")
    }
}
