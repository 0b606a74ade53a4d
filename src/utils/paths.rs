//! Cross-Platform Path Utilities
//!
//! Functions for resolving the application directories (~/.preset-transfer/).

use std::path::{Path, PathBuf};

use crate::utils::error::{AppError, AppResult};

/// Get the user's home directory
pub fn home_dir() -> AppResult<PathBuf> {
    dirs::home_dir().ok_or_else(|| AppError::config("Could not determine home directory"))
}

/// Get the application directory (~/.preset-transfer/)
pub fn app_dir() -> AppResult<PathBuf> {
    Ok(home_dir()?.join(".preset-transfer"))
}

/// Get the config file path (~/.preset-transfer/config.json)
pub fn config_path() -> AppResult<PathBuf> {
    Ok(app_dir()?.join("config.json"))
}

/// Get the default presets directory (~/.preset-transfer/presets/)
pub fn presets_dir() -> AppResult<PathBuf> {
    Ok(app_dir()?.join("presets"))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> AppResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Get the application directory, creating if it doesn't exist
pub fn ensure_app_dir() -> AppResult<PathBuf> {
    let path = app_dir()?;
    ensure_dir(&path)?;
    Ok(path)
}
