//! JSON Configuration Management
//!
//! Handles reading and writing the engine configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use crate::models::settings::{TransferConfig, TransferConfigUpdate};
use crate::services::preset_transfer::EngineOptions;
use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::{config_path, ensure_app_dir, presets_dir};

/// Configuration service for managing engine settings
#[derive(Debug)]
pub struct ConfigService {
    config_path: PathBuf,
    config: TransferConfig,
}

impl ConfigService {
    /// Create a new config service at ~/.preset-transfer/config.json
    pub fn new() -> AppResult<Self> {
        // Ensure the config directory exists
        ensure_app_dir()?;
        Self::with_path(config_path()?)
    }

    /// Load (or create with defaults) the config file at `path`
    pub fn with_path(path: impl Into<PathBuf>) -> AppResult<Self> {
        let config_path = path.into();
        let config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            let default_config = TransferConfig::default();
            Self::save_to_file(&config_path, &default_config)?;
            default_config
        };

        Ok(Self {
            config_path,
            config,
        })
    }

    /// Load configuration from a file
    fn load_from_file(path: &Path) -> AppResult<TransferConfig> {
        let content = fs::read_to_string(path)?;
        let config: TransferConfig = serde_json::from_str(&content)?;
        config.validate().map_err(AppError::validation)?;
        Ok(config)
    }

    /// Save configuration to a file with pretty formatting
    fn save_to_file(path: &Path, config: &TransferConfig) -> AppResult<()> {
        config.validate().map_err(AppError::validation)?;
        let content = serde_json::to_string_pretty(config)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the current configuration
    pub fn get_config(&self) -> &TransferConfig {
        &self.config
    }

    /// Engine options derived from the current configuration
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions::from(&self.config)
    }

    /// Directory the file preset store should use
    pub fn presets_dir(&self) -> AppResult<PathBuf> {
        match &self.config.presets_dir {
            Some(dir) => Ok(PathBuf::from(dir)),
            None => presets_dir(),
        }
    }

    /// Update the configuration with a partial update
    pub fn update_config(&mut self, update: TransferConfigUpdate) -> AppResult<TransferConfig> {
        let mut updated = self.config.clone();
        updated.apply_update(update);
        updated.validate().map_err(AppError::validation)?;
        self.config = updated;
        self.save()?;
        Ok(self.config.clone())
    }

    /// Save the current configuration to disk
    pub fn save(&self) -> AppResult<()> {
        Self::save_to_file(&self.config_path, &self.config)
    }

    /// Reload configuration from disk
    pub fn reload(&mut self) -> AppResult<()> {
        self.config = Self::load_from_file(&self.config_path)?;
        Ok(())
    }

    /// Reset configuration to defaults
    pub fn reset(&mut self) -> AppResult<()> {
        self.config = TransferConfig::default();
        self.save()?;
        Ok(())
    }
}
