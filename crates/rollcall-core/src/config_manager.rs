//! Config file loading.
//!
//! `config.json` lives in the per-user config directory. A file with
//! default values is written on first run so there is something to edit.

use crate::config::AppConfig;
use crate::error::CoreError;
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const CONFIG_FILE_NAME: &str = "config.json";

const APP_NAME: &str = "rollcall";

/// Loaded configuration and the file it came from
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: AppConfig,
    config_path: PathBuf,
}

impl ConfigManager {
    /// Load from the platform config dir (e.g. `~/.config/rollcall/config.json`)
    pub fn new() -> Result<Self, CoreError> {
        let dirs = ProjectDirs::from("", "", APP_NAME)
            .ok_or_else(|| CoreError::Config("no home directory for config".to_string()))?;
        Self::with_path(dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Load `config_path`, creating it with defaults when missing
    pub fn with_path(config_path: PathBuf) -> Result<Self, CoreError> {
        let config = if config_path.exists() {
            load_from_file(&config_path)?
        } else {
            let config = AppConfig::default_config();
            write_defaults(&config_path, &config)?;
            config
        };

        Ok(Self {
            config,
            config_path,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn into_config(self) -> AppConfig {
        self.config
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}

fn load_from_file(path: &Path) -> Result<AppConfig, CoreError> {
    let content = fs::read_to_string(path)
        .map_err(|e| CoreError::Config(format!("failed to read {}: {e}", path.display())))?;

    let config = serde_json::from_str(&content)
        .map_err(|e| CoreError::Config(format!("failed to parse {}: {e}", path.display())))?;

    debug!("config loaded: {}", path.display());
    Ok(config)
}

fn write_defaults(path: &Path, config: &AppConfig) -> Result<(), CoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            CoreError::Config(format!("failed to create {}: {e}", parent.display()))
        })?;
    }

    let content = serde_json::to_string_pretty(config)?;
    fs::write(path, content)
        .map_err(|e| CoreError::Config(format!("failed to write {}: {e}", path.display())))?;

    info!("wrote default config: {}", path.display());
    Ok(())
}
