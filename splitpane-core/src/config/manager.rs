//! Configuration file management

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult};

use super::settings::EngineConfig;

/// Directory name under the user configuration directory.
pub const CONFIG_DIR_NAME: &str = "splitpane";

/// Engine configuration file name.
pub const CONFIG_FILE_NAME: &str = "engine.toml";

/// Key/value settings store file name.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Loads and saves the engine configuration as TOML.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Creates a manager rooted at the user configuration directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoConfigDir`] if the platform has no
    /// configuration directory.
    pub fn new() -> ConfigResult<Self> {
        let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(Self::with_config_dir(base.join(CONFIG_DIR_NAME)))
    }

    /// Creates a manager rooted at `config_dir`.
    #[must_use]
    pub fn with_config_dir(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    /// Directory holding all configuration files.
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Path of the engine configuration file.
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    /// Path of the key/value settings store.
    #[must_use]
    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join(SETTINGS_FILE_NAME)
    }

    /// Loads the engine configuration, falling back to defaults when the
    /// file does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_config(&self) -> ConfigResult<EngineConfig> {
        let path = self.config_path();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No engine configuration, using defaults");
            return Ok(EngineConfig::default());
        }
        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(EngineConfig::from_toml_str(&content)?)
    }

    /// Writes the engine configuration, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn save_config(&self, config: &EngineConfig) -> ConfigResult<()> {
        self.ensure_config_dir()?;
        let content = config.to_toml_string()?;
        let path = self.config_path();
        fs::write(&path, content).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "Engine configuration saved");
        Ok(())
    }

    /// Creates the configuration directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn ensure_config_dir(&self) -> ConfigResult<()> {
        fs::create_dir_all(&self.config_dir).map_err(|source| ConfigError::Io {
            path: self.config_dir.clone(),
            source,
        })
    }
}
