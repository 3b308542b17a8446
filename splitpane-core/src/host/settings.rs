//! Settings store implementations

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::ConfigManager;
use crate::error::{ConfigError, ConfigResult};

use super::SettingsStore;

type Groups = BTreeMap<String, BTreeMap<String, String>>;

/// Settings kept in memory only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySettings {
    groups: Groups,
}

impl MemorySettings {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettings {
    fn read_setting(&self, group: &str, key: &str) -> Option<String> {
        self.groups.get(group)?.get(key).cloned()
    }

    fn write_setting(&mut self, group: &str, key: &str, value: &str) -> ConfigResult<()> {
        self.groups
            .entry(group.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Settings persisted as a JSON file, rewritten on every change.
#[derive(Debug, Clone)]
pub struct FileSettings {
    path: PathBuf,
    groups: Groups,
}

impl FileSettings {
    /// Opens the store at `path`. A missing file yields an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> ConfigResult<Self> {
        let path = path.into();
        let groups = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                path: path.clone(),
                source,
            })?;
            serde_json::from_str(&content)?
        } else {
            Groups::new()
        };
        Ok(Self { path, groups })
    }

    /// Opens the store in the directory managed by `manager`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn from_manager(manager: &ConfigManager) -> ConfigResult<Self> {
        Self::open(manager.settings_path())
    }

    /// File backing this store.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> ConfigResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let content = serde_json::to_string_pretty(&self.groups)?;
        fs::write(&self.path, content).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl SettingsStore for FileSettings {
    fn read_setting(&self, group: &str, key: &str) -> Option<String> {
        self.groups.get(group)?.get(key).cloned()
    }

    fn write_setting(&mut self, group: &str, key: &str, value: &str) -> ConfigResult<()> {
        self.groups
            .entry(group.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
        self.flush()
    }
}
