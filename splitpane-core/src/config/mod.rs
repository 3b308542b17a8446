//! Configuration management for the split pane engine
//!
//! This module provides [`EngineConfig`] and the `ConfigManager` for loading
//! and saving it in TOML format.

mod manager;
pub mod settings;

pub use manager::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, ConfigManager, SETTINGS_FILE_NAME};
pub use settings::{
    DragSettings, EngineConfig, LayoutSettings, PersistenceSettings, ResizeSettings, ScalingMode,
    TabSettings,
};
