//! Engine settings
//!
//! [`EngineConfig`] is the immutable configuration handed to the workspace at
//! construction (and replaced wholesale through `set_config`). Every section
//! deserializes with defaults so partial TOML files are accepted.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How a view's zoom reacts when its pane is resized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalingMode {
    /// Keep zoom; only re-anchor the scroll position
    #[default]
    None,
    /// Scale zoom with the pane along the resized axis
    Anchored,
    /// Scale zoom so everything previously visible stays visible
    Contained,
    /// Scale zoom so the previous view fills the new pane
    Expanded,
}

impl ScalingMode {
    /// Returns all modes in menu order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::None, Self::Anchored, Self::Contained, Self::Expanded]
    }

    /// Stable identifier used in settings files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Anchored => "anchored",
            Self::Contained => "contained",
            Self::Expanded => "expanded",
        }
    }
}

impl fmt::Display for ScalingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScalingMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "anchored" => Ok(Self::Anchored),
            "contained" => Ok(Self::Contained),
            "expanded" => Ok(Self::Expanded),
            _ => Err(()),
        }
    }
}

/// Tab strip appearance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabSettings {
    /// Height of the tab strip header in pixels
    pub tab_height: i32,
    /// Maximum label length in characters
    pub max_chars: usize,
    /// Prefix truncated labels with an ellipsis
    pub ellipsis: bool,
    /// Show only the file name instead of the host's label
    pub hide_filesize: bool,
}

impl Default for TabSettings {
    fn default() -> Self {
        Self {
            tab_height: 30,
            max_chars: 30,
            ellipsis: true,
            hide_filesize: false,
        }
    }
}

/// Pane tree geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Divider thickness in pixels
    pub divider_thickness: i32,
    /// Smallest extent a pane may be pushed to by a divider
    pub min_pane_size: i32,
    /// Width of the workspace-edge drop band in pixels
    pub edge_band: i32,
    /// Share of the workspace given to a pane created at an edge
    pub edge_split_fraction: f64,
    /// Interior drop bands are the target extent divided by this value
    pub interior_band_divisor: f64,
    /// Orientation changes after which a pane accepts no more split drops
    pub max_drop_level: usize,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            divider_thickness: 8,
            min_pane_size: 80,
            edge_band: 30,
            edge_split_fraction: 0.25,
            interior_band_divisor: 2.5,
            max_drop_level: 30,
        }
    }
}

/// Tab and divider drag gestures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragSettings {
    /// Distance before a primary-button drag is classified
    pub deadzone: i32,
    /// Vertical travel that promotes a classified drag to a tab drag
    pub vertical_threshold: i32,
    /// Maximum angle from vertical, in degrees, for a tab drag
    pub angle_threshold: f64,
    /// Drop target polling interval
    pub poll_interval_ms: u64,
    /// Divider drag polling interval
    pub divider_poll_ms: u64,
    /// Allow tab drags with the primary button
    pub primary_button: bool,
    /// Allow tab drags with the middle button
    pub middle_button: bool,
}

impl Default for DragSettings {
    fn default() -> Self {
        Self {
            deadzone: 10,
            vertical_threshold: 40,
            angle_threshold: 45.0,
            poll_interval_ms: 50,
            divider_poll_ms: 10,
            primary_button: true,
            middle_button: true,
        }
    }
}

impl DragSettings {
    /// Drop target polling interval.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Divider drag polling interval.
    #[must_use]
    pub const fn divider_poll_interval(&self) -> Duration {
        Duration::from_millis(self.divider_poll_ms)
    }
}

/// Viewport preservation while panes resize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeSettings {
    /// Scaling mode for views without an override
    pub default_scaling_mode: ScalingMode,
    /// Honour per-view scaling mode overrides
    pub scaling_mode_per_view: bool,
    /// Shrink zoom so contained content keeps fitting
    pub zoom_constraint: bool,
    /// Tolerance in pixels for the "content fits" test
    pub contain_tolerance: f64,
    /// Only scale when the content was fully inside the viewport
    pub scaling_contained_only: bool,
    /// Only scale when the content fit both dimensions
    pub scaling_contained_partial: bool,
    /// Only scale when the content fit at least one dimension
    pub scaling_contained_shorter: bool,
}

impl Default for ResizeSettings {
    fn default() -> Self {
        Self {
            default_scaling_mode: ScalingMode::None,
            scaling_mode_per_view: false,
            zoom_constraint: true,
            contain_tolerance: 2.0,
            scaling_contained_only: false,
            scaling_contained_partial: false,
            scaling_contained_shorter: false,
        }
    }
}

/// Layout persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceSettings {
    /// Restore the last layout at startup and keep it saved
    pub restore_layout: bool,
    /// Delay between a layout change and its write to the settings store
    pub save_debounce_ms: u64,
    /// Delay between restoration phases
    pub restore_step_ms: u64,
}

impl Default for PersistenceSettings {
    fn default() -> Self {
        Self {
            restore_layout: false,
            save_debounce_ms: 2000,
            restore_step_ms: 100,
        }
    }
}

impl PersistenceSettings {
    /// Debounce delay for layout writes.
    #[must_use]
    pub const fn save_debounce(&self) -> Duration {
        Duration::from_millis(self.save_debounce_ms)
    }

    /// Delay between restoration phases.
    #[must_use]
    pub const fn restore_step(&self) -> Duration {
        Duration::from_millis(self.restore_step_ms)
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Tab strip appearance
    pub tabs: TabSettings,
    /// Pane tree geometry
    pub layout: LayoutSettings,
    /// Drag gestures
    pub drag: DragSettings,
    /// Viewport preservation
    pub resize: ResizeSettings,
    /// Layout persistence
    pub persistence: PersistenceSettings,
}

impl EngineConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy with every ranged value clamped to its allowed range.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.tabs.tab_height = self.tabs.tab_height.clamp(20, 50);
        self.tabs.max_chars = self.tabs.max_chars.clamp(10, 100);
        self.layout.divider_thickness = self.layout.divider_thickness.clamp(4, 12);
        self.layout.min_pane_size = self.layout.min_pane_size.max(0);
        self.layout.edge_band = self.layout.edge_band.max(1);
        self.layout.edge_split_fraction = self.layout.edge_split_fraction.clamp(0.05, 0.95);
        if self.layout.interior_band_divisor < 2.0 {
            self.layout.interior_band_divisor = 2.0;
        }
        self.drag.deadzone = self.drag.deadzone.clamp(10, 50);
        self.drag.vertical_threshold = self.drag.vertical_threshold.max(0);
        self.drag.angle_threshold = self.drag.angle_threshold.clamp(1.0, 89.0);
        self.drag.poll_interval_ms = self.drag.poll_interval_ms.max(1);
        self.drag.divider_poll_ms = self.drag.divider_poll_ms.max(1);
        self.resize.contain_tolerance = self.resize.contain_tolerance.max(0.0);
        self
    }

    /// Parses a TOML document, filling missing keys with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid TOML for this schema.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<Self>(content).map(Self::sanitized)
    }

    /// Serializes the configuration to TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
