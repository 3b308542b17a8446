//! `SplitPane` Core Library
//!
//! This crate provides a split-pane layout engine for document applications:
//! a binary tree of tabbed panes, divider geometry, tab and divider drag
//! gestures, viewport preservation across resizes, and JSON layout
//! persistence with a phased restore.
//!
//! # Crate Structure
//!
//! - [`split`] - Pane tree, geometry, drags, layouts and the [`SplitWorkspace`] controller
//! - [`host`] - Traits the embedding application implements, plus an in-memory host
//! - [`config`] - Engine settings and their TOML persistence
//! - [`error`] - Configuration, layout and command errors
//! - [`tracing`] - Structured logging setup

// Enable missing_docs warning for public API documentation
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod host;
pub mod split;
pub mod tracing;

pub use config::{
    ConfigManager, DragSettings, EngineConfig, LayoutSettings, PersistenceSettings,
    ResizeSettings, ScalingMode, TabSettings,
};
pub use error::{CommandError, ConfigError, ConfigResult, LayoutError, LayoutResult};
pub use host::{DocumentHost, Host, MemoryHost, SettingsStore, UserPrompt};
pub use split::{
    Command, DropAction, Edge, LayoutMetrics, Orientation, PaneId, PaneTree, Point, Rect,
    RestoreOptions, SavedLayout, SplitError, SplitWorkspace, TabSelection, ViewId,
};
pub use tracing::{
    TracingConfig, TracingError, TracingLevel, TracingOutput, TracingResult, init_tracing,
};
