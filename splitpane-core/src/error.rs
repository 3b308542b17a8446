//! Error types for configuration and layout persistence
//!
//! Tree precondition failures live in [`crate::split::SplitError`]; the
//! errors here are the ones that may reach the user through a single
//! warning report.

use std::path::PathBuf;

use thiserror::Error;

use crate::split::SplitError;

/// Errors that can occur while loading or saving the engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the configuration file failed.
    #[error("configuration I/O error for {path}: {source}")]
    Io {
        /// File being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration could not be serialized.
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The settings store file is not valid JSON.
    #[error("settings store error: {0}")]
    Store(#[from] serde_json::Error),

    /// No configuration directory could be determined.
    #[error("no configuration directory available")]
    NoConfigDir,
}

/// Errors that can occur while saving, loading or restoring a layout.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// Reading or writing a layout file failed.
    #[error("layout I/O error for {path}: {source}")]
    Io {
        /// File being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The layout is not valid JSON for the layout format.
    #[error("invalid layout: {0}")]
    Json(#[from] serde_json::Error),

    /// None of the files referenced by the layout exist.
    #[error("nothing to restore, {} file(s) missing", .missing.len())]
    NothingToRestore {
        /// Paths that could not be found, in layout order
        missing: Vec<String>,
    },

    /// The layout does not reference any saved document.
    #[error("layout has no files")]
    Empty,

    /// The user declined a confirmation prompt.
    #[error("operation cancelled by the user")]
    Declined,

    /// No layout file path has been chosen yet.
    #[error("no layout path set")]
    NoPath,

    /// A restoration is already running.
    #[error("a layout restore is already in progress")]
    RestoreInProgress,

    /// The workspace is not attached to a host window.
    #[error("workspace is detached")]
    Detached,

    /// The settings store rejected a write.
    #[error("settings write failed: {0}")]
    Settings(#[from] ConfigError),
}

impl LayoutError {
    /// Creates an I/O error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns true if the user chose to stop the operation.
    #[must_use]
    pub const fn is_declined(&self) -> bool {
        matches!(self, Self::Declined)
    }
}

/// Result type for layout operations
pub type LayoutResult<T> = Result<T, LayoutError>;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Failure of a workspace command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// A tree precondition failed.
    #[error(transparent)]
    Split(#[from] SplitError),

    /// Saving, loading or restoring a layout failed.
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

impl CommandError {
    /// Returns true for failures that only mean "nothing to do".
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        match self {
            Self::Split(e) => e.is_precondition(),
            Self::Layout(e) => e.is_declined(),
        }
    }
}
