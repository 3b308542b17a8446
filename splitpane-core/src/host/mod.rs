//! Host collaborator interfaces
//!
//! The engine never owns documents, views or dialogs. Everything it needs
//! from the application embedding it goes through the traits below:
//!
//! - [`DocumentHost`] - documents, views and their on-screen placement
//! - [`SettingsStore`] - flat string settings grouped by section
//! - [`UserPrompt`] - blocking confirmations and warnings
//!
//! [`Host`] bundles all three and is implemented automatically.

pub mod memory;
mod settings;

use std::path::{Path, PathBuf};

use crate::config::TabSettings;
use crate::error::ConfigResult;
use crate::split::{CanvasState, DocumentId, Rect, TabEntry, ViewId, format_tab_label};

pub use memory::MemoryHost;
pub use settings::{FileSettings, MemorySettings};

/// Documents and views provided by the host application.
pub trait DocumentHost {
    /// View that currently has focus.
    fn active_view(&self) -> Option<ViewId>;

    /// All open views in host order.
    fn views(&self) -> Vec<ViewId>;

    /// Document shown by `view`.
    fn view_document(&self, view: ViewId) -> Option<DocumentId>;

    /// All open documents.
    fn documents(&self) -> Vec<DocumentId>;

    /// Backing file of `document`, `None` for unsaved documents.
    fn document_path(&self, document: DocumentId) -> Option<PathBuf>;

    /// Returns true if `document` has unsaved changes.
    fn document_modified(&self, document: DocumentId) -> bool;

    /// Label the host would show for `document`.
    fn document_label(&self, document: DocumentId) -> String;

    /// Returns true if `path` exists on disk.
    fn file_exists(&self, path: &Path) -> bool {
        path.exists()
    }

    /// Opens the file at `path` as a new document.
    fn open_document(&mut self, path: &Path) -> Option<DocumentId>;

    /// Creates a new view of `document` and makes it active.
    fn add_view(&mut self, document: DocumentId) -> Option<ViewId>;

    /// Closes `view`. Returns false if the host (or the user) kept it open.
    fn close_view(&mut self, view: ViewId) -> bool;

    /// Gives `view` the focus.
    fn activate_view(&mut self, view: ViewId);

    /// Places `view` at `rect` in workspace coordinates.
    fn place_view(&mut self, view: ViewId, rect: Rect, visible: bool);

    /// Zoom and scroll state of `view`.
    fn canvas_state(&self, view: ViewId) -> Option<CanvasState>;

    /// Applies a zoom and scroll state to `view`.
    fn apply_canvas(&mut self, view: ViewId, state: CanvasState);

    /// Builds a tab entry describing `view`.
    fn tab_entry(&self, view: ViewId, settings: &TabSettings) -> Option<TabEntry> {
        let document = self.view_document(view)?;
        let path = self.document_path(document);
        let modified = self.document_modified(document);
        let label = format_tab_label(
            &self.document_label(document),
            path.as_deref(),
            modified,
            settings,
        );
        let mut entry = TabEntry::new(view, document)
            .with_label(label)
            .with_modified(modified);
        entry.path = path;
        Some(entry)
    }
}

/// Flat string settings grouped by section.
pub trait SettingsStore {
    /// Reads `key` in `group`.
    fn read_setting(&self, group: &str, key: &str) -> Option<String>;

    /// Writes `key` in `group`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be persisted.
    fn write_setting(&mut self, group: &str, key: &str, value: &str) -> ConfigResult<()>;
}

/// Blocking user interaction.
pub trait UserPrompt {
    /// Asks a yes/no question. Returns true for yes.
    fn confirm(&mut self, title: &str, message: &str) -> bool;

    /// Shows a warning.
    fn warn(&mut self, title: &str, message: &str);

    /// Shows a transient notification.
    fn notify(&mut self, _message: &str) {}
}

/// Everything the workspace needs from its host.
pub trait Host: DocumentHost + SettingsStore + UserPrompt {}

impl<T: DocumentHost + SettingsStore + UserPrompt> Host for T {}
