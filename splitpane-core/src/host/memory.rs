//! In-memory host for tests and headless use
//!
//! [`MemoryHost`] simulates a document application: a set of files that
//! "exist", documents opened from them, views on those documents, a
//! settings store and scripted answers for prompts. Every prompt and
//! warning is recorded so tests can assert on them.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::ConfigResult;
use crate::split::{CanvasState, DocumentId, Rect, ViewId};

use super::settings::MemorySettings;
use super::{DocumentHost, SettingsStore, UserPrompt};

/// Default simulated document size in pixels.
pub const DEFAULT_DOCUMENT_SIZE: (f64, f64) = (1000.0, 800.0);

/// A simulated document.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryDocument {
    /// Identity
    pub id: DocumentId,
    /// Backing file
    pub path: Option<PathBuf>,
    /// Unsaved changes
    pub modified: bool,
    /// Host label
    pub label: String,
}

/// A simulated view.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryView {
    /// Identity
    pub id: ViewId,
    /// Document shown
    pub document: DocumentId,
    /// Last placement
    pub rect: Rect,
    /// Whether the view was last placed visible
    pub visible: bool,
    /// Zoom and scroll
    pub canvas: CanvasState,
}

/// Scriptable in-memory [`Host`](super::Host).
#[derive(Debug, Clone)]
pub struct MemoryHost {
    files: HashSet<PathBuf>,
    documents: Vec<MemoryDocument>,
    views: Vec<MemoryView>,
    active: Option<ViewId>,
    declined: HashSet<ViewId>,
    settings: MemorySettings,
    confirm_answer: bool,
    prompts: Vec<String>,
    warnings: Vec<String>,
    notifications: Vec<String>,
    opened: Vec<PathBuf>,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self {
            files: HashSet::new(),
            documents: Vec::new(),
            views: Vec::new(),
            active: None,
            declined: HashSet::new(),
            settings: MemorySettings::new(),
            confirm_answer: true,
            prompts: Vec::new(),
            warnings: Vec::new(),
            notifications: Vec::new(),
            opened: Vec::new(),
        }
    }
}

impl MemoryHost {
    /// Creates a host with no files and no documents.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a host where each of `files` exists.
    #[must_use]
    pub fn with_files<I, P>(files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut host = Self::new();
        for file in files {
            host.add_file(file);
        }
        host
    }

    /// Makes `path` exist.
    pub fn add_file(&mut self, path: impl Into<PathBuf>) {
        self.files.insert(path.into());
    }

    /// Makes `path` disappear.
    pub fn remove_file(&mut self, path: &Path) {
        self.files.remove(path);
    }

    /// Opens `path` and a view on it, as if the user did.
    pub fn open_file(&mut self, path: &Path) -> Option<(DocumentId, ViewId)> {
        let document = self.open_document(path)?;
        let view = self.add_view(document)?;
        Some((document, view))
    }

    /// Creates an unsaved document and a view on it.
    pub fn new_document(&mut self, label: &str) -> (DocumentId, ViewId) {
        let id = DocumentId::new();
        self.documents.push(MemoryDocument {
            id,
            path: None,
            modified: true,
            label: label.to_string(),
        });
        let view = self.push_view(id);
        (id, view)
    }

    /// Sets the modified flag of `document`.
    pub fn set_modified(&mut self, document: DocumentId, modified: bool) {
        if let Some(doc) = self.documents.iter_mut().find(|d| d.id == document) {
            doc.modified = modified;
        }
    }

    /// Makes `close_view` refuse to close `view`.
    pub fn decline_close(&mut self, view: ViewId) {
        self.declined.insert(view);
    }

    /// Answer returned by every later `confirm`.
    pub fn set_confirm_answer(&mut self, answer: bool) {
        self.confirm_answer = answer;
    }

    /// Simulated view state.
    #[must_use]
    pub fn view(&self, view: ViewId) -> Option<&MemoryView> {
        self.views.iter().find(|v| v.id == view)
    }

    /// Simulated document state.
    #[must_use]
    pub fn document(&self, document: DocumentId) -> Option<&MemoryDocument> {
        self.documents.iter().find(|d| d.id == document)
    }

    /// Document opened from `path`.
    #[must_use]
    pub fn document_by_path(&self, path: &Path) -> Option<DocumentId> {
        self.documents
            .iter()
            .find(|d| d.path.as_deref() == Some(path))
            .map(|d| d.id)
    }

    /// Views showing `document`.
    #[must_use]
    pub fn views_of(&self, document: DocumentId) -> Vec<ViewId> {
        self.views
            .iter()
            .filter(|v| v.document == document)
            .map(|v| v.id)
            .collect()
    }

    /// Messages passed to `confirm`, in order.
    #[must_use]
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// Messages passed to `warn`, in order.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Messages passed to `notify`, in order.
    #[must_use]
    pub fn notifications(&self) -> &[String] {
        &self.notifications
    }

    /// Files opened through `open_document`, in order.
    #[must_use]
    pub fn opened(&self) -> &[PathBuf] {
        &self.opened
    }

    fn push_view(&mut self, document: DocumentId) -> ViewId {
        let id = ViewId::new();
        self.views.push(MemoryView {
            id,
            document,
            rect: Rect::default(),
            visible: false,
            canvas: CanvasState::new(DEFAULT_DOCUMENT_SIZE.0, DEFAULT_DOCUMENT_SIZE.1),
        });
        self.active = Some(id);
        id
    }
}

impl DocumentHost for MemoryHost {
    fn active_view(&self) -> Option<ViewId> {
        self.active
    }

    fn views(&self) -> Vec<ViewId> {
        self.views.iter().map(|v| v.id).collect()
    }

    fn view_document(&self, view: ViewId) -> Option<DocumentId> {
        self.view(view).map(|v| v.document)
    }

    fn documents(&self) -> Vec<DocumentId> {
        self.documents.iter().map(|d| d.id).collect()
    }

    fn document_path(&self, document: DocumentId) -> Option<PathBuf> {
        self.document(document).and_then(|d| d.path.clone())
    }

    fn document_modified(&self, document: DocumentId) -> bool {
        self.document(document).is_some_and(|d| d.modified)
    }

    fn document_label(&self, document: DocumentId) -> String {
        self.document(document)
            .map(|d| d.label.clone())
            .unwrap_or_default()
    }

    fn file_exists(&self, path: &Path) -> bool {
        self.files.contains(path)
    }

    fn open_document(&mut self, path: &Path) -> Option<DocumentId> {
        if !self.files.contains(path) {
            return None;
        }
        let id = DocumentId::new();
        let label = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.documents.push(MemoryDocument {
            id,
            path: Some(path.to_path_buf()),
            modified: false,
            label,
        });
        self.opened.push(path.to_path_buf());
        Some(id)
    }

    fn add_view(&mut self, document: DocumentId) -> Option<ViewId> {
        self.document(document)?;
        Some(self.push_view(document))
    }

    fn close_view(&mut self, view: ViewId) -> bool {
        if self.declined.contains(&view) {
            return false;
        }
        let Some(index) = self.views.iter().position(|v| v.id == view) else {
            return true;
        };
        let document = self.views.remove(index).document;
        if !self.views.iter().any(|v| v.document == document) {
            self.documents.retain(|d| d.id != document);
        }
        if self.active == Some(view) {
            self.active = self.views.last().map(|v| v.id);
        }
        true
    }

    fn activate_view(&mut self, view: ViewId) {
        if self.view(view).is_some() {
            self.active = Some(view);
        }
    }

    fn place_view(&mut self, view: ViewId, rect: Rect, visible: bool) {
        if let Some(v) = self.views.iter_mut().find(|v| v.id == view) {
            v.rect = rect;
            v.visible = visible;
        }
    }

    fn canvas_state(&self, view: ViewId) -> Option<CanvasState> {
        self.view(view).map(|v| v.canvas)
    }

    fn apply_canvas(&mut self, view: ViewId, state: CanvasState) {
        if let Some(v) = self.views.iter_mut().find(|v| v.id == view) {
            v.canvas = state;
        }
    }
}

impl SettingsStore for MemoryHost {
    fn read_setting(&self, group: &str, key: &str) -> Option<String> {
        self.settings.read_setting(group, key)
    }

    fn write_setting(&mut self, group: &str, key: &str, value: &str) -> ConfigResult<()> {
        self.settings.write_setting(group, key, value)
    }
}

impl UserPrompt for MemoryHost {
    fn confirm(&mut self, _title: &str, message: &str) -> bool {
        self.prompts.push(message.to_string());
        self.confirm_answer
    }

    fn warn(&mut self, _title: &str, message: &str) {
        self.warnings.push(message.to_string());
    }

    fn notify(&mut self, message: &str) {
        self.notifications.push(message.to_string());
    }
}
