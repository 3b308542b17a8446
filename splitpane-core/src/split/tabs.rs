//! Tab strip of a leaf pane
//!
//! A [`TabStrip`] is the ordered list of document views bound to one leaf,
//! with an active index. Entries are moved between strips, never shared.

use std::path::{Path, PathBuf};

use crate::config::TabSettings;

use super::types::{DocumentId, TabId, ViewId};

/// Label shown for documents that have no file on disk.
pub const UNSAVED_LABEL: &str = "[Not saved]";

/// Wheel delta needed to switch to the neighbouring tab.
pub const WHEEL_STEP: i32 = 100;

/// Tabs a move or duplicate operation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TabSelection {
    /// The tab at this index
    One(usize),
    /// Every tab of the strip
    All,
}

/// One open document view inside a tab strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabEntry {
    /// Stable identity of the entry
    pub id: TabId,
    /// Host view shown by this tab
    pub view: ViewId,
    /// Document the view belongs to
    pub document: DocumentId,
    /// Display text
    pub label: String,
    /// Whether the document has unsaved changes
    pub modified: bool,
    /// Backing file, if the document was saved
    pub path: Option<PathBuf>,
    /// Optional icon name
    pub icon: Option<String>,
}

impl TabEntry {
    /// Creates an entry for a view with an empty label.
    #[must_use]
    pub fn new(view: ViewId, document: DocumentId) -> Self {
        Self {
            id: TabId::new(),
            view,
            document,
            label: String::new(),
            modified: false,
            path: None,
            icon: None,
        }
    }

    /// Sets the backing file path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the display label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the modified flag.
    #[must_use]
    pub const fn with_modified(mut self, modified: bool) -> Self {
        self.modified = modified;
        self
    }

    /// File name component of the backing path.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.path
            .as_deref()
            .and_then(Path::file_name)
            .and_then(|name| name.to_str())
    }
}

/// Builds the tab label for a document.
///
/// With `hide_filesize` the host label is replaced by the bare file name
/// (or [`UNSAVED_LABEL`]) plus ` *` for modified documents. The result keeps
/// the last `max_chars` characters, prefixed by `…` when `ellipsis` is set.
#[must_use]
pub fn format_tab_label(
    host_label: &str,
    path: Option<&Path>,
    modified: bool,
    settings: &TabSettings,
) -> String {
    let text = if settings.hide_filesize {
        let name = path
            .and_then(Path::file_name)
            .and_then(|name| name.to_str())
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(UNSAVED_LABEL);
        if modified {
            format!("{name} *")
        } else {
            name.to_string()
        }
    } else {
        host_label.to_string()
    };
    truncate_label(&text, settings.max_chars, settings.ellipsis)
}

/// Keeps the last `max_chars` characters of `text`.
#[must_use]
pub fn truncate_label(text: &str, max_chars: usize, ellipsis: bool) -> String {
    let count = text.chars().count();
    if count <= max_chars {
        return text.to_string();
    }
    let tail: String = text.chars().skip(count - max_chars).collect();
    if ellipsis { format!("…{tail}") } else { tail }
}

/// Ordered tab entries of one leaf pane.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabStrip {
    entries: Vec<TabEntry>,
    current: Option<usize>,
    wheel_accumulator: i32,
}

impl TabStrip {
    /// Creates an empty strip.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tabs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the strip has no tabs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the entries in display order.
    pub fn iter(&self) -> impl Iterator<Item = &TabEntry> {
        self.entries.iter()
    }

    /// Entry at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&TabEntry> {
        self.entries.get(index)
    }

    /// Mutable entry at `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut TabEntry> {
        self.entries.get_mut(index)
    }

    /// Index of the active tab.
    #[must_use]
    pub const fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// The active tab.
    #[must_use]
    pub fn current(&self) -> Option<&TabEntry> {
        self.current.and_then(|index| self.entries.get(index))
    }

    /// Activates the tab at `index`. Returns false if out of range.
    pub fn set_current(&mut self, index: usize) -> bool {
        if index < self.entries.len() {
            self.current = Some(index);
            true
        } else {
            false
        }
    }

    /// Appends an entry and returns its index.
    ///
    /// The first entry of an empty strip always becomes current.
    pub fn push(&mut self, entry: TabEntry, make_current: bool) -> usize {
        self.entries.push(entry);
        let index = self.entries.len() - 1;
        if make_current || self.current.is_none() {
            self.current = Some(index);
        }
        index
    }

    /// Inserts an entry at `index` (clamped to the end) and returns the index used.
    pub fn insert(&mut self, index: usize, entry: TabEntry, make_current: bool) -> usize {
        let index = index.min(self.entries.len());
        self.entries.insert(index, entry);
        match self.current {
            Some(current) if current >= index => self.current = Some(current + 1),
            _ => {}
        }
        if make_current || self.current.is_none() {
            self.current = Some(index);
        }
        index
    }

    /// Removes the entry at `index`.
    ///
    /// Removing the active tab activates its right neighbour, or the left one
    /// when it was the last tab.
    pub fn remove(&mut self, index: usize) -> Option<TabEntry> {
        if index >= self.entries.len() {
            return None;
        }
        let entry = self.entries.remove(index);
        let len = self.entries.len();
        self.current = match self.current {
            _ if len == 0 => None,
            Some(current) if current > index => Some(current - 1),
            Some(current) if current == index => Some(index.min(len - 1)),
            other => other,
        };
        Some(entry)
    }

    /// Removes and returns every entry.
    pub fn take_all(&mut self) -> Vec<TabEntry> {
        self.current = None;
        self.wheel_accumulator = 0;
        std::mem::take(&mut self.entries)
    }

    /// Removes the entry bound to `view`.
    pub fn take_view(&mut self, view: ViewId) -> Option<TabEntry> {
        let index = self.index_of_view(view)?;
        self.remove(index)
    }

    /// Moves a tab to a new position, keeping the active tab active.
    pub fn move_tab(&mut self, from: usize, to: usize) -> bool {
        if from >= self.entries.len() || to >= self.entries.len() {
            return false;
        }
        if from == to {
            return true;
        }
        let active = self.current().map(|entry| entry.id);
        let entry = self.entries.remove(from);
        self.entries.insert(to, entry);
        self.current = active.and_then(|id| self.index_of_tab(id));
        true
    }

    /// Index of the entry bound to `view`.
    #[must_use]
    pub fn index_of_view(&self, view: ViewId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.view == view)
    }

    /// Index of the entry with identity `tab`.
    #[must_use]
    pub fn index_of_tab(&self, tab: TabId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == tab)
    }

    /// Index of the first entry showing `document`.
    #[must_use]
    pub fn index_of_document(&self, document: DocumentId) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.document == document)
    }

    /// Index of the first entry backed by `path`.
    #[must_use]
    pub fn index_of_path(&self, path: &Path) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.path.as_deref() == Some(path))
    }

    /// Returns true if a tab shows `view`.
    #[must_use]
    pub fn contains_view(&self, view: ViewId) -> bool {
        self.index_of_view(view).is_some()
    }

    /// Views of all tabs in display order.
    #[must_use]
    pub fn views(&self) -> Vec<ViewId> {
        self.entries.iter().map(|entry| entry.view).collect()
    }

    /// Views of the tabs left of `index`.
    #[must_use]
    pub fn views_left_of(&self, index: usize) -> Vec<ViewId> {
        self.entries
            .iter()
            .take(index)
            .map(|entry| entry.view)
            .collect()
    }

    /// Views of the tabs right of `index`.
    #[must_use]
    pub fn views_right_of(&self, index: usize) -> Vec<ViewId> {
        self.entries
            .iter()
            .skip(index + 1)
            .map(|entry| entry.view)
            .collect()
    }

    /// Views of every tab except `index`.
    #[must_use]
    pub fn views_except(&self, index: usize) -> Vec<ViewId> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, entry)| entry.view)
            .collect()
    }

    /// Activates the next tab, wrapping to the first.
    pub fn select_next(&mut self) -> Option<usize> {
        if self.entries.is_empty() {
            return None;
        }
        let next = match self.current {
            Some(current) if current + 1 < self.entries.len() => current + 1,
            _ => 0,
        };
        self.current = Some(next);
        Some(next)
    }

    /// Activates the previous tab, wrapping to the last.
    pub fn select_prev(&mut self) -> Option<usize> {
        if self.entries.is_empty() {
            return None;
        }
        let prev = match self.current {
            Some(current) if current > 0 => current - 1,
            _ => self.entries.len() - 1,
        };
        self.current = Some(prev);
        Some(prev)
    }

    /// Accumulates wheel motion and steps one tab per [`WHEEL_STEP`].
    ///
    /// Scrolling up (positive delta) moves left. Does not wrap. Returns the
    /// newly active index when the tab changed.
    pub fn wheel(&mut self, delta: i32) -> Option<usize> {
        self.wheel_accumulator += delta;
        if self.wheel_accumulator.abs() < WHEEL_STEP {
            return None;
        }
        let step: isize = if self.wheel_accumulator > 0 { -1 } else { 1 };
        self.wheel_accumulator = 0;
        let target = self.current? as isize + step;
        if target >= 0 && (target as usize) < self.entries.len() {
            self.current = Some(target as usize);
            self.current
        } else {
            None
        }
    }
}
