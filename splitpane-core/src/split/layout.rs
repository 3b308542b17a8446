//! Saved layout format
//!
//! A layout is a JSON document mirroring the pane tree:
//!
//! ```json
//! {"state": "s", "winWidth": 1200, "winHeight": 800, "locked": false,
//!  "layout": {"state": "v", "splitSize": 0,
//!             "first":  {"state": "c", "files": ["/x.png"], "active": 0,
//!                        "splitSize": 476, "isActiveSplit": true},
//!             "second": {"state": "c", "files": ["/y.png"], "active": 0,
//!                        "splitSize": 716, "isActiveSplit": false}}}
//! ```
//!
//! `splitSize` is the node's extent along its parent's axis (0 for the
//! top node). Only documents backed by an existing file are recorded.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, LayoutResult};

use super::tree::PaneTree;
use super::types::{Orientation, PaneId};

/// Extension appended to layout files that lack it.
pub const LAYOUT_EXTENSION: &str = "json";

/// Marker for the top-level object (`"state": "s"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RootTag {
    /// The only valid value
    #[default]
    #[serde(rename = "s")]
    Saved,
}

/// A whole saved layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedLayout {
    /// Always `"s"`
    pub state: RootTag,
    /// Tree description, absent for an empty workspace
    pub layout: Option<LayoutNode>,
    /// Container width when saved
    pub win_width: i32,
    /// Container height when saved
    pub win_height: i32,
    /// Whether the layout was locked
    #[serde(default)]
    pub locked: bool,
    /// File the layout was loaded from or saved to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// One node of a saved layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state")]
pub enum LayoutNode {
    /// A leaf and its files
    #[serde(rename = "c")]
    Collapsed(CollapsedLayout),
    /// Side-by-side children
    #[serde(rename = "v")]
    Vertical(SplitLayout),
    /// Stacked children
    #[serde(rename = "h")]
    Horizontal(SplitLayout),
}

/// Active tab of a saved leaf: an index into `files`, or a file path in
/// layouts written by older versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActiveTab {
    /// Index into the file list, -1 for none
    Index(i64),
    /// Path of the active file
    File(String),
}

/// A saved leaf.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollapsedLayout {
    /// File paths in tab order
    #[serde(default)]
    pub files: Vec<String>,
    /// Active tab
    #[serde(default)]
    pub active: Option<ActiveTab>,
    /// Extent along the parent's axis
    #[serde(default)]
    pub split_size: i32,
    /// Whether this leaf held the active pane
    #[serde(default)]
    pub is_active_split: bool,
}

impl CollapsedLayout {
    /// Index of the active file in `files`.
    #[must_use]
    pub fn active_index(&self) -> Option<usize> {
        match self.active.as_ref()? {
            ActiveTab::Index(index) => usize::try_from(*index)
                .ok()
                .filter(|index| *index < self.files.len()),
            ActiveTab::File(file) => self.files.iter().position(|f| f == file),
        }
    }
}

/// A saved branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitLayout {
    /// First child (left or top)
    pub first: Box<LayoutNode>,
    /// Second child (right or bottom)
    pub second: Box<LayoutNode>,
    /// Extent along the parent's axis
    #[serde(default)]
    pub split_size: i32,
}

/// Files referenced by a layout, split by existence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutFiles {
    /// Files found on disk, in layout order without duplicates
    pub existing: Vec<String>,
    /// Files not found, in layout order without duplicates
    pub missing: Vec<String>,
}

impl LayoutNode {
    /// Extent along the parent's axis.
    #[must_use]
    pub const fn split_size(&self) -> i32 {
        match self {
            Self::Collapsed(leaf) => leaf.split_size,
            Self::Vertical(split) | Self::Horizontal(split) => split.split_size,
        }
    }

    /// Orientation of a branch node.
    #[must_use]
    pub const fn orientation(&self) -> Option<Orientation> {
        match self {
            Self::Collapsed(_) => None,
            Self::Vertical(_) => Some(Orientation::Vertical),
            Self::Horizontal(_) => Some(Orientation::Horizontal),
        }
    }

    /// Children of a branch node.
    #[must_use]
    pub fn children(&self) -> Option<(&Self, &Self)> {
        match self {
            Self::Collapsed(_) => None,
            Self::Vertical(split) | Self::Horizontal(split) => Some((&split.first, &split.second)),
        }
    }

    /// Saved leaves in depth-first order.
    #[must_use]
    pub fn leaves(&self) -> Vec<&CollapsedLayout> {
        let mut leaves = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                Self::Collapsed(leaf) => leaves.push(leaf),
                Self::Vertical(split) | Self::Horizontal(split) => {
                    stack.push(&split.second);
                    stack.push(&split.first);
                }
            }
        }
        leaves
    }

    /// Every file in depth-first order, duplicates included.
    #[must_use]
    pub fn files(&self) -> Vec<&str> {
        self.leaves()
            .into_iter()
            .flat_map(|leaf| leaf.files.iter().map(String::as_str))
            .collect()
    }
}

impl SavedLayout {
    /// Captures `tree` as a layout.
    ///
    /// Tabs without a backing file, or whose file `exists` rejects, are left
    /// out. `active_pane` is recorded as the active split.
    pub fn capture(
        tree: &PaneTree,
        active_pane: Option<PaneId>,
        locked: bool,
        exists: impl Fn(&Path) -> bool,
    ) -> Self {
        let container = tree.container();
        Self {
            state: RootTag::Saved,
            layout: Some(capture_node(tree, tree.root(), active_pane, &exists)),
            win_width: container.width,
            win_height: container.height,
            locked,
            path: None,
        }
    }

    /// Parses a layout document.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not a valid layout.
    pub fn from_json(json: &str) -> LayoutResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the layout to compact JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> LayoutResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Reads a layout file. The returned layout remembers `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn read(path: &Path) -> LayoutResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| LayoutError::io(path, e))?;
        let mut layout = Self::from_json(&content)?;
        layout.path = Some(path.to_path_buf());
        Ok(layout)
    }

    /// Writes the layout as pretty JSON to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn write(&self, path: &Path) -> LayoutResult<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| LayoutError::io(path, e))
    }

    /// Splits the referenced files into existing and missing ones.
    pub fn files(&self, exists: impl Fn(&Path) -> bool) -> LayoutFiles {
        let mut files = LayoutFiles::default();
        let Some(node) = &self.layout else {
            return files;
        };
        for file in node.files() {
            let bucket = if exists(Path::new(file)) {
                &mut files.existing
            } else {
                &mut files.missing
            };
            if !bucket.iter().any(|known| known == file) {
                bucket.push(file.to_string());
            }
        }
        files
    }

    /// Returns true if no leaf references a file.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layout
            .as_ref()
            .is_none_or(|node| node.files().is_empty())
    }
}

fn capture_node(
    tree: &PaneTree,
    id: PaneId,
    active_pane: Option<PaneId>,
    exists: &impl Fn(&Path) -> bool,
) -> LayoutNode {
    let split_size = tree.split_size(id);
    if let Some((first, second)) = tree.children(id) {
        let split = SplitLayout {
            first: Box::new(capture_node(tree, first, active_pane, exists)),
            second: Box::new(capture_node(tree, second, active_pane, exists)),
            split_size,
        };
        return match tree.orientation(id) {
            Some(Orientation::Horizontal) => LayoutNode::Horizontal(split),
            _ => LayoutNode::Vertical(split),
        };
    }

    let Some(tabs) = tree.tabs(id).filter(|tabs| !tabs.is_empty()) else {
        return LayoutNode::Collapsed(CollapsedLayout {
            files: Vec::new(),
            active: Some(ActiveTab::Index(-1)),
            split_size,
            is_active_split: false,
        });
    };

    let active_path = tabs.current().and_then(|tab| tab.path.as_deref());
    let mut files = Vec::new();
    let mut active = -1;
    for path in tabs.iter().filter_map(|tab| tab.path.as_deref()) {
        if !exists(path) {
            continue;
        }
        if active < 0 && active_path == Some(path) {
            active = files.len() as i64;
        }
        files.push(path.to_string_lossy().into_owned());
    }
    LayoutNode::Collapsed(CollapsedLayout {
        files,
        active: Some(ActiveTab::Index(active)),
        split_size,
        is_active_split: active_pane == Some(id),
    })
}

/// Appends `.json` unless `path` already ends with it (any case).
#[must_use]
pub fn with_json_extension(path: &Path) -> PathBuf {
    let has_extension = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(LAYOUT_EXTENSION));
    if has_extension {
        return path.to_path_buf();
    }
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(LAYOUT_EXTENSION);
    PathBuf::from(name)
}

/// Translates a saved extent to the current container size along the axis
/// of `orientation`.
#[must_use]
pub fn translate_size(
    size: i32,
    orientation: Orientation,
    saved: (i32, i32),
    current: (i32, i32),
) -> i32 {
    let (saved, current) = match orientation {
        Orientation::Vertical => (saved.0, current.0),
        Orientation::Horizontal => (saved.1, current.1),
    };
    if saved <= 0 || saved == current {
        return size;
    }
    (f64::from(size) / f64::from(saved) * f64::from(current)).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::split::geometry::LayoutMetrics;
    use crate::split::tabs::TabEntry;
    use crate::split::types::{DocumentId, Rect, ViewId};

    fn entry(path: &str) -> TabEntry {
        TabEntry::new(ViewId::new(), DocumentId::new()).with_path(path)
    }

    #[test]
    fn test_parse_format() {
        let json = r#"{
            "state": "s", "winWidth": 1000, "winHeight": 600, "locked": true,
            "layout": {"state": "v", "splitSize": 0,
                "first": {"state": "c", "files": ["/x.png"], "active": 0,
                          "splitSize": 396, "isActiveSplit": false},
                "second": {"state": "h", "splitSize": 596,
                    "first": {"state": "c", "files": [], "active": -1, "splitSize": 100},
                    "second": {"state": "c", "files": ["/y.png", "/z.png"],
                               "active": "/z.png", "splitSize": 492}}}
        }"#;
        let layout = SavedLayout::from_json(json).unwrap();
        assert!(layout.locked);
        assert_eq!(layout.path, None);
        let node = layout.layout.as_ref().unwrap();
        assert_eq!(node.orientation(), Some(Orientation::Vertical));
        assert_eq!(node.files(), vec!["/x.png", "/y.png", "/z.png"]);
        let leaves = node.leaves();
        assert_eq!(leaves[0].active_index(), Some(0));
        assert_eq!(leaves[1].active_index(), None);
        assert_eq!(leaves[2].active_index(), Some(1));
    }

    #[test]
    fn test_rejects_unknown_state() {
        let json = r#"{"state": "s", "winWidth": 1, "winHeight": 1,
                       "layout": {"state": "x", "splitSize": 0}}"#;
        assert!(matches!(
            SavedLayout::from_json(json),
            Err(LayoutError::Json(_))
        ));
        assert!(SavedLayout::from_json(r#"{"state": "c"}"#).is_err());
    }

    #[test]
    fn test_serialized_keys() {
        let layout = SavedLayout {
            state: RootTag::Saved,
            layout: Some(LayoutNode::Collapsed(CollapsedLayout {
                files: vec!["/a.png".to_string()],
                active: Some(ActiveTab::Index(0)),
                split_size: 0,
                is_active_split: true,
            })),
            win_width: 800,
            win_height: 600,
            locked: false,
            path: None,
        };
        let value: serde_json::Value = serde_json::from_str(&layout.to_json().unwrap()).unwrap();
        assert_eq!(value["state"], "s");
        assert_eq!(value["winWidth"], 800);
        assert_eq!(value["layout"]["state"], "c");
        assert_eq!(value["layout"]["isActiveSplit"], true);
        assert_eq!(value["layout"]["splitSize"], 0);
        assert!(value.get("path").is_none());
    }

    #[test]
    fn test_capture_tree() {
        let mut tree = PaneTree::new(8);
        let root = tree.root();
        tree.tabs_mut(root).unwrap().push(entry("/x.png"), true);
        tree.layout(Rect::new(0, 0, 1000, 600), LayoutMetrics::default(), false);
        let (_, second) = tree.split_leaf(root, Orientation::Vertical, false).unwrap();
        let tabs = tree.tabs_mut(second).unwrap();
        tabs.push(entry("/y.png"), true);
        tabs.push(entry("/z.png"), true);
        tabs.push(TabEntry::new(ViewId::new(), DocumentId::new()), false);
        tree.layout(Rect::new(0, 0, 1000, 600), LayoutMetrics::default(), true);

        let layout = SavedLayout::capture(&tree, Some(second), false, |_| true);
        assert_eq!((layout.win_width, layout.win_height), (1000, 600));
        let node = layout.layout.unwrap();
        assert_eq!(node.split_size(), 0);
        let leaves = node.leaves();
        assert_eq!(leaves[0].files, vec!["/x.png"]);
        assert_eq!(leaves[0].split_size, 496);
        assert!(!leaves[0].is_active_split);
        assert_eq!(leaves[1].files, vec!["/y.png", "/z.png"]);
        assert_eq!(leaves[1].active_index(), Some(1));
        assert!(leaves[1].is_active_split);
    }

    #[test]
    fn test_capture_skips_missing_files() {
        let mut tree = PaneTree::new(8);
        let root = tree.root();
        let tabs = tree.tabs_mut(root).unwrap();
        tabs.push(entry("/gone.png"), true);
        tabs.push(entry("/kept.png"), false);
        let layout = SavedLayout::capture(&tree, None, false, |p| p != Path::new("/gone.png"));
        let leaves = layout.layout.as_ref().map(LayoutNode::leaves).unwrap();
        assert_eq!(leaves[0].files, vec!["/kept.png"]);
        assert_eq!(leaves[0].active_index(), None);
    }

    #[test]
    fn test_files_partition_and_dedup() {
        let json = r#"{"state": "s", "winWidth": 10, "winHeight": 10,
            "layout": {"state": "h", "splitSize": 0,
                "first": {"state": "c", "files": ["/a", "/b"], "splitSize": 1},
                "second": {"state": "c", "files": ["/b", "/c"], "splitSize": 1}}}"#;
        let layout = SavedLayout::from_json(json).unwrap();
        let files = layout.files(|p| p != Path::new("/b"));
        assert_eq!(files.existing, vec!["/a", "/c"]);
        assert_eq!(files.missing, vec!["/b"]);
        assert!(!layout.is_empty());
    }

    #[test]
    fn test_json_extension() {
        assert_eq!(
            with_json_extension(Path::new("/tmp/work")),
            PathBuf::from("/tmp/work.json")
        );
        assert_eq!(
            with_json_extension(Path::new("/tmp/work.JSON")),
            PathBuf::from("/tmp/work.JSON")
        );
        assert_eq!(
            with_json_extension(Path::new("/tmp/work.v2")),
            PathBuf::from("/tmp/work.v2.json")
        );
    }

    #[test]
    fn test_translate_size() {
        assert_eq!(translate_size(400, Orientation::Vertical, (1000, 600), (1000, 600)), 400);
        assert_eq!(translate_size(400, Orientation::Vertical, (1000, 600), (500, 600)), 200);
        assert_eq!(translate_size(300, Orientation::Horizontal, (1000, 600), (1000, 900)), 450);
        assert_eq!(translate_size(300, Orientation::Horizontal, (0, 0), (1000, 900)), 300);
    }

    #[test]
    fn test_read_write_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.json");
        let layout = SavedLayout {
            state: RootTag::Saved,
            layout: None,
            win_width: 10,
            win_height: 20,
            locked: true,
            path: None,
        };
        layout.write(&path).unwrap();
        let read = SavedLayout::read(&path).unwrap();
        assert_eq!(read.path.as_deref(), Some(path.as_path()));
        assert!(read.locked);
        assert!(read.is_empty());
        assert!(matches!(
            SavedLayout::read(&dir.path().join("missing.json")),
            Err(LayoutError::Io { .. })
        ));
    }
}
