//! Split-pane layout engine
//!
//! This module arranges the document views of one host window as a binary
//! tree of panes. Leaves carry a tab strip of views; branches divide their
//! rectangle between two children with a draggable divider.
//!
//! # Architecture
//!
//! - **Arena tree**: Panes live in a generational arena and are addressed by
//!   [`PaneId`] handles that go stale when the pane is removed
//! - **Absolute dividers**: Divider offsets are workspace coordinates, so
//!   moving one divider only resizes the panes next to it
//! - **Viewport preservation**: Canvas zoom and scroll are re-anchored from
//!   a snapshot taken when a resize starts
//! - **Phased restore**: Saved layouts are rebuilt in timer-driven steps so
//!   the host can repaint in between
//!
//! # Module Structure
//!
//! - `types` - Identifiers and geometry primitives (`PaneId`, `ViewId`, `Rect`, `Edge`)
//! - `tree` - Pane arena (`PaneTree`, `LeafPane`, `BranchPane`)
//! - `divider` - Divider position and clamping (`Divider`)
//! - `geometry` - Layout passes (`LayoutMetrics`, `ResizeReport`)
//! - `tabs` - Tab strips and labels (`TabStrip`, `TabEntry`)
//! - `viewport` - Canvas re-anchoring (`CanvasState`, `ViewportSnapshot`)
//! - `drag` - Tab and divider drags (`TabDrag`, `DividerDrag`, `DropAction`)
//! - `layout` - JSON layout format (`SavedLayout`)
//! - `restore` - Phased layout restore (`RestoreJob`)
//! - `scheduler` - Deadline queue for timers (`Scheduler`, `Task`)
//! - `commands` - Commands and the pane context menu (`Command`, `MenuEntry`)
//! - `workspace` - Controller tying it all to a host (`SplitWorkspace`)
//! - `error` - Error types (`SplitError`, `RemoveResult`)
//!
//! # Example
//!
//! ```
//! use splitpane_core::split::{Orientation, PaneTree, Rect, LayoutMetrics};
//!
//! let mut tree = PaneTree::new(8);
//! let metrics = LayoutMetrics { tab_height: 30, min_pane_size: 80 };
//! tree.layout(Rect::new(0, 0, 1000, 600), metrics, true);
//!
//! let (first, second) = tree
//!     .split_leaf(tree.root(), Orientation::Vertical, false)
//!     .unwrap();
//! tree.layout(Rect::new(0, 0, 1000, 600), metrics, true);
//!
//! assert!(tree.is_split());
//! assert_eq!(tree.rect(first).unwrap().width, 496);
//! assert_eq!(tree.rect(second).unwrap().x, 504);
//! ```

mod commands;
mod divider;
mod drag;
mod error;
mod geometry;
mod layout;
mod restore;
mod scheduler;
mod tabs;
mod tree;
mod types;
mod viewport;
mod workspace;

pub use commands::{
    Command, MenuAction, MenuEntry, MenuItem, TabSource, context_menu, layout_name,
};
pub use divider::Divider;
pub use drag::{
    BETWEEN_PREVIEW_EXTENT, BETWEEN_PREVIEW_OFFSET, DividerDrag, DragButton, DragMotion,
    DragPhase, DragPreview, DropAction, DropCandidate, DropRules, TabDrag, classify,
};
pub use error::{RemoveResult, SplitError};
pub use geometry::{LayoutMetrics, LeafGeometry, ResizeReport};
pub use layout::{
    ActiveTab, CollapsedLayout, LAYOUT_EXTENSION, LayoutFiles, LayoutNode, RootTag, SavedLayout,
    SplitLayout, translate_size, with_json_extension,
};
pub use restore::{RestoreJob, RestoreOptions, RestorePhase, RestoreReport};
pub use scheduler::{Scheduler, Task};
pub use tabs::{
    TabEntry, TabSelection, TabStrip, UNSAVED_LABEL, WHEEL_STEP, format_tab_label, truncate_label,
};
pub use tree::{BranchPane, HitZone, LeafPane, NodeKind, PaneNode, PaneTree};
pub use types::{DocumentId, Edge, Orientation, PaneId, Point, Rect, TabId, ViewId};
pub use viewport::{CanvasState, RectF, ViewportSnapshot, preserve, states_match};
pub use workspace::{
    MISSING_FILES_WARNING, NOTHING_TO_RESTORE_WARNING, OPEN_FAILED_WARNING, PROMPT_TITLE,
    RESIZE_SETTLE, RESTORE_DISABLED, RESTORE_LAYOUT_KEY, RESTORE_LAYOUT_PATH_KEY,
    SAVE_FAILED_WARNING, SETTINGS_GROUP, SplitWorkspace, UNSAVED_CHANGES_PROMPT,
    UNSAVED_DOCUMENTS_PROMPT, ViewMeta,
};
