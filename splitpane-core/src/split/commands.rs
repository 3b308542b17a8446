//! Host-invokable commands and the pane context menu
//!
//! Provides the data model behind keyboard shortcuts and the menu shown on a
//! pane's tab strip:
//! - [`Command`] - every action the host can ask the workspace to run
//! - [`TabSource`] - tabs moved or copied by a split or transfer
//! - [`context_menu`] - menu entries for a pane, in display order
//!
//! The workspace executes commands through `SplitWorkspace::execute`; the
//! host only renders the menu and reports the chosen entry.

use std::path::{Path, PathBuf};

use super::tabs::{TabSelection, TabStrip};
use super::tree::PaneTree;
use super::types::{Edge, PaneId};

/// Tabs carried into a pane by a split or a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TabSource {
    /// Pane holding the tabs
    pub pane: PaneId,
    /// Which of its tabs
    pub selection: TabSelection,
    /// Copy the tabs into new views instead of moving them
    pub duplicate: bool,
}

impl TabSource {
    /// Moves one tab.
    #[must_use]
    pub const fn tab(pane: PaneId, index: usize) -> Self {
        Self {
            pane,
            selection: TabSelection::One(index),
            duplicate: false,
        }
    }

    /// Moves every tab of `pane`.
    #[must_use]
    pub const fn all(pane: PaneId) -> Self {
        Self {
            pane,
            selection: TabSelection::All,
            duplicate: false,
        }
    }

    /// Copies the tabs instead of moving them.
    #[must_use]
    pub const fn duplicated(mut self) -> Self {
        self.duplicate = true;
        self
    }

    /// Returns true if the source pane would be left without tabs.
    #[must_use]
    pub fn empties_source(&self, tree: &PaneTree) -> bool {
        if self.duplicate {
            return false;
        }
        match self.selection {
            TabSelection::All => true,
            TabSelection::One(_) => tree.tabs(self.pane).map_or(0, TabStrip::len) <= 1,
        }
    }
}

/// An action the host can run on the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Select the next tab of the active pane
    NextTab,
    /// Select the previous tab of the active pane
    PreviousTab,
    /// Open another view of a tab's document in the same pane
    DuplicateTab {
        /// Pane holding the tab
        pane: PaneId,
        /// Tab index
        index: usize,
    },
    /// Split a pane and move a tab into the new side
    SplitMove {
        /// Pane to split
        pane: PaneId,
        /// Tab moved
        index: usize,
        /// Side of the new pane
        side: Edge,
    },
    /// Split a pane and open a copy of a tab in the new side
    SplitDuplicate {
        /// Pane to split
        pane: PaneId,
        /// Tab copied
        index: usize,
        /// Side of the new pane
        side: Edge,
    },
    /// Close every tab right of `index`
    CloseTabsRight {
        /// Pane holding the tabs
        pane: PaneId,
        /// Tab kept
        index: usize,
    },
    /// Close every tab left of `index`
    CloseTabsLeft {
        /// Pane holding the tabs
        pane: PaneId,
        /// Tab kept
        index: usize,
    },
    /// Close every tab except `index`
    CloseOtherTabs {
        /// Pane holding the tabs
        pane: PaneId,
        /// Tab kept
        index: usize,
    },
    /// Close a pane and its views
    ClosePane(PaneId),
    /// Gather every tab into a single pane
    ResetLayout,
    /// Centre every divider
    ResetSizes,
    /// Write the layout to a file and remember the path
    SaveLayoutAs(PathBuf),
    /// Write the layout to the remembered path
    SaveCurrentLayout,
    /// Replace the layout with one read from a file
    LoadLayout(PathBuf),
    /// Flip the lock flag
    ToggleLock,
    /// Lock the layout against structural changes
    Lock,
    /// Unlock the layout
    Unlock,
}

impl Command {
    /// Returns true if the command changes the tree structure and is
    /// therefore refused while the layout is locked.
    #[must_use]
    pub const fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::SplitMove { .. }
                | Self::SplitDuplicate { .. }
                | Self::ClosePane(_)
                | Self::ResetLayout
        )
    }
}

/// What choosing a menu item does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    /// Run a command directly
    Run(Command),
    /// Ask for a file name, then run [`Command::SaveLayoutAs`]
    ChooseSavePath,
    /// Ask for a file, then run [`Command::LoadLayout`]
    ChooseOpenPath,
    /// Show the host's options dialog
    ShowOptions,
}

/// A clickable context-menu item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    /// Display label
    pub label: String,
    /// Action run when chosen
    pub action: MenuAction,
    /// Greyed out when false
    pub enabled: bool,
}

impl MenuItem {
    /// Creates an enabled item.
    #[must_use]
    pub fn new(label: impl Into<String>, action: MenuAction) -> Self {
        Self {
            label: label.into(),
            action,
            enabled: true,
        }
    }

    /// Creates an item running `command`.
    #[must_use]
    pub fn command(label: impl Into<String>, command: Command) -> Self {
        Self::new(label, MenuAction::Run(command))
    }

    /// Sets the enabled flag.
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// One row of the context menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    /// A clickable item
    Item(MenuItem),
    /// A separator line
    Separator,
}

impl MenuEntry {
    /// The item, if this row is one.
    #[must_use]
    pub const fn item(&self) -> Option<&MenuItem> {
        match self {
            Self::Item(item) => Some(item),
            Self::Separator => None,
        }
    }
}

/// Directions offered by the split items, in menu order.
const SPLIT_SIDES: [(Edge, &str); 4] = [
    (Edge::Left, "Left"),
    (Edge::Right, "Right"),
    (Edge::Top, "Above"),
    (Edge::Bottom, "Below"),
];

/// Builds the context menu for `pane`.
///
/// With `tab` set the menu was opened on that tab and carries the tab items
/// (duplicate, split, close ranges); otherwise only the pane and layout
/// items are listed. `layout_path` adds a "Save Current Layout" item named
/// after the file.
#[must_use]
pub fn context_menu(
    tree: &PaneTree,
    pane: PaneId,
    tab: Option<usize>,
    locked: bool,
    layout_path: Option<&Path>,
) -> Vec<MenuEntry> {
    let mut menu = MenuBuilder::default();
    let has_tabs = tree.tabs(pane).map_or(0, TabStrip::len) > 1;

    if let Some(index) = tab {
        menu.push(MenuItem::command(
            "Duplicate Tab",
            Command::DuplicateTab { pane, index },
        ));
        menu.separator();

        for (side, name) in SPLIT_SIDES {
            menu.push(
                MenuItem::command(
                    format!("Split & Move {name}"),
                    Command::SplitMove { pane, index, side },
                )
                .with_enabled(has_tabs && !locked),
            );
        }
        menu.separator();

        for (side, name) in SPLIT_SIDES {
            menu.push(
                MenuItem::command(
                    format!("Split & Duplicate {name}"),
                    Command::SplitDuplicate { pane, index, side },
                )
                .with_enabled(!locked),
            );
        }
        menu.separator();

        menu.push(MenuItem::command(
            "Close Tabs To Right",
            Command::CloseTabsRight { pane, index },
        ));
        menu.push(MenuItem::command(
            "Close Tabs To Left",
            Command::CloseTabsLeft { pane, index },
        ));
        menu.push(MenuItem::command(
            "Close Other Tabs",
            Command::CloseOtherTabs { pane, index },
        ));
    }

    menu.push(
        MenuItem::command("Close Split Pane", Command::ClosePane(pane)).with_enabled(!locked),
    );
    menu.separator();
    menu.push(MenuItem::command("Reset Layout", Command::ResetLayout).with_enabled(!locked));
    menu.push(MenuItem::command("Reset Sizes", Command::ResetSizes).with_enabled(tree.is_split()));
    menu.separator();

    menu.push(MenuItem::new("Save Layout As...", MenuAction::ChooseSavePath));
    if let Some(path) = layout_path {
        menu.push(MenuItem::command(
            format!("Save Current Layout ({})", layout_name(path)),
            Command::SaveCurrentLayout,
        ));
    }
    menu.push(MenuItem::new("Open Layout", MenuAction::ChooseOpenPath));
    if locked {
        menu.push(MenuItem::command("Unlock Layout", Command::Unlock));
    } else {
        menu.push(MenuItem::command("Lock Layout", Command::Lock));
    }
    menu.separator();
    menu.push(MenuItem::new("Options", MenuAction::ShowOptions));
    menu.finish()
}

/// File name of a layout without its `.json` extension.
#[must_use]
pub fn layout_name(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.strip_suffix(".json") {
        Some(stem) => stem.to_string(),
        None => name,
    }
}

#[derive(Default)]
struct MenuBuilder {
    entries: Vec<MenuEntry>,
}

impl MenuBuilder {
    fn push(&mut self, item: MenuItem) {
        self.entries.push(MenuEntry::Item(item));
    }

    fn separator(&mut self) {
        if matches!(self.entries.last(), Some(MenuEntry::Item(_))) {
            self.entries.push(MenuEntry::Separator);
        }
    }

    fn finish(mut self) -> Vec<MenuEntry> {
        if matches!(self.entries.last(), Some(MenuEntry::Separator)) {
            self.entries.pop();
        }
        self.entries
    }
}
