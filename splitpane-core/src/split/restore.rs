//! Layout restoration
//!
//! A [`RestoreJob`] rebuilds a [`SavedLayout`] in four phases, one per
//! scheduled step, so the host can repaint in between:
//!
//! 1. **Topology** - collapse the tree and rebuild every split, sized from
//!    the saved extents translated to the current container.
//! 2. **Populate** - fill each leaf with its files, re-using open documents
//!    and views before opening anything.
//! 3. **Resize** - apply the saved extents again now that the tree is final.
//! 4. **Finalize** - close surplus unmodified documents and empty panes.
//!
//! The workspace checks that the job's anchor pane is still alive before
//! each step and drops the job otherwise.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use crate::config::TabSettings;
use crate::host::DocumentHost;

use super::geometry::{LayoutMetrics, ResizeReport};
use super::layout::{LayoutNode, SavedLayout, translate_size};
use super::tabs::{TabEntry, TabStrip};
use super::tree::PaneTree;
use super::types::{PaneId, ViewId};

/// Step a restore job runs next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RestorePhase {
    /// Rebuild the split structure
    Topology,
    /// Open and bind documents
    Populate,
    /// Correct divider positions
    Resize,
    /// Close surplus documents and empty panes
    Finalize,
    /// Nothing left to do
    Done,
}

impl fmt::Display for RestorePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Topology => "topology",
            Self::Populate => "populate",
            Self::Resize => "resize",
            Self::Finalize => "finalize",
            Self::Done => "done",
        })
    }
}

/// How a restore was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RestoreOptions {
    /// Never prompt; give up quietly instead
    pub silent: bool,
    /// Startup restore: unsaved documents do not need confirmation
    pub session: bool,
}

/// Outcome of a finished restore.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// Files bound to a pane, in layout order without duplicates
    pub restored: Vec<String>,
    /// Files that could not be opened, in layout order without duplicates
    pub missing: Vec<String>,
    /// Surplus views closed
    pub closed: usize,
    /// Pane that was active when the layout was saved
    pub active_pane: Option<PaneId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PlannedLeaf {
    pane: PaneId,
    files: Vec<String>,
    active: Option<usize>,
    is_active: bool,
}

/// A layout restore in progress.
#[derive(Debug, Clone)]
pub struct RestoreJob {
    layout: SavedLayout,
    options: RestoreOptions,
    phase: RestorePhase,
    anchor: Option<PaneId>,
    current: (i32, i32),
    leaves: Vec<PlannedLeaf>,
    sizes: Vec<(PaneId, i32)>,
    used: HashSet<ViewId>,
    report: RestoreReport,
}

impl RestoreJob {
    /// Creates a job for `layout`.
    #[must_use]
    pub fn new(layout: SavedLayout, options: RestoreOptions) -> Self {
        Self {
            layout,
            options,
            phase: RestorePhase::Topology,
            anchor: None,
            current: (0, 0),
            leaves: Vec::new(),
            sizes: Vec::new(),
            used: HashSet::new(),
            report: RestoreReport::default(),
        }
    }

    /// Layout being restored.
    #[must_use]
    pub const fn layout(&self) -> &SavedLayout {
        &self.layout
    }

    /// Options the restore was started with.
    #[must_use]
    pub const fn options(&self) -> RestoreOptions {
        self.options
    }

    /// Next phase.
    #[must_use]
    pub const fn phase(&self) -> RestorePhase {
        self.phase
    }

    /// Returns true once the job has finished.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        matches!(self.phase, RestorePhase::Done)
    }

    /// Returns true while the pane the job was built on still exists.
    #[must_use]
    pub fn is_alive(&self, tree: &PaneTree) -> bool {
        self.anchor.is_none_or(|anchor| tree.contains(anchor))
    }

    /// Report collected so far.
    #[must_use]
    pub const fn report(&self) -> &RestoreReport {
        &self.report
    }

    /// Rebuilds the split structure of the layout in `tree`.
    ///
    /// Existing tabs are gathered into the first-most leaf. Leaves stay
    /// empty until [`populate`](Self::populate).
    pub fn build_topology(&mut self, tree: &mut PaneTree, metrics: LayoutMetrics) -> ResizeReport {
        let root = tree.collapse_all();
        self.anchor = Some(root);
        let container = tree.container();
        self.current = (container.width, container.height);
        if let Some(node) = self.layout.layout.clone() {
            self.plan(tree, root, &node);
        }
        tracing::debug!(
            leaves = self.leaves.len(),
            sizes = self.sizes.len(),
            "Restore topology built"
        );
        let mut report = tree.layout(container, metrics, true);
        report.merge(self.apply_sizes(tree, metrics));
        self.phase = RestorePhase::Populate;
        report
    }

    fn plan(&mut self, tree: &mut PaneTree, pane: PaneId, node: &LayoutNode) {
        match node {
            LayoutNode::Collapsed(leaf) => self.leaves.push(PlannedLeaf {
                pane,
                files: leaf.files.clone(),
                active: leaf.active_index(),
                is_active: leaf.is_active_split,
            }),
            LayoutNode::Vertical(split) | LayoutNode::Horizontal(split) => {
                let Some(orientation) = node.orientation() else {
                    return;
                };
                let (first, second) = match tree.split_leaf(pane, orientation, false) {
                    Ok(children) => children,
                    Err(e) => {
                        tracing::debug!(%pane, error = %e, "Restore split skipped");
                        return;
                    }
                };
                // One extent per branch; the other side follows from the divider.
                let saved = (self.layout.win_width, self.layout.win_height);
                let translate = |child: &LayoutNode| {
                    translate_size(child.split_size(), orientation, saved, self.current)
                };
                let (first_size, second_size) = (translate(&split.first), translate(&split.second));
                if first_size > 0 {
                    self.sizes.push((first, first_size));
                } else if second_size > 0 {
                    self.sizes.push((second, second_size));
                }
                self.plan(tree, first, &split.first);
                self.plan(tree, second, &split.second);
            }
        }
    }

    fn apply_sizes(&self, tree: &mut PaneTree, metrics: LayoutMetrics) -> ResizeReport {
        let mut report = ResizeReport::default();
        if self.sizes.is_empty() {
            let root = tree.root();
            if tree.equalize(root, true).is_ok() {
                report.merge(tree.layout(tree.container(), metrics, true));
            }
            return report;
        }
        for &(pane, size) in &self.sizes {
            let Some(parent) = tree.parent(pane) else {
                continue;
            };
            if tree.resize_child(pane, size).is_ok() {
                report.merge(tree.resize(parent, metrics, true));
            }
        }
        report
    }

    /// Binds every saved file to its leaf.
    ///
    /// Per file, in order of preference: an open document's view that is
    /// not bound yet, a new view on an open document, the file opened fresh.
    /// Files that resolve to none of these are reported missing.
    pub fn populate<H: DocumentHost + ?Sized>(
        &mut self,
        tree: &mut PaneTree,
        host: &mut H,
        settings: &TabSettings,
    ) {
        let leaves = std::mem::take(&mut self.leaves);
        for planned in &leaves {
            if !tree.is_leaf(planned.pane) {
                continue;
            }
            let mut current = None;
            for (i, file) in planned.files.iter().enumerate() {
                let Some(entry) = self.resolve(tree, host, file, settings) else {
                    push_unique(&mut self.report.missing, file);
                    continue;
                };
                let index = tree
                    .tabs_mut(planned.pane)
                    .map(|strip| strip.push(entry, false));
                if planned.active == Some(i) {
                    current = index;
                }
                push_unique(&mut self.report.restored, file);
            }
            if let (Some(index), Some(strip)) = (current, tree.tabs_mut(planned.pane)) {
                strip.set_current(index);
            }
            if planned.is_active {
                self.report.active_pane = Some(planned.pane);
            }
        }
        self.leaves = leaves;
        tracing::debug!(
            restored = self.report.restored.len(),
            missing = self.report.missing.len(),
            "Restore populated"
        );
        self.phase = RestorePhase::Resize;
    }

    fn resolve<H: DocumentHost + ?Sized>(
        &mut self,
        tree: &mut PaneTree,
        host: &mut H,
        file: &str,
        settings: &TabSettings,
    ) -> Option<TabEntry> {
        let path = Path::new(file);
        let document = host
            .documents()
            .into_iter()
            .find(|document| host.document_path(*document).as_deref() == Some(path));
        let view = if let Some(document) = document {
            let free = host.views().into_iter().find(|view| {
                host.view_document(*view) == Some(document) && !self.used.contains(view)
            });
            match free {
                Some(view) => view,
                None => host.add_view(document)?,
            }
        } else {
            if !host.file_exists(path) {
                return None;
            }
            let document = host.open_document(path)?;
            host.add_view(document)?
        };
        self.used.insert(view);

        if let Some((pane, index)) = tree.find_view(view) {
            if let Some(entry) = tree.tabs_mut(pane).and_then(|strip| strip.remove(index)) {
                return Some(entry);
            }
        }
        host.tab_entry(view, settings)
    }

    /// Corrects divider positions drifted during population.
    pub fn correct_sizes(&mut self, tree: &mut PaneTree, metrics: LayoutMetrics) -> ResizeReport {
        let report = self.apply_sizes(tree, metrics);
        self.phase = RestorePhase::Finalize;
        report
    }

    /// Closes views the layout does not reference, unless their document has
    /// unsaved changes, then removes empty panes.
    pub fn finalize<H: DocumentHost + ?Sized>(
        &mut self,
        tree: &mut PaneTree,
        host: &mut H,
    ) -> RestoreReport {
        for leaf in tree.leaves() {
            let views = tree.tabs(leaf).map(TabStrip::views).unwrap_or_default();
            for view in views {
                if self.used.contains(&view) {
                    continue;
                }
                let modified = host
                    .view_document(view)
                    .is_some_and(|document| host.document_modified(document));
                if modified || !host.close_view(view) {
                    continue;
                }
                if let Some(strip) = tree.tabs_mut(leaf) {
                    strip.take_view(view);
                }
                self.report.closed += 1;
            }
        }

        for result in tree.close_empties() {
            self.report.active_pane = self.report.active_pane.map(|pane| result.remap(pane));
        }
        self.report.active_pane = self.report.active_pane.filter(|pane| tree.is_leaf(*pane));
        self.phase = RestorePhase::Done;
        tracing::info!(
            restored = self.report.restored.len(),
            missing = self.report.missing.len(),
            closed = self.report.closed,
            "Layout restored"
        );
        self.report.clone()
    }
}

fn push_unique(list: &mut Vec<String>, file: &str) {
    if !list.iter().any(|known| known == file) {
        list.push(file.to_string());
    }
}
