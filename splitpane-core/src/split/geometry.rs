//! Geometry propagation through the pane tree
//!
//! A pass walks down from a node, recomputing each rectangle from its
//! parent's rectangle and divider (the container for the root). Subtrees
//! are only revisited when something changed, unless the pass is forced.

use crate::config::EngineConfig;

use super::tree::{NodeKind, PaneTree};
use super::types::{PaneId, Rect};

/// Sizes the geometry pass needs from the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutMetrics {
    /// Height of the tab strip header
    pub tab_height: i32,
    /// Minimum extent of a pane along a divider's axis
    pub min_pane_size: i32,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self::from(&EngineConfig::default())
    }
}

impl From<&EngineConfig> for LayoutMetrics {
    fn from(config: &EngineConfig) -> Self {
        Self {
            tab_height: config.tabs.tab_height,
            min_pane_size: config.layout.min_pane_size,
        }
    }
}

/// Rectangles reported for a leaf by a geometry pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeafGeometry {
    /// The leaf
    pub pane: PaneId,
    /// Tab strip header, full width at the top
    pub header: Rect,
    /// Area left for the active view
    pub content: Rect,
    /// False when only reported because the pass was forced
    pub resized: bool,
}

/// Outcome of a geometry pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResizeReport {
    /// Leaves whose rectangles were (re)computed, in depth-first order
    pub leaves: Vec<LeafGeometry>,
    /// Branches whose divider was moved by clamping
    pub clamped: Vec<PaneId>,
    /// A first child was laid out, so the layout is worth persisting
    pub pass_completed: bool,
}

impl ResizeReport {
    /// Returns true if no leaf was reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Geometry reported for `pane`.
    #[must_use]
    pub fn leaf(&self, pane: PaneId) -> Option<&LeafGeometry> {
        self.leaves.iter().find(|leaf| leaf.pane == pane)
    }

    /// Appends another report.
    pub fn merge(&mut self, other: Self) {
        self.leaves.extend(other.leaves);
        self.clamped.extend(other.clamped);
        self.pass_completed |= other.pass_completed;
    }
}

impl PaneTree {
    /// Lays the whole tree out inside `container`.
    pub fn layout(&mut self, container: Rect, metrics: LayoutMetrics, force: bool) -> ResizeReport {
        let force = force || self.container != container;
        self.container = container;
        self.resize(self.root(), metrics, force)
    }

    /// Recomputes the geometry of `id` and, where needed, its subtree.
    ///
    /// A request for a node that is already being resized is ignored.
    pub fn resize(&mut self, id: PaneId, metrics: LayoutMetrics, force: bool) -> ResizeReport {
        let mut report = ResizeReport::default();
        self.resize_node(id, metrics, force, &mut report);
        report
    }

    fn resize_node(
        &mut self,
        id: PaneId,
        metrics: LayoutMetrics,
        force: bool,
        report: &mut ResizeReport,
    ) {
        let Some(target) = self.layout_rect(id) else {
            return;
        };
        let Some(node) = self.get_mut(id) else {
            return;
        };
        if node.resizing {
            tracing::trace!(pane = %id, "Nested resize ignored");
            return;
        }
        node.resizing = true;
        let changed = node.rect != target;
        node.rect = target;

        let descend = match &mut node.kind {
            NodeKind::Branch(branch) => {
                if branch.divider.clamp(target, metrics.min_pane_size) {
                    report.clamped.push(id);
                }
                let offset = branch.divider.offset();
                if changed || force || branch.laid_out != Some(offset) {
                    branch.laid_out = Some(offset);
                    Some((branch.first, branch.second))
                } else {
                    None
                }
            }
            NodeKind::Leaf(_) => {
                if changed || force {
                    report.leaves.push(LeafGeometry {
                        pane: id,
                        header: target.top_strip(metrics.tab_height),
                        content: target.below_top(metrics.tab_height),
                        resized: changed,
                    });
                }
                None
            }
        };

        if let Some((first, second)) = descend {
            self.resize_node(first, metrics, force, report);
            self.resize_node(second, metrics, force, report);
        }
        if self.is_first_child(id) {
            report.pass_completed = true;
        }
        if let Some(node) = self.get_mut(id) {
            node.resizing = false;
        }
    }

    /// Current header and content rectangles of leaf `id`.
    #[must_use]
    pub fn leaf_geometry(&self, id: PaneId, tab_height: i32) -> Option<LeafGeometry> {
        if !self.is_leaf(id) {
            return None;
        }
        let rect = self.rect(id)?;
        Some(LeafGeometry {
            pane: id,
            header: rect.top_strip(tab_height),
            content: rect.below_top(tab_height),
            resized: false,
        })
    }

    /// Rectangle covered by the divider of branch `id`.
    #[must_use]
    pub fn divider_rect(&self, id: PaneId) -> Option<Rect> {
        let rect = self.rect(id)?;
        self.branch(id).map(|branch| branch.divider.rect(rect))
    }

    /// Returns true while `id` is inside a geometry pass.
    #[must_use]
    pub fn is_resizing(&self, id: PaneId) -> bool {
        self.get(id).is_some_and(|node| node.resizing)
    }
}
