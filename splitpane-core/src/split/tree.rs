//! Pane tree structure
//!
//! The layout is a full binary tree stored in an arena. Every node is either
//! a [`LeafPane`] holding a tab strip or a [`BranchPane`] holding exactly two
//! children and the [`Divider`] between them. Parent links are plain handles
//! and never own anything; a branch exclusively owns its children.

use std::path::Path;

use super::divider::Divider;
use super::error::{RemoveResult, SplitError};
use super::tabs::TabStrip;
use super::types::{Edge, Orientation, PaneId, Point, Rect, TabId, ViewId};

/// A leaf pane: one tab strip and its bound views.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeafPane {
    /// Tabs shown in this pane
    pub tabs: TabStrip,
}

/// A branch pane: two children separated by a divider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchPane {
    /// First child (left or top)
    pub first: PaneId,
    /// Second child (right or bottom)
    pub second: PaneId,
    /// Divider between the children
    pub divider: Divider,
    /// Divider offset the children were last laid out with
    pub(super) laid_out: Option<i32>,
}

impl BranchPane {
    fn new(first: PaneId, second: PaneId, divider: Divider) -> Self {
        Self {
            first,
            second,
            divider,
            laid_out: None,
        }
    }

    /// Orientation of this branch.
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.divider.orientation()
    }

    /// The child that is not `child`.
    #[must_use]
    pub fn other(&self, child: PaneId) -> Option<PaneId> {
        if child == self.first {
            Some(self.second)
        } else if child == self.second {
            Some(self.first)
        } else {
            None
        }
    }
}

/// Kind of a pane node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Holds a tab strip
    Leaf(LeafPane),
    /// Holds two children and a divider
    Branch(BranchPane),
}

/// A node of the pane tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneNode {
    pub(super) parent: Option<PaneId>,
    pub(super) rect: Rect,
    pub(super) resizing: bool,
    pub(super) kind: NodeKind,
}

impl PaneNode {
    fn leaf(parent: Option<PaneId>, tabs: TabStrip) -> Self {
        Self {
            parent,
            rect: Rect::default(),
            resizing: false,
            kind: NodeKind::Leaf(LeafPane { tabs }),
        }
    }

    /// Parent branch, `None` for the root.
    #[must_use]
    pub const fn parent(&self) -> Option<PaneId> {
        self.parent
    }

    /// Rectangle assigned by the last geometry pass.
    #[must_use]
    pub const fn rect(&self) -> Rect {
        self.rect
    }

    /// Node kind.
    #[must_use]
    pub const fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Returns true for leaf panes.
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    /// Orientation of a branch, `None` for leaves.
    #[must_use]
    pub const fn orientation(&self) -> Option<Orientation> {
        match &self.kind {
            NodeKind::Leaf(_) => None,
            NodeKind::Branch(branch) => Some(branch.orientation()),
        }
    }
}

/// Part of the tree hit by a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitZone {
    /// The divider of a branch
    Divider,
    /// The tab strip header of a leaf
    Header,
    /// The content area of a leaf
    Content,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Slot {
    generation: u32,
    node: Option<PaneNode>,
}

/// Arena-backed binary tree of panes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: PaneId,
    pub(super) container: Rect,
    divider_thickness: i32,
}

impl PaneTree {
    /// Creates a tree with a single empty root leaf.
    #[must_use]
    pub fn new(divider_thickness: i32) -> Self {
        let mut tree = Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: PaneId::new(0, 0),
            container: Rect::default(),
            divider_thickness,
        };
        tree.root = tree.alloc(PaneNode::leaf(None, TabStrip::new()));
        tree
    }

    // ========================================================================
    // Arena
    // ========================================================================

    fn alloc(&mut self, node: PaneNode) -> PaneId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            PaneId::new(index, slot.generation)
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            PaneId::new(index, 0)
        }
    }

    fn release(&mut self, id: PaneId) -> Option<PaneNode> {
        let slot = self.slots.get_mut(id.index())?;
        if slot.generation != id.generation() {
            return None;
        }
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index() as u32);
        Some(node)
    }

    /// Node addressed by `id`, if it is still alive.
    #[must_use]
    pub fn get(&self, id: PaneId) -> Option<&PaneNode> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_ref())
    }

    pub(super) fn get_mut(&mut self, id: PaneId) -> Option<&mut PaneNode> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_mut())
    }

    /// Returns true if `id` addresses a live node.
    #[must_use]
    pub fn contains(&self, id: PaneId) -> bool {
        self.get(id).is_some()
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// The root node.
    #[must_use]
    pub const fn root(&self) -> PaneId {
        self.root
    }

    /// Returns true if `id` is the root.
    #[must_use]
    pub fn is_root(&self, id: PaneId) -> bool {
        id == self.root
    }

    /// Outer container rectangle of the last layout.
    #[must_use]
    pub const fn container(&self) -> Rect {
        self.container
    }

    /// Thickness used for dividers.
    #[must_use]
    pub const fn divider_thickness(&self) -> i32 {
        self.divider_thickness
    }

    /// Changes the thickness of every divider.
    pub fn set_divider_thickness(&mut self, thickness: i32) {
        self.divider_thickness = thickness;
        for slot in &mut self.slots {
            if let Some(PaneNode {
                kind: NodeKind::Branch(branch),
                ..
            }) = slot.node.as_mut()
            {
                branch.divider.set_thickness(thickness);
            }
        }
    }

    /// Returns true if the root is a branch.
    #[must_use]
    pub fn is_split(&self) -> bool {
        !self.is_leaf(self.root)
    }

    /// Parent of `id`.
    #[must_use]
    pub fn parent(&self, id: PaneId) -> Option<PaneId> {
        self.get(id).and_then(PaneNode::parent)
    }

    /// Rectangle of `id` from the last geometry pass.
    #[must_use]
    pub fn rect(&self, id: PaneId) -> Option<Rect> {
        self.get(id).map(PaneNode::rect)
    }

    /// Returns true if `id` is a live leaf.
    #[must_use]
    pub fn is_leaf(&self, id: PaneId) -> bool {
        self.get(id).is_some_and(PaneNode::is_leaf)
    }

    /// Leaf data of `id`.
    #[must_use]
    pub fn leaf(&self, id: PaneId) -> Option<&LeafPane> {
        match &self.get(id)?.kind {
            NodeKind::Leaf(leaf) => Some(leaf),
            NodeKind::Branch(_) => None,
        }
    }

    /// Branch data of `id`.
    #[must_use]
    pub fn branch(&self, id: PaneId) -> Option<&BranchPane> {
        match &self.get(id)?.kind {
            NodeKind::Branch(branch) => Some(branch),
            NodeKind::Leaf(_) => None,
        }
    }

    /// Mutable branch data of `id`.
    pub fn branch_mut(&mut self, id: PaneId) -> Option<&mut BranchPane> {
        match &mut self.get_mut(id)?.kind {
            NodeKind::Branch(branch) => Some(branch),
            NodeKind::Leaf(_) => None,
        }
    }

    /// Tab strip of leaf `id`.
    #[must_use]
    pub fn tabs(&self, id: PaneId) -> Option<&TabStrip> {
        self.leaf(id).map(|leaf| &leaf.tabs)
    }

    /// Mutable tab strip of leaf `id`.
    pub fn tabs_mut(&mut self, id: PaneId) -> Option<&mut TabStrip> {
        match &mut self.get_mut(id)?.kind {
            NodeKind::Leaf(leaf) => Some(&mut leaf.tabs),
            NodeKind::Branch(_) => None,
        }
    }

    /// Orientation of branch `id`.
    #[must_use]
    pub fn orientation(&self, id: PaneId) -> Option<Orientation> {
        self.get(id).and_then(PaneNode::orientation)
    }

    /// Children of branch `id`.
    #[must_use]
    pub fn children(&self, id: PaneId) -> Option<(PaneId, PaneId)> {
        self.branch(id).map(|branch| (branch.first, branch.second))
    }

    /// Returns true if `id` is the first child of its parent.
    #[must_use]
    pub fn is_first_child(&self, id: PaneId) -> bool {
        self.parent(id)
            .and_then(|parent| self.branch(parent))
            .is_some_and(|branch| branch.first == id)
    }

    /// The other child of `id`'s parent.
    #[must_use]
    pub fn sibling(&self, id: PaneId) -> Option<PaneId> {
        self.parent(id)
            .and_then(|parent| self.branch(parent))
            .and_then(|branch| branch.other(id))
    }

    /// Every node under `id` (inclusive) in depth-first order, first child first.
    #[must_use]
    pub fn nodes_under(&self, id: PaneId) -> Vec<PaneId> {
        let mut nodes = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.get(current) else {
                continue;
            };
            nodes.push(current);
            if let NodeKind::Branch(branch) = &node.kind {
                stack.push(branch.second);
                stack.push(branch.first);
            }
        }
        nodes
    }

    /// Leaves under `id` in depth-first order.
    #[must_use]
    pub fn leaves_under(&self, id: PaneId) -> Vec<PaneId> {
        self.nodes_under(id)
            .into_iter()
            .filter(|node| self.is_leaf(*node))
            .collect()
    }

    /// All leaves in depth-first order.
    #[must_use]
    pub fn leaves(&self) -> Vec<PaneId> {
        self.leaves_under(self.root)
    }

    /// All branches in depth-first order.
    #[must_use]
    pub fn branches(&self) -> Vec<PaneId> {
        self.nodes_under(self.root)
            .into_iter()
            .filter(|node| !self.is_leaf(*node))
            .collect()
    }

    /// Number of leaves.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.leaves().len()
    }

    /// Number of live nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.node.is_some()).count()
    }

    /// Total number of tabs across all leaves.
    #[must_use]
    pub fn tab_count(&self) -> usize {
        self.leaves()
            .into_iter()
            .filter_map(|leaf| self.tabs(leaf))
            .map(TabStrip::len)
            .sum()
    }

    /// Descends through first children to a leaf.
    #[must_use]
    pub fn first_most(&self, id: PaneId) -> PaneId {
        let mut current = id;
        while let Some(branch) = self.branch(current) {
            current = branch.first;
        }
        current
    }

    /// Descends through second children to a leaf.
    #[must_use]
    pub fn second_most(&self, id: PaneId) -> PaneId {
        let mut current = id;
        while let Some(branch) = self.branch(current) {
            current = branch.second;
        }
        current
    }

    /// Number of ancestors of `id`.
    #[must_use]
    pub fn depth(&self, id: PaneId) -> usize {
        let mut depth = 0;
        let mut current = self.parent(id);
        while let Some(parent) = current {
            depth += 1;
            current = self.parent(parent);
        }
        depth
    }

    /// Number of orientation changes on the path from `id` to the root.
    ///
    /// Deeply alternating nests stop accepting split drops once this reaches
    /// the configured maximum.
    #[must_use]
    pub fn drop_level(&self, id: PaneId) -> usize {
        let mut level = 0;
        let mut top = id;
        while let Some(parent) = self.parent(top) {
            if self.orientation(parent) != self.orientation(top) {
                level += 1;
            }
            top = parent;
        }
        level
    }

    /// Leaf and index of the tab showing `view`.
    #[must_use]
    pub fn find_view(&self, view: ViewId) -> Option<(PaneId, usize)> {
        self.leaves().into_iter().find_map(|leaf| {
            self.tabs(leaf)
                .and_then(|tabs| tabs.index_of_view(view))
                .map(|index| (leaf, index))
        })
    }

    /// Leaf and index of the tab with identity `tab`.
    #[must_use]
    pub fn find_tab(&self, tab: TabId) -> Option<(PaneId, usize)> {
        self.leaves().into_iter().find_map(|leaf| {
            self.tabs(leaf)
                .and_then(|tabs| tabs.index_of_tab(tab))
                .map(|index| (leaf, index))
        })
    }

    /// First leaf and index of a tab backed by `path`.
    #[must_use]
    pub fn find_path(&self, path: &Path) -> Option<(PaneId, usize)> {
        self.leaves().into_iter().find_map(|leaf| {
            self.tabs(leaf)
                .and_then(|tabs| tabs.index_of_path(path))
                .map(|index| (leaf, index))
        })
    }

    /// Finds the node under `point`.
    ///
    /// Descends from the root: a point on a divider hits the branch, a point
    /// inside a leaf hits its header strip (the top `tab_height` pixels) or
    /// its content.
    #[must_use]
    pub fn split_at(&self, point: Point, tab_height: i32) -> Option<(PaneId, HitZone)> {
        let mut current = self.root;
        if !self.rect(current)?.contains(point) {
            return None;
        }
        loop {
            let node = self.get(current)?;
            match &node.kind {
                NodeKind::Leaf(_) => {
                    let zone = if node.rect.top_strip(tab_height).contains(point) {
                        HitZone::Header
                    } else {
                        HitZone::Content
                    };
                    return Some((current, zone));
                }
                NodeKind::Branch(branch) => {
                    if branch.divider.rect(node.rect).contains(point) {
                        return Some((current, HitZone::Divider));
                    }
                    if self.rect(branch.first)?.contains(point) {
                        current = branch.first;
                    } else if self.rect(branch.second)?.contains(point) {
                        current = branch.second;
                    } else {
                        return None;
                    }
                }
            }
        }
    }

    fn expect_leaf(&self, id: PaneId) -> Result<&LeafPane, SplitError> {
        match &self.get(id).ok_or(SplitError::PaneNotFound(id))?.kind {
            NodeKind::Leaf(leaf) => Ok(leaf),
            NodeKind::Branch(_) => Err(SplitError::NotALeaf(id)),
        }
    }

    fn expect_branch(&self, id: PaneId) -> Result<&BranchPane, SplitError> {
        match &self.get(id).ok_or(SplitError::PaneNotFound(id))?.kind {
            NodeKind::Branch(branch) => Ok(branch),
            NodeKind::Leaf(_) => Err(SplitError::NotABranch(id)),
        }
    }

    fn set_parent(&mut self, id: PaneId, parent: Option<PaneId>) {
        if let Some(node) = self.get_mut(id) {
            node.parent = parent;
        }
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Turns leaf `leaf` into a branch with two new leaf children.
    ///
    /// The leaf's tabs move to the first child, or to the second child when
    /// `swap_sides` is set; the other child starts empty. The handle `leaf`
    /// keeps addressing the node, which is now the branch.
    ///
    /// # Errors
    ///
    /// Returns an error if `leaf` is not a live leaf.
    pub fn split_leaf(
        &mut self,
        leaf: PaneId,
        orientation: Orientation,
        swap_sides: bool,
    ) -> Result<(PaneId, PaneId), SplitError> {
        self.expect_leaf(leaf)?;
        let tabs = self.tabs_mut(leaf).map(std::mem::take).unwrap_or_default();
        let kept = self.alloc(PaneNode::leaf(Some(leaf), tabs));
        let fresh = self.alloc(PaneNode::leaf(Some(leaf), TabStrip::new()));
        let (first, second) = if swap_sides {
            (fresh, kept)
        } else {
            (kept, fresh)
        };
        let mut divider = Divider::new(orientation, self.divider_thickness);
        if let Some(node) = self.get_mut(leaf) {
            if !node.rect.is_empty() {
                divider.reset(node.rect);
            }
            node.kind = NodeKind::Branch(BranchPane::new(first, second, divider));
        }
        Ok((first, second))
    }

    /// Inserts a new branch in place of `branch`'s second child.
    ///
    /// The new branch has the same orientation; its first child is a new
    /// empty leaf (returned) and its second child is the old second child.
    ///
    /// # Errors
    ///
    /// Returns an error if `branch` is not a live branch.
    pub fn split_between(&mut self, branch: PaneId) -> Result<PaneId, SplitError> {
        let (orientation, old_second) = {
            let data = self.expect_branch(branch)?;
            (data.orientation(), data.second)
        };
        let old_rect = self.rect(old_second).unwrap_or_default();
        let fresh = self.alloc(PaneNode::leaf(None, TabStrip::new()));
        let inner = self.alloc(PaneNode {
            parent: Some(branch),
            rect: old_rect,
            resizing: false,
            kind: NodeKind::Branch(BranchPane::new(
                fresh,
                old_second,
                Divider::new(orientation, self.divider_thickness),
            )),
        });
        self.set_parent(fresh, Some(inner));
        self.set_parent(old_second, Some(inner));
        if let Some(data) = self.branch_mut(branch) {
            data.second = inner;
            data.laid_out = None;
        }
        Ok(fresh)
    }

    /// Wraps the whole tree in a new root branch with a new leaf at `edge`.
    ///
    /// The new leaf receives `fraction` of the container along the split
    /// axis; the previous root's dividers are rescaled into the rest.
    /// Returns the new leaf.
    pub fn wrap_root(&mut self, edge: Edge, fraction: f64) -> PaneId {
        let old_root = self.root;
        let area = if self.container.is_empty() {
            self.rect(old_root).unwrap_or_default()
        } else {
            self.container
        };
        let orientation = edge.orientation();
        let thickness = self.divider_thickness;
        let size = (f64::from(area.extent(orientation)) * fraction).round() as i32;

        let fresh = self.alloc(PaneNode::leaf(None, TabStrip::new()));
        let mut divider = Divider::new(orientation, thickness);
        let (first, second) = if edge.is_leading() {
            divider.move_to(area.start(orientation) + size);
            (fresh, old_root)
        } else {
            divider.move_to(area.start(orientation) + area.extent(orientation) - size - thickness);
            (old_root, fresh)
        };
        let (first_rect, second_rect) = divider.child_rects(area);
        let remaining = if edge.is_leading() {
            second_rect
        } else {
            first_rect
        };

        let new_root = self.alloc(PaneNode {
            parent: None,
            rect: area,
            resizing: false,
            kind: NodeKind::Branch(BranchPane::new(first, second, divider)),
        });
        self.set_parent(fresh, Some(new_root));
        self.set_parent(old_root, Some(new_root));
        self.root = new_root;

        let old_rect = self.rect(old_root).unwrap_or_default();
        self.rescale_subtree(old_root, old_rect, remaining);
        fresh
    }

    /// Removes leaf `leaf` and simplifies its parent.
    ///
    /// The sibling's content (tab strip, or orientation, divider and
    /// children) moves into the parent node, whose handle stays valid; the
    /// sibling handle becomes stale. Removing the root leaf keeps it in
    /// place. The caller empties the leaf's tabs first.
    ///
    /// # Errors
    ///
    /// Returns an error if `leaf` is not a live leaf.
    pub fn remove_leaf(&mut self, leaf: PaneId) -> Result<RemoveResult, SplitError> {
        self.expect_leaf(leaf)?;
        let Some(parent) = self.parent(leaf) else {
            return Ok(RemoveResult::KeptRoot(leaf));
        };
        let sibling = self.sibling(leaf).ok_or(SplitError::PaneNotFound(parent))?;
        let parent_rect = self.rect(parent).unwrap_or_default();

        self.release(leaf);
        let absorbed = self
            .release(sibling)
            .ok_or(SplitError::PaneNotFound(sibling))?;
        let sibling_rect = absorbed.rect;
        let mut kind = absorbed.kind;
        let grandchildren = match &mut kind {
            NodeKind::Branch(branch) => {
                branch.laid_out = None;
                Some((branch.first, branch.second))
            }
            NodeKind::Leaf(_) => None,
        };
        if let Some(node) = self.get_mut(parent) {
            node.kind = kind;
        }
        if let Some((first, second)) = grandchildren {
            self.set_parent(first, Some(parent));
            self.set_parent(second, Some(parent));
            self.rescale_subtree(parent, sibling_rect, parent_rect);
        }
        tracing::trace!(%leaf, %sibling, %parent, "Leaf removed, parent simplified");
        Ok(RemoveResult::Collapsed {
            removed: leaf,
            absorbed: sibling,
            into: parent,
        })
    }

    /// Removes `leaf`, then keeps removing the resulting pane while it is an
    /// empty non-root leaf.
    ///
    /// # Errors
    ///
    /// Returns an error if `leaf` is not a live leaf.
    pub fn prune(&mut self, leaf: PaneId) -> Result<Vec<RemoveResult>, SplitError> {
        let mut results = Vec::new();
        let mut current = leaf;
        loop {
            let result = self.remove_leaf(current)?;
            results.push(result);
            match result {
                RemoveResult::KeptRoot(_) => break,
                RemoveResult::Collapsed { into, .. } => {
                    let empty = self.tabs(into).is_some_and(TabStrip::is_empty);
                    if empty && !self.is_root(into) {
                        current = into;
                    } else {
                        break;
                    }
                }
            }
        }
        Ok(results)
    }

    /// Removes every empty non-root leaf, simplifying parents as it goes.
    pub fn close_empties(&mut self) -> Vec<RemoveResult> {
        let mut results = Vec::new();
        loop {
            let empty = self.leaves().into_iter().find(|leaf| {
                !self.is_root(*leaf) && self.tabs(*leaf).is_some_and(TabStrip::is_empty)
            });
            let Some(leaf) = empty else {
                break;
            };
            match self.prune(leaf) {
                Ok(removed) => results.extend(removed),
                Err(_) => break,
            }
        }
        results
    }

    /// Collapses the whole tree into the root, which becomes a leaf holding
    /// every tab in depth-first order.
    pub fn collapse_all(&mut self) -> PaneId {
        let root = self.root;
        let mut tabs = TabStrip::new();
        for leaf in self.leaves() {
            if let Some(strip) = self.tabs_mut(leaf) {
                for entry in strip.take_all() {
                    tabs.push(entry, false);
                }
            }
        }
        for node in self.nodes_under(root) {
            if node != root {
                self.release(node);
            }
        }
        if let Some(node) = self.get_mut(root) {
            node.kind = NodeKind::Leaf(LeafPane { tabs });
        }
        root
    }

    /// Centres the divider of `id`, and of every branch below it when
    /// `recursive` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is not a live node.
    pub fn equalize(&mut self, id: PaneId, recursive: bool) -> Result<(), SplitError> {
        if !self.contains(id) {
            return Err(SplitError::PaneNotFound(id));
        }
        let targets = if recursive {
            self.nodes_under(id)
        } else {
            vec![id]
        };
        for target in targets {
            let area = self.layout_rect(target).unwrap_or_default();
            let Some(node) = self.get_mut(target) else {
                continue;
            };
            node.rect = area;
            if let NodeKind::Branch(branch) = &mut node.kind {
                branch.divider.reset(area);
            }
        }
        Ok(())
    }

    /// Maps every divider under `id` proportionally from `from` into `to`.
    pub fn rescale_subtree(&mut self, id: PaneId, from: Rect, to: Rect) {
        if from == to {
            return;
        }
        for node in self.nodes_under(id) {
            if let Some(branch) = self.branch_mut(node) {
                branch.divider.rescale(from, to);
            }
        }
    }

    /// Moves the parent divider so that `id` is `size` pixels along the
    /// parent's axis. No-op for the root.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is not a live node.
    pub fn resize_child(&mut self, id: PaneId, size: i32) -> Result<(), SplitError> {
        if !self.contains(id) {
            return Err(SplitError::PaneNotFound(id));
        }
        let Some(parent) = self.parent(id) else {
            return Ok(());
        };
        let is_first = self.is_first_child(id);
        let parent_rect = self.rect(parent).unwrap_or_default();
        let branch = self
            .branch_mut(parent)
            .ok_or(SplitError::NotABranch(parent))?;
        let (first, second) = branch.divider.child_rects(parent_rect);
        let current = if is_first { first } else { second }.extent(branch.orientation());
        branch.divider.resize_child(is_first, current, size);
        Ok(())
    }

    /// Extent of `id` along its parent's axis, 0 for the root.
    #[must_use]
    pub fn split_size(&self, id: PaneId) -> i32 {
        match (self.parent(id).and_then(|p| self.orientation(p)), self.rect(id)) {
            (Some(orientation), Some(rect)) => rect.extent(orientation),
            _ => 0,
        }
    }

    /// Rectangle `id` should occupy given its parent's rectangle and divider,
    /// or the container for the root.
    pub(super) fn layout_rect(&self, id: PaneId) -> Option<Rect> {
        let node = self.get(id)?;
        let Some(parent) = node.parent else {
            return Some(self.container);
        };
        let parent_node = self.get(parent)?;
        let NodeKind::Branch(branch) = &parent_node.kind else {
            return None;
        };
        let (first, second) = branch.divider.child_rects(parent_node.rect);
        Some(if branch.first == id { first } else { second })
    }
}
