//! Drag gestures over tab strips and dividers
//!
//! This module is a pure model of the gestures: it classifies pointer motion,
//! hit-tests drop targets against the pane tree and describes the preview
//! overlays. It never mutates the tree. The workspace commits the candidate
//! on release.

use crate::config::{DragSettings, EngineConfig};

use super::tabs::{TabSelection, TabStrip};
use super::tree::{HitZone, PaneTree};
use super::types::{Edge, Orientation, PaneId, Point, Rect};

/// Offset of the "insert between" preview from the second child's edge.
pub const BETWEEN_PREVIEW_OFFSET: i32 = 30;

/// Extent of the "insert between" preview along the divider axis.
pub const BETWEEN_PREVIEW_EXTENT: i32 = 50;

/// Mouse button that started a tab drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragButton {
    /// Needs vertical motion before the drag becomes active
    Primary,
    /// Starts an active drag immediately
    Middle,
}

/// Classification state of a tab drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    /// Waiting for the pointer to leave the deadzone
    Detecting,
    /// Classified as vertical, waiting for enough vertical travel
    Vertical,
    /// Tracking drop targets
    Active,
}

/// What a pointer motion did to a tab drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMotion {
    /// Still classifying
    Pending,
    /// The drag just became active
    Activated,
    /// The motion is an ordinary in-strip reorder; the gesture is over
    Reorder,
    /// An active drag moved
    Moved,
}

/// Tree mutation a drop would perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropAction {
    /// Wrap the root and put a new pane at this workspace edge
    EdgeSplit(Edge),
    /// Insert a new pane between the children of this branch
    SplitBetween(PaneId),
    /// Move the dragged tabs into this leaf
    Transfer(PaneId),
    /// Split this leaf, putting the dragged tabs on `side`
    Split {
        /// Leaf to split
        target: PaneId,
        /// Side receiving the dragged tabs
        side: Edge,
    },
}

impl DropAction {
    /// Pane the action is applied to, `None` for workspace edges.
    #[must_use]
    pub const fn target(&self) -> Option<PaneId> {
        match *self {
            Self::EdgeSplit(_) => None,
            Self::SplitBetween(pane) | Self::Transfer(pane) | Self::Split { target: pane, .. } => {
                Some(pane)
            }
        }
    }

    /// Returns true if the action changes the tree structure.
    #[must_use]
    pub const fn is_structural(&self) -> bool {
        !matches!(self, Self::Transfer(_))
    }
}

/// A drop target found under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropCandidate {
    /// Mutation performed on release
    pub action: DropAction,
    /// Drop-zone overlay in workspace coordinates
    pub preview: Rect,
}

/// Overlays shown while a tab drag is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragPreview {
    /// Top-left corner of the floating tab placeholder
    pub placeholder: Point,
    /// Text shown on the placeholder
    pub label: String,
    /// Current drop-zone overlay
    pub drop_zone: Option<Rect>,
}

/// Rules used to hit-test drop targets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropRules {
    /// Height of the tab strip header
    pub tab_height: i32,
    /// Width of the workspace-edge band
    pub edge_band: i32,
    /// Interior bands are the target extent divided by this value
    pub interior_band_divisor: f64,
    /// Orientation changes after which a pane accepts no split drops
    pub max_drop_level: usize,
    /// Only tab transfers are allowed
    pub locked: bool,
}

impl DropRules {
    /// Rules from the engine configuration.
    #[must_use]
    pub fn new(config: &EngineConfig, locked: bool) -> Self {
        Self {
            tab_height: config.tabs.tab_height,
            edge_band: config.layout.edge_band,
            interior_band_divisor: config.layout.interior_band_divisor,
            max_drop_level: config.layout.max_drop_level,
            locked,
        }
    }
}

/// A tab drag from press to release.
#[derive(Debug, Clone, PartialEq)]
pub struct TabDrag {
    source: PaneId,
    selection: TabSelection,
    button: DragButton,
    phase: DragPhase,
    origin: Point,
    pointer: Point,
    candidate: Option<DropCandidate>,
}

impl TabDrag {
    /// Starts a drag of `selection` in `source` at `point`.
    ///
    /// Returns `None` when drags with `button` are disabled.
    #[must_use]
    pub const fn press(
        source: PaneId,
        selection: TabSelection,
        button: DragButton,
        point: Point,
        settings: &DragSettings,
    ) -> Option<Self> {
        let phase = match button {
            DragButton::Primary if settings.primary_button => DragPhase::Detecting,
            DragButton::Middle if settings.middle_button => DragPhase::Active,
            _ => return None,
        };
        Some(Self {
            source,
            selection,
            button,
            phase,
            origin: point,
            pointer: point,
            candidate: None,
        })
    }

    /// Feeds a pointer position.
    pub fn motion(&mut self, point: Point, settings: &DragSettings) -> DragMotion {
        self.pointer = point;
        let dx = f64::from(point.x - self.origin.x);
        let dy = f64::from(point.y - self.origin.y);
        match self.phase {
            DragPhase::Detecting => {
                if dx.hypot(dy) < f64::from(settings.deadzone) {
                    return DragMotion::Pending;
                }
                let angle = dx.abs().atan2(dy.abs()).to_degrees();
                if angle >= settings.angle_threshold {
                    return DragMotion::Reorder;
                }
                self.phase = DragPhase::Vertical;
                self.promote(dy, settings)
            }
            DragPhase::Vertical => self.promote(dy, settings),
            DragPhase::Active => DragMotion::Moved,
        }
    }

    fn promote(&mut self, dy: f64, settings: &DragSettings) -> DragMotion {
        if dy.abs() >= f64::from(settings.vertical_threshold) {
            self.phase = DragPhase::Active;
            DragMotion::Activated
        } else {
            DragMotion::Pending
        }
    }

    /// Pane the tabs are dragged from.
    #[must_use]
    pub const fn source(&self) -> PaneId {
        self.source
    }

    /// Dragged tabs.
    #[must_use]
    pub const fn selection(&self) -> TabSelection {
        self.selection
    }

    /// Button that started the drag.
    #[must_use]
    pub const fn button(&self) -> DragButton {
        self.button
    }

    /// Classification state.
    #[must_use]
    pub const fn phase(&self) -> DragPhase {
        self.phase
    }

    /// Returns true once drop targets are tracked.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.phase, DragPhase::Active)
    }

    /// Press position.
    #[must_use]
    pub const fn origin(&self) -> Point {
        self.origin
    }

    /// Last pointer position.
    #[must_use]
    pub const fn pointer(&self) -> Point {
        self.pointer
    }

    /// Drop target computed by the last poll.
    #[must_use]
    pub const fn candidate(&self) -> Option<DropCandidate> {
        self.candidate
    }

    /// Recomputes the drop target at the current pointer position.
    pub fn poll(&mut self, tree: &PaneTree, rules: &DropRules) -> Option<DropCandidate> {
        self.candidate = classify(tree, rules, self.source, self.selection, self.pointer);
        self.candidate
    }

    /// Overlays for the current state.
    #[must_use]
    pub fn preview(&self, tree: &PaneTree) -> DragPreview {
        let tabs = tree.tabs(self.source);
        let label = match self.selection {
            TabSelection::All => match tabs.map_or(0, TabStrip::len) {
                0 => "All Tabs".to_string(),
                1 => "1 Tab".to_string(),
                count => format!("{count} Tabs"),
            },
            TabSelection::One(index) => tabs
                .and_then(|tabs| tabs.get(index))
                .map(|tab| tab.label.clone())
                .unwrap_or_default(),
        };
        DragPreview {
            placeholder: self.pointer,
            label,
            drop_zone: self.candidate.map(|candidate| candidate.preview),
        }
    }
}

/// Finds the drop target for tabs of `source` dragged to `point`.
///
/// Checked in priority order: workspace-edge band (unless locked), divider,
/// leaf header, leaf interior bands (unless locked or nested too deep).
/// Drops that would leave the layout unchanged yield `None`.
#[must_use]
pub fn classify(
    tree: &PaneTree,
    rules: &DropRules,
    source: PaneId,
    selection: TabSelection,
    point: Point,
) -> Option<DropCandidate> {
    let source_tabs = tree.tabs(source)?;
    let only_tab = match selection {
        TabSelection::All => true,
        TabSelection::One(index) => {
            if index >= source_tabs.len() {
                return None;
            }
            source_tabs.len() == 1
        }
    };
    let root = tree.root();
    if only_tab && tree.is_leaf(root) {
        return None;
    }
    let (target, zone) = tree.split_at(point, rules.tab_height)?;
    let workspace = tree.rect(root)?.below_top(rules.tab_height);
    let target_rect = tree.rect(target)?;
    let target_content = target_rect.below_top(rules.tab_height);

    if !rules.locked {
        if let Some((edge, band)) = edge_band(workspace, target_content, point, rules.edge_band) {
            if zone == HitZone::Divider {
                return None;
            }
            return Some(DropCandidate {
                action: DropAction::EdgeSplit(edge),
                preview: band,
            });
        }
    }

    if zone == HitZone::Divider {
        return between(tree, target);
    }

    if only_tab && target == source {
        return None;
    }

    if zone == HitZone::Header {
        if target == source {
            return None;
        }
        return Some(DropCandidate {
            action: DropAction::Transfer(target),
            preview: target_rect,
        });
    }

    if rules.locked || tree.drop_level(target) >= rules.max_drop_level {
        return None;
    }

    let band_w = (f64::from(target_content.width) / rules.interior_band_divisor) as i32;
    let band_h = (f64::from(target_content.height) / rules.interior_band_divisor) as i32;
    let mut sides = interior_bands(target_content, point, band_w, band_h);
    if only_tab {
        suppress_self_drop(tree, rules, source, target, &mut sides);
    }
    let side = nearest_side(&sides)?;
    let r = target_content;
    let preview = match side {
        Edge::Left => Rect::new(r.x, r.y, band_w, r.height),
        Edge::Right => Rect::new(r.right() - band_w, r.y, band_w, r.height),
        Edge::Top => Rect::new(r.x, r.y, r.width, band_h),
        Edge::Bottom => Rect::new(r.x, r.bottom() - band_h, r.width, band_h),
    };
    Some(DropCandidate {
        action: DropAction::Split { target, side },
        preview,
    })
}

/// Workspace edge band under `point`.
///
/// Bands only apply on the axis where the target does not already span the
/// whole workspace.
fn edge_band(workspace: Rect, target: Rect, point: Point, band: i32) -> Option<(Edge, Rect)> {
    let w = workspace;
    let (x, y) = (point.x, point.y);
    let spans_height = w.height == target.height;
    let spans_width = w.width == target.width;
    if !spans_height && x > w.x && x < w.x + band {
        Some((Edge::Left, Rect::new(w.x, w.y, band, w.height)))
    } else if !spans_height && x > w.right() - band && x < w.right() {
        Some((Edge::Right, Rect::new(w.right() - band, w.y, band, w.height)))
    } else if !spans_width && y > w.y && y < w.y + band {
        Some((Edge::Top, Rect::new(w.x, w.y, w.width, band)))
    } else if !spans_width && y > w.bottom() - band && y < w.bottom() {
        Some((Edge::Bottom, Rect::new(w.x, w.bottom() - band, w.width, band)))
    } else {
        None
    }
}

/// "Insert between" on a divider: both children must be branches whose
/// orientation differs from the divider's.
fn between(tree: &PaneTree, branch: PaneId) -> Option<DropCandidate> {
    let orientation = tree.orientation(branch)?;
    let (first, second) = tree.children(branch)?;
    let crosses = |child| tree.orientation(child).is_some_and(|o| o != orientation);
    if !crosses(first) || !crosses(second) {
        return None;
    }
    let rect = tree.rect(second)?;
    let preview = match orientation {
        Orientation::Vertical => Rect::new(
            rect.x - BETWEEN_PREVIEW_OFFSET,
            rect.y,
            BETWEEN_PREVIEW_EXTENT,
            rect.height,
        ),
        Orientation::Horizontal => Rect::new(
            rect.x,
            rect.y - BETWEEN_PREVIEW_OFFSET,
            rect.width,
            BETWEEN_PREVIEW_EXTENT,
        ),
    };
    Some(DropCandidate {
        action: DropAction::SplitBetween(branch),
        preview,
    })
}

/// Normalized distance from `point` to each edge whose band contains it.
fn interior_bands(r: Rect, point: Point, band_w: i32, band_h: i32) -> [(Edge, Option<f64>); 4] {
    let (x, y) = (point.x, point.y);
    let w = f64::from(r.width.max(1));
    let h = f64::from(r.height.max(1));
    let left = (x >= r.x && x < r.x + band_w).then(|| f64::from(x - r.x) / w);
    let right = (x > r.right() - band_w && x <= r.right()).then(|| f64::from(r.right() - x) / w);
    let above = (y >= r.y && y < r.y + band_h).then(|| f64::from(y - r.y) / h);
    let below = (y > r.bottom() - band_h && y <= r.bottom()).then(|| f64::from(r.bottom() - y) / h);
    [
        (Edge::Left, left),
        (Edge::Right, right),
        (Edge::Top, above),
        (Edge::Bottom, below),
    ]
}

/// The side nearest to the pointer; ties go to the earlier entry.
fn nearest_side(sides: &[(Edge, Option<f64>); 4]) -> Option<Edge> {
    let mut best: Option<(Edge, f64)> = None;
    for (edge, distance) in sides {
        let Some(distance) = *distance else {
            continue;
        };
        if best.is_none_or(|(_, d)| distance < d) {
            best = Some((*edge, distance));
        }
    }
    best.map(|(edge, _)| edge)
}

/// Removes split sides that would recreate the source pane's current place.
///
/// Dragging the sole tab of a pane onto the facing edge of its full-span
/// neighbour would only move it back where it already is.
fn suppress_self_drop(
    tree: &PaneTree,
    rules: &DropRules,
    source: PaneId,
    target: PaneId,
    sides: &mut [(Edge, Option<f64>); 4],
) {
    let (Some(parent), Some(target_parent)) = (tree.parent(source), tree.parent(target)) else {
        return;
    };
    let (Some((first, second)), Some(orientation)) =
        (tree.children(parent), tree.orientation(parent))
    else {
        return;
    };
    if tree.orientation(target_parent) != Some(orientation) {
        return;
    }
    let grandparent = tree.parent(parent).and_then(|g| tree.children(g));
    let (mut first_most, mut second_most) = (None, None);
    if source == first {
        first_most = Some(tree.first_most(second));
        if let Some((outer_first, outer_second)) = grandparent {
            if outer_second == parent {
                second_most = Some(tree.second_most(outer_first));
            }
        }
    } else {
        second_most = Some(tree.second_most(first));
        if let Some((outer_first, outer_second)) = grandparent {
            if outer_first == parent {
                first_most = Some(tree.first_most(outer_second));
            }
        }
    }

    let (Some(current), Some(target_rect)) = (tree.rect(source), tree.rect(target)) else {
        return;
    };
    let current = current.below_top(rules.tab_height);
    let r = target_rect.below_top(rules.tab_height);
    let suppressed = if first_most == Some(target) {
        match orientation {
            Orientation::Vertical if r.height == current.height => Some(Edge::Left),
            Orientation::Horizontal if r.width == current.width => Some(Edge::Top),
            _ => None,
        }
    } else if second_most == Some(target) {
        match orientation {
            Orientation::Vertical if r.height == current.height && r.y == current.y => {
                Some(Edge::Right)
            }
            Orientation::Horizontal if r.width == current.width && r.x == current.x => {
                Some(Edge::Bottom)
            }
            _ => None,
        }
    } else {
        None
    };
    if let Some(edge) = suppressed {
        for side in sides.iter_mut().filter(|(e, _)| *e == edge) {
            side.1 = None;
        }
    }
}

/// A divider drag. Motion accumulates until the next poll applies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DividerDrag {
    branch: PaneId,
    orientation: Orientation,
    last: Point,
    pending: i32,
}

impl DividerDrag {
    /// Starts dragging the divider of `branch` at `point`.
    #[must_use]
    pub const fn new(branch: PaneId, orientation: Orientation, point: Point) -> Self {
        Self {
            branch,
            orientation,
            last: point,
            pending: 0,
        }
    }

    /// Branch owning the divider.
    #[must_use]
    pub const fn branch(&self) -> PaneId {
        self.branch
    }

    /// Accumulates the motion to `point` along the divider axis.
    pub fn motion(&mut self, point: Point) {
        self.pending += point.along(self.orientation) - self.last.along(self.orientation);
        self.last = point;
    }

    /// Delta not yet applied.
    #[must_use]
    pub const fn pending(&self) -> i32 {
        self.pending
    }

    /// Returns and clears the accumulated delta.
    pub fn take_delta(&mut self) -> i32 {
        std::mem::take(&mut self.pending)
    }
}
