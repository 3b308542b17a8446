//! Core type definitions for the split pane engine
//!
//! This module contains the identifier types, orientations and the integer
//! geometry primitives used throughout the pane tree.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Handle to a node in the pane tree arena.
///
/// A handle stays valid while its node is alive. Once the node is removed
/// the slot's generation is bumped, so stale handles are detected instead of
/// silently addressing a different node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PaneId {
    index: u32,
    generation: u32,
}

impl PaneId {
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Arena slot of this handle.
    #[must_use]
    pub const fn index(self) -> usize {
        self.index as usize
    }

    /// Generation counter of the slot when this handle was issued.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pane({}v{})", self.index, self.generation)
    }
}

/// Stable identity of a tab entry, independent of its display position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TabId(pub Uuid);

impl TabId {
    /// Creates a new random tab ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TabId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tab({})", self.0)
    }
}

/// Identity of a host document view (one on-screen canvas of a document).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewId(pub Uuid);

impl ViewId {
    /// Creates a new random view ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ViewId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "View({})", self.0)
    }
}

/// Identity of a host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub Uuid);

impl DocumentId {
    /// Creates a new random document ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Document({})", self.0)
    }
}

/// Orientation of a branch and its divider.
///
/// The name follows the divider line: a `Vertical` divider places the
/// children side by side (left | right), a `Horizontal` divider stacks them
/// (top over bottom).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Children stacked top and bottom.
    Horizontal,
    /// Children placed left and right.
    Vertical,
}

impl Orientation {
    /// Returns the other orientation.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Horizontal => write!(f, "Horizontal"),
            Self::Vertical => write!(f, "Vertical"),
        }
    }
}

/// Edge of a rectangle, used for workspace-edge splits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    /// Left edge
    Left,
    /// Right edge
    Right,
    /// Top edge
    Top,
    /// Bottom edge
    Bottom,
}

impl Edge {
    /// Orientation of the branch created by splitting at this edge.
    #[must_use]
    pub const fn orientation(self) -> Orientation {
        match self {
            Self::Left | Self::Right => Orientation::Vertical,
            Self::Top | Self::Bottom => Orientation::Horizontal,
        }
    }

    /// Whether the edge is on the leading side (left or top).
    #[must_use]
    pub const fn is_leading(self) -> bool {
        matches!(self, Self::Left | Self::Top)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => write!(f, "Left"),
            Self::Right => write!(f, "Right"),
            Self::Top => write!(f, "Top"),
            Self::Bottom => write!(f, "Bottom"),
        }
    }
}

/// A point in workspace pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    /// Horizontal coordinate
    pub x: i32,
    /// Vertical coordinate
    pub y: i32,
}

impl Point {
    /// Creates a new point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Coordinate along the axis that `orientation` splits.
    #[must_use]
    pub const fn along(self, orientation: Orientation) -> i32 {
        match orientation {
            Orientation::Vertical => self.x,
            Orientation::Horizontal => self.y,
        }
    }
}

/// An integer rectangle in workspace pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left coordinate
    pub x: i32,
    /// Top coordinate
    pub y: i32,
    /// Width in pixels
    pub width: i32,
    /// Height in pixels
    pub height: i32,
}

impl Rect {
    /// Creates a new rectangle.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right coordinate.
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Exclusive bottom coordinate.
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Returns true if the rectangle has no area.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Area in square pixels.
    #[must_use]
    pub const fn area(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            self.width as i64 * self.height as i64
        }
    }

    /// Returns true if `point` lies inside the rectangle (right/bottom exclusive).
    #[must_use]
    pub const fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Returns true if `other` lies entirely inside this rectangle.
    #[must_use]
    pub const fn contains_rect(&self, other: &Self) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Returns true if both rectangles share any area.
    #[must_use]
    pub const fn intersects(&self, other: &Self) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Start coordinate along the split axis of `orientation`.
    #[must_use]
    pub const fn start(&self, orientation: Orientation) -> i32 {
        match orientation {
            Orientation::Vertical => self.x,
            Orientation::Horizontal => self.y,
        }
    }

    /// Extent along the split axis of `orientation`.
    #[must_use]
    pub const fn extent(&self, orientation: Orientation) -> i32 {
        match orientation {
            Orientation::Vertical => self.width,
            Orientation::Horizontal => self.height,
        }
    }

    /// Extent across the split axis of `orientation`.
    #[must_use]
    pub const fn cross_extent(&self, orientation: Orientation) -> i32 {
        self.extent(orientation.flipped())
    }

    /// Top strip of at most `height` pixels.
    #[must_use]
    pub fn top_strip(&self, height: i32) -> Self {
        Self::new(self.x, self.y, self.width, height.clamp(0, self.height.max(0)))
    }

    /// Rectangle below a top inset of `inset` pixels.
    #[must_use]
    pub fn below_top(&self, inset: i32) -> Self {
        let inset = inset.clamp(0, self.height.max(0));
        Self::new(self.x, self.y + inset, self.width, self.height - inset)
    }

    /// Partitions the rectangle at an absolute `offset` along `orientation`,
    /// leaving a gap of `thickness` pixels between the halves.
    ///
    /// Extents are clamped at zero so a degenerate offset never yields a
    /// negative rectangle.
    #[must_use]
    pub fn split(&self, orientation: Orientation, offset: i32, thickness: i32) -> (Self, Self) {
        match orientation {
            Orientation::Vertical => {
                let first = Self::new(self.x, self.y, (offset - self.x).max(0), self.height);
                let second_x = offset + thickness;
                let second =
                    Self::new(second_x, self.y, (self.right() - second_x).max(0), self.height);
                (first, second)
            }
            Orientation::Horizontal => {
                let first = Self::new(self.x, self.y, self.width, (offset - self.y).max(0));
                let second_y = offset + thickness;
                let second =
                    Self::new(self.x, second_y, self.width, (self.bottom() - second_y).max(0));
                (first, second)
            }
        }
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}
