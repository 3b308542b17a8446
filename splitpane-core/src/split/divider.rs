//! Divider between the two children of a branch
//!
//! The divider offset is an absolute workspace coordinate along the split
//! axis (x for vertical dividers, y for horizontal ones). Keeping it absolute
//! means that moving an outer divider only resizes the panes adjacent to it;
//! nested dividers stay where they are as long as they remain in range.

use super::types::{Orientation, Rect};

/// Draggable separator owned by a branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Divider {
    orientation: Orientation,
    offset: i32,
    thickness: i32,
    dragging: bool,
    placed: bool,
}

impl Divider {
    /// Creates an unplaced divider. It is centred on the first geometry pass.
    #[must_use]
    pub const fn new(orientation: Orientation, thickness: i32) -> Self {
        Self {
            orientation,
            offset: 0,
            thickness,
            dragging: false,
            placed: false,
        }
    }

    /// Orientation of the divider line.
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Absolute offset of the divider's leading edge.
    #[must_use]
    pub const fn offset(&self) -> i32 {
        self.offset
    }

    /// Thickness in pixels.
    #[must_use]
    pub const fn thickness(&self) -> i32 {
        self.thickness
    }

    /// Changes the thickness, keeping the offset.
    pub fn set_thickness(&mut self, thickness: i32) {
        self.thickness = thickness.max(0);
    }

    /// Returns true while a pointer drag owns the divider.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Marks the divider as being dragged.
    pub fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }

    /// Returns true once the divider has a position.
    #[must_use]
    pub const fn is_placed(&self) -> bool {
        self.placed
    }

    /// Centres the divider inside `area`.
    pub fn reset(&mut self, area: Rect) {
        let o = self.orientation;
        self.offset = area.start(o) + (area.extent(o) - self.thickness) / 2;
        self.placed = true;
    }

    /// Moves the divider to an absolute offset without clamping.
    pub fn move_to(&mut self, offset: i32) {
        self.offset = offset;
        self.placed = true;
    }

    /// Moves the divider by `delta` pixels without clamping.
    pub fn move_by(&mut self, delta: i32) {
        self.move_to(self.offset + delta);
    }

    /// Smallest extent of `area` that can honour `min_size` on both sides.
    #[must_use]
    pub const fn required_extent(&self, min_size: i32) -> i32 {
        2 * min_size + self.thickness
    }

    /// Keeps both children of `area` at least `min_size` pixels wide.
    ///
    /// When `area` is too small to honour the minimum on both sides the
    /// divider goes back to its reset position, the midpoint of `area`.
    /// Returns true if the offset changed.
    pub fn clamp(&mut self, area: Rect, min_size: i32) -> bool {
        let before = (self.offset, self.placed);
        let o = self.orientation;
        let extent = area.extent(o);
        if !self.placed || extent < self.required_extent(min_size) {
            self.reset(area);
        } else {
            let start = area.start(o);
            let low = start + min_size;
            let high = start + extent - self.thickness - min_size;
            self.offset = self.offset.clamp(low, high);
        }
        before != (self.offset, self.placed)
    }

    /// Rectangle covered by the divider inside `area`.
    #[must_use]
    pub const fn rect(&self, area: Rect) -> Rect {
        match self.orientation {
            Orientation::Vertical => Rect::new(self.offset, area.y, self.thickness, area.height),
            Orientation::Horizontal => Rect::new(area.x, self.offset, area.width, self.thickness),
        }
    }

    /// Rectangles of the first and second child inside `area`.
    #[must_use]
    pub fn child_rects(&self, area: Rect) -> (Rect, Rect) {
        area.split(self.orientation, self.offset, self.thickness)
    }

    /// Moves the divider so that one child reaches `size` pixels.
    ///
    /// `current` is the child's present extent; `is_first` tells which side
    /// of the divider the child is on.
    pub fn resize_child(&mut self, is_first: bool, current: i32, size: i32) {
        let delta = size - current;
        self.move_by(if is_first { delta } else { -delta });
    }

    /// Maps the offset proportionally from `from` into `to`.
    pub fn rescale(&mut self, from: Rect, to: Rect) {
        let o = self.orientation;
        let from_extent = from.extent(o);
        if from_extent <= 0 || !self.placed {
            self.reset(to);
            return;
        }
        let ratio = f64::from(self.offset - from.start(o)) / f64::from(from_extent);
        self.offset = to.start(o) + (ratio * f64::from(to.extent(o))).round() as i32;
    }
}
