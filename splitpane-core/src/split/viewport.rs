//! Viewport preservation across pane resizes
//!
//! Before a divider drag or container resize, the canvas state of every
//! visible view is captured in a [`ViewportSnapshot`]. Each geometry pass
//! then recomputes the canvas state from that snapshot and the leaf's new
//! content rectangle. Results never depend on intermediate passes, so a
//! resize that returns to the original rectangle restores the original
//! state exactly.

use crate::config::{ResizeSettings, ScalingMode};

use super::types::Rect;

/// Floating point rectangle in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RectF {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl RectF {
    /// Creates a rectangle.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Horizontal centre.
    #[must_use]
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    /// Vertical centre.
    #[must_use]
    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Returns true if `other` lies inside this rectangle grown by `tolerance`.
    #[must_use]
    pub fn contains_rect(&self, other: &Self, tolerance: f64) -> bool {
        other.x >= self.x - tolerance
            && other.y >= self.y - tolerance
            && other.right() <= self.right() + tolerance
            && other.bottom() <= self.bottom() + tolerance
    }
}

impl From<Rect> for RectF {
    fn from(rect: Rect) -> Self {
        Self::new(
            f64::from(rect.x),
            f64::from(rect.y),
            f64::from(rect.width),
            f64::from(rect.height),
        )
    }
}

/// Zoom and scroll state of one view.
///
/// `origin_x`/`origin_y` place the document's top-left corner in viewport
/// coordinates; the document covers `document_* × zoom` pixels from there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasState {
    /// Zoom factor
    pub zoom: f64,
    /// Document left edge in viewport coordinates
    pub origin_x: f64,
    /// Document top edge in viewport coordinates
    pub origin_y: f64,
    /// Document width in document pixels
    pub document_width: f64,
    /// Document height in document pixels
    pub document_height: f64,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            origin_x: 0.0,
            origin_y: 0.0,
            document_width: 0.0,
            document_height: 0.0,
        }
    }
}

impl CanvasState {
    /// Creates a state for a document of the given size at zoom 1.
    #[must_use]
    pub const fn new(document_width: f64, document_height: f64) -> Self {
        Self {
            zoom: 1.0,
            origin_x: 0.0,
            origin_y: 0.0,
            document_width,
            document_height,
        }
    }

    /// Sets the zoom factor.
    #[must_use]
    pub const fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = zoom;
        self
    }

    /// Sets the document origin.
    #[must_use]
    pub const fn with_origin(mut self, x: f64, y: f64) -> Self {
        self.origin_x = x;
        self.origin_y = y;
        self
    }

    /// Document rectangle in viewport coordinates.
    #[must_use]
    pub fn content_rect(&self) -> RectF {
        RectF::new(
            self.origin_x,
            self.origin_y,
            self.document_width * self.zoom,
            self.document_height * self.zoom,
        )
    }

    fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        (self.zoom - other.zoom).abs() <= epsilon
            && (self.origin_x - other.origin_x).abs() <= epsilon
            && (self.origin_y - other.origin_y).abs() <= epsilon
    }
}

/// Canvas state captured before a resize, with the leaf content rectangle
/// (workspace coordinates) it was captured in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportSnapshot {
    /// Leaf content rectangle at capture time
    pub viewport: Rect,
    /// Canvas state at capture time
    pub canvas: CanvasState,
}

impl ViewportSnapshot {
    /// Captures `canvas` shown inside `viewport`.
    #[must_use]
    pub const fn new(viewport: Rect, canvas: CanvasState) -> Self {
        Self { viewport, canvas }
    }

    /// Returns true if the document fitted the viewport within `tolerance`.
    #[must_use]
    pub fn content_fits(&self, tolerance: f64) -> bool {
        self.local_viewport()
            .contains_rect(&self.canvas.content_rect(), tolerance)
    }

    fn local_viewport(&self) -> RectF {
        RectF::new(
            0.0,
            0.0,
            f64::from(self.viewport.width),
            f64::from(self.viewport.height),
        )
    }
}

/// Recomputes a view's canvas state after its viewport moved to `viewport`.
///
/// A scaling `mode` other than [`ScalingMode::None`] rescales the zoom when
/// the snapshot passes the containment gates in `settings`. Otherwise the
/// contained rule applies when the document fitted the old viewport and the
/// edge-clamped rule applies when it overflowed.
#[must_use]
pub fn preserve(
    snapshot: &ViewportSnapshot,
    viewport: Rect,
    mode: ScalingMode,
    settings: &ResizeSettings,
) -> CanvasState {
    let old = snapshot.viewport;
    if old.width <= 0 || old.height <= 0 || viewport.width <= 0 || viewport.height <= 0 {
        return snapshot.canvas;
    }
    if old == viewport {
        return snapshot.canvas;
    }
    if old.width == viewport.width && old.height == viewport.height {
        return edge_clamped(snapshot, viewport);
    }

    if mode != ScalingMode::None && scaling_allowed(snapshot, settings) {
        return match mode {
            ScalingMode::Anchored => anchored(snapshot, viewport),
            ScalingMode::Contained => proportional(snapshot, viewport, f64::min),
            ScalingMode::Expanded => proportional(snapshot, viewport, f64::max),
            ScalingMode::None => snapshot.canvas,
        };
    }

    if snapshot.content_fits(settings.contain_tolerance) {
        contained(snapshot, viewport, settings.zoom_constraint)
    } else {
        edge_clamped(snapshot, viewport)
    }
}

/// Returns true if the two states agree within `epsilon` pixels.
#[must_use]
pub fn states_match(a: &CanvasState, b: &CanvasState, epsilon: f64) -> bool {
    a.approx_eq(b, epsilon)
}

fn scaling_allowed(snapshot: &ViewportSnapshot, settings: &ResizeSettings) -> bool {
    let view = snapshot.local_viewport();
    let content = snapshot.canvas.content_rect();
    if settings.scaling_contained_only && !view.contains_rect(&content, 0.0) {
        return false;
    }
    let fits_width = view.width >= content.width;
    let fits_height = view.height >= content.height;
    if settings.scaling_contained_partial && !(fits_width && fits_height) {
        return false;
    }
    if settings.scaling_contained_shorter && !(fits_width || fits_height) {
        return false;
    }
    true
}

/// Scales zoom with the viewport along the changed axis. When both axes
/// changed, the axis of the new viewport's shorter side wins. Content stays
/// anchored to the leading edge on that axis and keeps its centre on the
/// other.
fn anchored(snapshot: &ViewportSnapshot, viewport: Rect) -> CanvasState {
    let canvas = snapshot.canvas;
    let content = canvas.content_rect();
    let old = snapshot.viewport;
    let mut width_changed = viewport.width != old.width;
    if width_changed && viewport.height != old.height {
        width_changed = viewport.width <= viewport.height;
    }

    let mut state = canvas;
    if width_changed {
        let scale = f64::from(viewport.width) / f64::from(old.width);
        state.zoom = canvas.zoom * scale;
        state.origin_x = content.x * scale;
        state.origin_y = content.center_y() - state.content_rect().height / 2.0;
    } else {
        let scale = f64::from(viewport.height) / f64::from(old.height);
        state.zoom = canvas.zoom * scale;
        state.origin_y = content.y * scale;
        state.origin_x = content.center_x() - state.content_rect().width / 2.0;
    }
    state
}

/// Scales zoom by `pick` of the two axis ratios, keeping the document point
/// under the viewport centre fixed.
fn proportional(
    snapshot: &ViewportSnapshot,
    viewport: Rect,
    pick: fn(f64, f64) -> f64,
) -> CanvasState {
    let canvas = snapshot.canvas;
    let old = snapshot.viewport;
    let (old_w, old_h) = (f64::from(old.width), f64::from(old.height));
    let (new_w, new_h) = (f64::from(viewport.width), f64::from(viewport.height));
    let scale = pick(new_w / old_w, new_h / old_h);

    let anchor_x = (old_w / 2.0 - canvas.origin_x) / canvas.zoom;
    let anchor_y = (old_h / 2.0 - canvas.origin_y) / canvas.zoom;
    let zoom = canvas.zoom * scale;
    CanvasState {
        zoom,
        origin_x: new_w / 2.0 - anchor_x * zoom,
        origin_y: new_h / 2.0 - anchor_y * zoom,
        ..canvas
    }
}

/// The document fitted the old viewport: keep it fitting and centred on
/// the axes that changed.
fn contained(snapshot: &ViewportSnapshot, viewport: Rect, zoom_constraint: bool) -> CanvasState {
    let canvas = snapshot.canvas;
    let content = canvas.content_rect();
    let old = snapshot.viewport;
    let (new_w, new_h) = (f64::from(viewport.width), f64::from(viewport.height));

    let mut zoom = canvas.zoom;
    if zoom_constraint {
        let fit_x = if content.width > new_w {
            new_w / content.width
        } else {
            1.0
        };
        let fit_y = if content.height > new_h {
            new_h / content.height
        } else {
            1.0
        };
        zoom *= fit_x.min(fit_y);
    }

    let width = canvas.document_width * zoom;
    let height = canvas.document_height * zoom;
    let origin_x = if viewport.width == old.width {
        content.center_x() - width / 2.0
    } else {
        (new_w - width) / 2.0
    };
    let origin_y = if viewport.height == old.height {
        content.center_y() - height / 2.0
    } else {
        (new_h - height) / 2.0
    };
    CanvasState {
        zoom,
        origin_x,
        origin_y,
        ..canvas
    }
}

/// The document overflowed: keep it where it was on screen, without
/// revealing more background at the leading edge or less content at the
/// trailing edge than before.
fn edge_clamped(snapshot: &ViewportSnapshot, viewport: Rect) -> CanvasState {
    let canvas = snapshot.canvas;
    let content = canvas.content_rect();
    let old = snapshot.viewport;

    let origin_x = clamp_axis(
        content.x,
        content.width,
        f64::from(viewport.x - old.x),
        f64::from(old.width),
        f64::from(viewport.width),
    );
    let origin_y = clamp_axis(
        content.y,
        content.height,
        f64::from(viewport.y - old.y),
        f64::from(old.height),
        f64::from(viewport.height),
    );
    CanvasState {
        origin_x,
        origin_y,
        ..canvas
    }
}

fn clamp_axis(origin: f64, extent: f64, shift: f64, old_extent: f64, new_extent: f64) -> f64 {
    let leading_gap = origin.max(0.0);
    let trailing_gap = (old_extent - (origin + extent)).max(0.0);

    let mut moved = origin - shift;
    if moved > leading_gap {
        moved = leading_gap;
    }
    let min_origin = new_extent - extent - trailing_gap;
    if moved < min_origin {
        moved = min_origin;
    }
    moved
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> ResizeSettings {
        ResizeSettings::default()
    }

    fn snapshot(viewport: Rect, canvas: CanvasState) -> ViewportSnapshot {
        ViewportSnapshot::new(viewport, canvas)
    }

    #[test]
    fn test_same_rect_is_identity() {
        let snap = snapshot(
            Rect::new(0, 30, 500, 400),
            CanvasState::new(2000.0, 1000.0).with_origin(-300.0, -120.0),
        );
        for mode in ScalingMode::all() {
            assert_eq!(
                preserve(&snap, Rect::new(0, 30, 500, 400), *mode, &settings()),
                snap.canvas
            );
        }
    }

    #[test]
    fn test_zero_size_is_ignored() {
        let snap = snapshot(Rect::new(0, 0, 500, 400), CanvasState::new(100.0, 100.0));
        let state = preserve(&snap, Rect::new(0, 0, 0, 400), ScalingMode::None, &settings());
        assert_eq!(state, snap.canvas);
    }

    #[test]
    fn test_contained_shrink_fits_with_zoom_constraint() {
        // 400x300 document centred in 500x400
        let snap = snapshot(
            Rect::new(0, 0, 500, 400),
            CanvasState::new(400.0, 300.0).with_origin(50.0, 50.0),
        );
        let state = preserve(&snap, Rect::new(0, 0, 200, 400), ScalingMode::None, &settings());
        assert!((state.zoom - 0.5).abs() < 1e-9);
        let content = state.content_rect();
        assert!((content.center_x() - 100.0).abs() < 1e-9);
        assert!((content.center_y() - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_contained_without_zoom_constraint_recentres() {
        let mut settings = settings();
        settings.zoom_constraint = false;
        let snap = snapshot(
            Rect::new(0, 0, 500, 400),
            CanvasState::new(400.0, 300.0).with_origin(50.0, 50.0),
        );
        let state = preserve(&snap, Rect::new(0, 0, 300, 400), ScalingMode::None, &settings);
        assert_eq!(state.zoom, 1.0);
        assert_eq!(state.origin_x, -50.0);
        assert_eq!(state.origin_y, 50.0);
    }

    #[test]
    fn test_edge_clamped_keeps_screen_position() {
        // Overflowing document; the pane's left edge moves right by 100
        let snap = snapshot(
            Rect::new(0, 0, 500, 400),
            CanvasState::new(2000.0, 2000.0).with_origin(-300.0, -100.0),
        );
        let state = preserve(&snap, Rect::new(100, 0, 400, 400), ScalingMode::None, &settings());
        assert_eq!(state.zoom, 1.0);
        assert_eq!(state.origin_x, -400.0);
        assert_eq!(state.origin_y, -100.0);
    }

    #[test]
    fn test_edge_clamped_leading_gap_does_not_grow() {
        // Document starts 20px into the viewport; the left edge moves left by 100
        let snap = snapshot(
            Rect::new(200, 0, 500, 400),
            CanvasState::new(2000.0, 2000.0).with_origin(20.0, -100.0),
        );
        let state = preserve(&snap, Rect::new(100, 0, 600, 400), ScalingMode::None, &settings());
        assert_eq!(state.origin_x, 20.0);
    }

    #[test]
    fn test_edge_clamped_trailing_gap_does_not_grow() {
        // Document ends exactly at the right edge; the pane widens to the right
        let snap = snapshot(
            Rect::new(0, 0, 500, 400),
            CanvasState::new(1000.0, 2000.0).with_origin(-500.0, -100.0),
        );
        let state = preserve(&snap, Rect::new(0, 0, 700, 400), ScalingMode::None, &settings());
        assert_eq!(state.origin_x, -300.0);
    }

    #[test]
    fn test_anchored_scales_with_width() {
        let snap = snapshot(
            Rect::new(0, 0, 400, 400),
            CanvasState::new(1000.0, 1000.0).with_origin(-100.0, -300.0),
        );
        let state = preserve(&snap, Rect::new(0, 0, 200, 400), ScalingMode::Anchored, &settings());
        assert!((state.zoom - 0.5).abs() < 1e-9);
        assert!((state.origin_x + 50.0).abs() < 1e-9);
        // vertical centre of the content is kept
        let before = snap.canvas.content_rect().center_y();
        assert!((state.content_rect().center_y() - before).abs() < 1e-9);
    }

    #[test]
    fn test_contained_and_expanded_keep_centre() {
        let snap = snapshot(
            Rect::new(0, 0, 400, 400),
            CanvasState::new(1000.0, 1000.0).with_origin(-100.0, -300.0),
        );
        let anchor = |state: &CanvasState, w: f64, h: f64| {
            (
                (w / 2.0 - state.origin_x) / state.zoom,
                (h / 2.0 - state.origin_y) / state.zoom,
            )
        };
        let before = anchor(&snap.canvas, 400.0, 400.0);

        let contained = preserve(&snap, Rect::new(0, 0, 200, 300), ScalingMode::Contained, &settings());
        assert!((contained.zoom - 0.5).abs() < 1e-9);
        let after = anchor(&contained, 200.0, 300.0);
        assert!((after.0 - before.0).abs() < 1e-9 && (after.1 - before.1).abs() < 1e-9);

        let expanded = preserve(&snap, Rect::new(0, 0, 200, 300), ScalingMode::Expanded, &settings());
        assert!((expanded.zoom - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_scaling_gate_falls_back() {
        let mut settings = settings();
        settings.scaling_contained_only = true;
        let snap = snapshot(
            Rect::new(0, 0, 400, 400),
            CanvasState::new(1000.0, 1000.0).with_origin(-100.0, -300.0),
        );
        let state = preserve(&snap, Rect::new(0, 0, 200, 400), ScalingMode::Anchored, &settings);
        assert_eq!(state.zoom, 1.0);
    }

    #[test]
    fn test_round_trip_is_identity() {
        let snap = snapshot(
            Rect::new(0, 0, 500, 400),
            CanvasState::new(400.0, 300.0).with_origin(50.0, 50.0),
        );
        let _ = preserve(&snap, Rect::new(0, 0, 100, 400), ScalingMode::None, &settings());
        let back = preserve(&snap, Rect::new(0, 0, 500, 400), ScalingMode::None, &settings());
        assert!(states_match(&back, &snap.canvas, 2.0));
    }
}
