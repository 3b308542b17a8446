//! Property-based tests for viewport preservation
//!
//! **Feature: viewport-preservation**
//!
//! Resizes are always computed from the snapshot taken when a resize
//! session starts, so any resize sequence that brings a pane back to its
//! original rectangle must bring its canvas back too.

use std::path::Path;

use proptest::prelude::*;
use splitpane_core::config::{EngineConfig, ResizeSettings, ScalingMode};
use splitpane_core::host::{DocumentHost, MemoryHost};
use splitpane_core::split::{
    CanvasState, Orientation, Rect, SplitWorkspace, TabSource, ViewportSnapshot, preserve,
    states_match,
};

const CONTAINER: Rect = Rect::new(0, 0, 1000, 600);
const TOLERANCE: f64 = 2.0;

// ============================================================================
// Test Strategies
// ============================================================================

fn scaling_mode_strategy() -> impl Strategy<Value = ScalingMode> {
    prop_oneof![
        Just(ScalingMode::None),
        Just(ScalingMode::Anchored),
        Just(ScalingMode::Contained),
        Just(ScalingMode::Expanded),
    ]
}

fn canvas_strategy() -> impl Strategy<Value = CanvasState> {
    (
        100.0f64..4000.0,
        100.0f64..4000.0,
        0.05f64..8.0,
        -3000.0f64..1000.0,
        -3000.0f64..1000.0,
    )
        .prop_map(|(width, height, zoom, x, y)| {
            CanvasState::new(width, height)
                .with_zoom(zoom)
                .with_origin(x, y)
        })
}

fn viewport_strategy() -> impl Strategy<Value = Rect> {
    (0i32..400, 0i32..400, 1i32..1600, 1i32..1200)
        .prop_map(|(x, y, width, height)| Rect::new(x, y, width, height))
}

/// Container sizes that keep a centred vertical divider unclamped, so the
/// left pane's width never changes
fn container_sequence_strategy() -> impl Strategy<Value = Vec<Rect>> {
    proptest::collection::vec(
        (600i32..1600, 300i32..1200).prop_map(|(w, h)| Rect::new(0, 0, w, h)),
        1..8,
    )
}

// ============================================================================
// Property 1: Viewport Idempotence
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Feature: viewport-preservation, Property 1: Viewport Idempotence
    //
    // *For any* snapshot and scaling mode, preserving into the snapshot's own
    // rectangle returns the captured canvas unchanged.

    #[test]
    fn prop_same_viewport_keeps_canvas(
        canvas in canvas_strategy(),
        viewport in viewport_strategy(),
        mode in scaling_mode_strategy(),
    ) {
        let snapshot = ViewportSnapshot::new(viewport, canvas);
        let settings = ResizeSettings::default();
        let state = preserve(&snapshot, viewport, mode, &settings);
        prop_assert!(states_match(&state, &canvas, TOLERANCE));
    }

    #[test]
    fn prop_intermediate_viewports_do_not_drift(
        canvas in canvas_strategy(),
        viewport in viewport_strategy(),
        path in proptest::collection::vec(viewport_strategy(), 1..6),
        mode in scaling_mode_strategy(),
    ) {
        let snapshot = ViewportSnapshot::new(viewport, canvas);
        let settings = ResizeSettings::default();
        for step in &path {
            let state = preserve(&snapshot, *step, mode, &settings);
            prop_assert!(state.zoom.is_finite() && state.zoom > 0.0);
            prop_assert!(state.origin_x.is_finite() && state.origin_y.is_finite());
        }
        let back = preserve(&snapshot, viewport, mode, &settings);
        prop_assert!(states_match(&back, &canvas, TOLERANCE));
    }

    // *For any* container resize sequence that returns to the original
    // size, the left pane's view ends with its original zoom and scroll.

    #[test]
    fn prop_container_round_trip_restores_canvas(
        canvas in canvas_strategy(),
        sizes in container_sequence_strategy(),
        mode in scaling_mode_strategy(),
    ) {
        let mut host = MemoryHost::with_files(["/a.png", "/b.png"]);
        host.open_file(Path::new("/a.png"));
        host.open_file(Path::new("/b.png"));
        let mut config = EngineConfig::default();
        config.resize.default_scaling_mode = mode;
        let mut ws = SplitWorkspace::new(host, config);
        ws.on_window_shown(CONTAINER);

        let root = ws.tree().root();
        let (left, _) = ws
            .split(root, Orientation::Vertical, false, Some(TabSource::tab(root, 1)))
            .unwrap();
        let view = ws.tree().tabs(left).unwrap().current().unwrap().view;
        ws.host_mut().apply_canvas(view, canvas);

        for size in &sizes {
            ws.on_container_resized(*size);
        }
        ws.on_container_resized(CONTAINER);

        let state = ws.host().canvas_state(view).unwrap();
        prop_assert!(states_match(&state, &canvas, TOLERANCE));
    }
}
