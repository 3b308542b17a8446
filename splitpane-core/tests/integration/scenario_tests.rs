//! End-to-end scenarios driven through `SplitWorkspace` and `MemoryHost`

use std::path::Path;
use std::time::Duration;

use splitpane_core::host::{DocumentHost, MemoryHost, SettingsStore};
use splitpane_core::split::{
    Command, DragButton, DragMotion, DropAction, Edge, MISSING_FILES_WARNING, Orientation, PaneId,
    Point, RESTORE_LAYOUT_KEY, Rect, RestoreOptions, SETTINGS_GROUP, SavedLayout, SplitWorkspace,
    TabSelection, TabSource, Task, ViewId,
};
use splitpane_core::EngineConfig;

const CONTAINER: Rect = Rect::new(0, 0, 1000, 600);

fn workspace(files: &[&str]) -> SplitWorkspace<MemoryHost> {
    let mut host = MemoryHost::with_files(files.iter().copied());
    for file in files {
        host.open_file(Path::new(file));
    }
    let mut ws = SplitWorkspace::new(host, EngineConfig::default());
    ws.on_window_shown(CONTAINER);
    ws
}

fn files_in(ws: &SplitWorkspace<MemoryHost>, pane: PaneId) -> Vec<String> {
    ws.tree()
        .tabs(pane)
        .unwrap()
        .iter()
        .filter_map(|tab| tab.path.as_ref())
        .map(|path| path.to_string_lossy().into_owned())
        .collect()
}

fn pane_of(ws: &SplitWorkspace<MemoryHost>, file: &str) -> PaneId {
    ws.tree().find_path(Path::new(file)).unwrap().0
}

fn view_of(ws: &SplitWorkspace<MemoryHost>, file: &str) -> ViewId {
    let (pane, index) = ws.tree().find_path(Path::new(file)).unwrap();
    ws.tree().tabs(pane).unwrap().get(index).unwrap().view
}

const XYZ_LAYOUT: &str = r#"{
    "state": "s", "winWidth": 1000, "winHeight": 600,
    "layout": {"state": "v", "splitSize": 0,
        "first": {"state": "c", "files": ["/x.png", "/y.png"], "active": 1,
                  "splitSize": 400, "isActiveSplit": true},
        "second": {"state": "c", "files": ["/z.png"], "active": 0,
                   "splitSize": 592, "isActiveSplit": false}}
}"#;

#[test]
fn test_split_move_right_from_menu() {
    let mut ws = workspace(&["/a.png", "/b.png"]);
    let root = ws.tree().root();
    ws.execute(Command::SplitMove {
        pane: root,
        index: 1,
        side: Edge::Right,
    })
    .unwrap();

    let root = ws.tree().root();
    assert_eq!(ws.tree().orientation(root), Some(Orientation::Vertical));
    let (first, second) = ws.tree().children(root).unwrap();
    assert_eq!(files_in(&ws, first), vec!["/a.png"]);
    assert_eq!(files_in(&ws, second), vec!["/b.png"]);
    assert_eq!(ws.tree().rect(first).unwrap().width, 496);
    assert_eq!(ws.tree().rect(second).unwrap().x, 504);

    let b = ws.host().view(view_of(&ws, "/b.png")).unwrap();
    assert_eq!(b.rect, Rect::new(504, 30, 496, 570));
    assert!(b.visible);
}

#[test]
fn test_closing_last_tab_collapses_nested_split() {
    let mut ws = workspace(&["/a.png", "/b.png", "/c.png"]);
    let root = ws.tree().root();
    let (left, right) = ws
        .split(root, Orientation::Vertical, false, Some(TabSource::tab(root, 1)))
        .unwrap();
    assert_eq!(files_in(&ws, left), vec!["/a.png", "/c.png"]);

    ws.transfer_tabs(TabSource::tab(left, 1), right).unwrap();
    assert_eq!(files_in(&ws, right), vec!["/b.png", "/c.png"]);

    ws.split(right, Orientation::Horizontal, false, Some(TabSource::tab(right, 1)))
        .unwrap();
    assert_eq!(ws.tree().leaf_count(), 3);

    let b_pane = pane_of(&ws, "/b.png");
    ws.close_tab(b_pane, 0).unwrap();

    assert_eq!(ws.tree().leaf_count(), 2);
    let (first, second) = ws.tree().children(ws.tree().root()).unwrap();
    assert_eq!(files_in(&ws, first), vec!["/a.png"]);
    assert_eq!(files_in(&ws, second), vec!["/c.png"]);
    assert_eq!(ws.tree().rect(second), Some(Rect::new(504, 0, 496, 600)));
    assert!(ws.tree().find_path(Path::new("/b.png")).is_none());
    assert_eq!(ws.host().views().len(), 2);
}

#[test]
fn test_restore_from_json_rebuilds_sizes_and_selection() {
    let host = MemoryHost::with_files(["/x.png", "/y.png", "/z.png"]);
    let mut ws = SplitWorkspace::new(host, EngineConfig::default());
    ws.on_window_shown(CONTAINER);

    let layout = SavedLayout::from_json(XYZ_LAYOUT).unwrap();
    ws.restore_layout(layout, RestoreOptions::default()).unwrap();
    ws.run_pending();

    let root = ws.tree().root();
    assert_eq!(ws.tree().orientation(root), Some(Orientation::Vertical));
    let (first, second) = ws.tree().children(root).unwrap();
    assert_eq!(files_in(&ws, first), vec!["/x.png", "/y.png"]);
    assert_eq!(files_in(&ws, second), vec!["/z.png"]);
    assert_eq!(ws.tree().tabs(first).unwrap().current_index(), Some(1));
    assert_eq!(ws.tree().tabs(second).unwrap().current_index(), Some(0));
    assert_eq!(ws.tree().rect(first).unwrap().width, 400);
    assert_eq!(ws.tree().rect(second).unwrap().width, 592);

    assert_eq!(ws.active_pane(), first);
    assert_eq!(ws.host().active_view(), Some(view_of(&ws, "/y.png")));
    assert!(ws.host().warnings().is_empty());
}

#[test]
fn test_restore_skips_missing_file_with_warning() {
    let host = MemoryHost::with_files(["/x.png", "/z.png"]);
    let mut ws = SplitWorkspace::new(host, EngineConfig::default());
    ws.on_window_shown(CONTAINER);

    let layout = SavedLayout::from_json(XYZ_LAYOUT).unwrap();
    ws.restore_layout(layout, RestoreOptions::default()).unwrap();
    ws.run_pending();

    let report = ws.last_restore().unwrap();
    assert_eq!(report.missing, vec!["/y.png"]);
    assert_eq!(report.restored, vec!["/x.png", "/z.png"]);
    assert_eq!(
        ws.host().warnings(),
        &[format!("{MISSING_FILES_WARNING}\n/y.png")]
    );
    let (first, second) = ws.tree().children(ws.tree().root()).unwrap();
    assert_eq!(files_in(&ws, first), vec!["/x.png"]);
    assert_eq!(files_in(&ws, second), vec!["/z.png"]);
}

#[test]
fn test_middle_drag_to_right_edge_adds_workspace_column() {
    let mut ws = workspace(&["/a.png", "/b.png", "/c.png"]);
    let root = ws.tree().root();
    let (top, _) = ws
        .split(root, Orientation::Horizontal, false, Some(TabSource::tab(root, 2)))
        .unwrap();

    assert!(ws.press_tab(top, TabSelection::One(0), DragButton::Middle, Point::new(40, 15)));
    assert!(ws.tab_drag().unwrap().is_active());
    ws.pointer_moved(Point::new(990, 100));
    let action = ws.pointer_released(Point::new(990, 100)).unwrap();
    assert_eq!(action, Some(DropAction::EdgeSplit(Edge::Right)));

    let root = ws.tree().root();
    assert_eq!(ws.tree().orientation(root), Some(Orientation::Vertical));
    let (rest, column) = ws.tree().children(root).unwrap();
    assert!(ws.tree().is_leaf(column));
    assert_eq!(files_in(&ws, column), vec!["/a.png"]);
    let rect = ws.tree().rect(column).unwrap();
    assert_eq!((rect.x, rect.width), (750, 250));
    assert_eq!(ws.tree().orientation(rest), Some(Orientation::Horizontal));
    assert_eq!(ws.tree().rect(rest).unwrap().width, 742);
    assert!(ws.tab_drag().is_none());
}

#[test]
fn test_sideways_primary_drag_becomes_reorder() {
    let mut ws = workspace(&["/a.png", "/b.png"]);
    let root = ws.tree().root();
    assert!(ws.press_tab(root, TabSelection::One(0), DragButton::Primary, Point::new(40, 15)));
    assert!(!ws.tab_drag().unwrap().is_active());

    assert_eq!(ws.pointer_moved(Point::new(45, 16)), Some(DragMotion::Pending));
    assert_eq!(ws.pointer_moved(Point::new(120, 20)), Some(DragMotion::Reorder));
    assert!(ws.tab_drag().is_none());
    assert_eq!(ws.pointer_released(Point::new(120, 20)).unwrap(), None);
    assert!(!ws.tree().is_split());
}

#[test]
fn test_divider_drag_moves_and_schedules_save() {
    let mut config = EngineConfig::default();
    config.persistence.restore_layout = true;
    let mut host = MemoryHost::with_files(["/a.png", "/b.png"]);
    host.open_file(Path::new("/a.png"));
    host.open_file(Path::new("/b.png"));
    let mut ws = SplitWorkspace::new(host, config);
    ws.on_window_shown(CONTAINER);
    let root = ws.tree().root();
    let (left, right) = ws
        .split(root, Orientation::Vertical, false, Some(TabSource::tab(root, 1)))
        .unwrap();

    let branch = ws.press_divider(Point::new(500, 300)).unwrap();
    assert_eq!(branch, ws.tree().root());
    assert!(ws.is_dragging_divider());
    ws.pointer_moved(Point::new(560, 310));
    ws.pointer_released(Point::new(600, 310)).unwrap();

    assert!(!ws.is_dragging_divider());
    assert_eq!(ws.tree().rect(left).unwrap().width, 596);
    assert_eq!(ws.tree().rect(right), Some(Rect::new(604, 0, 396, 600)));
    let b = ws.host().view(view_of(&ws, "/b.png")).unwrap();
    assert_eq!(b.rect, Rect::new(604, 30, 396, 570));

    assert!(ws.is_scheduled(Task::Persist));
    ws.tick(Duration::from_millis(2500));
    ws.run_pending();
    assert!(!ws.is_scheduled(Task::Persist));
    let json = ws
        .host()
        .read_setting(SETTINGS_GROUP, RESTORE_LAYOUT_KEY)
        .unwrap();
    let layout = SavedLayout::from_json(&json).unwrap();
    let sizes: Vec<i32> = layout
        .layout
        .unwrap()
        .leaves()
        .into_iter()
        .map(|leaf| leaf.split_size)
        .collect();
    assert_eq!(sizes, vec![596, 396]);
}

#[test]
fn test_divider_drag_stops_at_minimum_size() {
    let mut ws = workspace(&["/a.png", "/b.png"]);
    let root = ws.tree().root();
    let (left, _) = ws
        .split(root, Orientation::Vertical, false, Some(TabSource::tab(root, 1)))
        .unwrap();

    ws.press_divider(Point::new(500, 300)).unwrap();
    ws.pointer_released(Point::new(5, 300)).unwrap();
    assert_eq!(ws.tree().rect(left).unwrap().width, 80);
}
