//! Layout files and settings persistence across workspaces

use std::path::Path;
use std::time::Duration;

use splitpane_core::host::{DocumentHost, MemoryHost, SettingsStore};
use splitpane_core::split::{
    Orientation, PaneId, Point, RESTORE_LAYOUT_KEY, RESTORE_LAYOUT_PATH_KEY, Rect, SETTINGS_GROUP,
    SavedLayout, SplitWorkspace, TabSource, UNSAVED_DOCUMENTS_PROMPT,
};
use splitpane_core::{EngineConfig, LayoutError};

const CONTAINER: Rect = Rect::new(0, 0, 1000, 600);
const FILES: [&str; 3] = ["/a.png", "/b.png", "/c.png"];

fn persisting_config() -> EngineConfig {
    let mut config = EngineConfig::default();
    config.persistence.restore_layout = true;
    config
}

fn workspace_with_open_files(config: EngineConfig) -> SplitWorkspace<MemoryHost> {
    let mut host = MemoryHost::with_files(FILES);
    for file in FILES {
        host.open_file(Path::new(file));
    }
    let mut ws = SplitWorkspace::new(host, config);
    ws.on_window_shown(CONTAINER);
    ws
}

fn empty_workspace(config: EngineConfig) -> SplitWorkspace<MemoryHost> {
    let mut ws = SplitWorkspace::new(MemoryHost::with_files(FILES), config);
    ws.on_window_shown(CONTAINER);
    ws
}

/// Left pane with a and c, right pane with b, divider moved to x = 300.
fn arrange(ws: &mut SplitWorkspace<MemoryHost>) -> (PaneId, PaneId) {
    let root = ws.tree().root();
    let panes = ws
        .split(root, Orientation::Vertical, false, Some(TabSource::tab(root, 1)))
        .unwrap();
    ws.press_divider(Point::new(500, 300)).unwrap();
    ws.pointer_released(Point::new(304, 300)).unwrap();
    panes
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

#[test]
fn test_saved_file_restores_in_another_workspace() {
    let dir = tempfile::tempdir().unwrap();
    let mut source = workspace_with_open_files(EngineConfig::default());
    let (left, _) = arrange(&mut source);
    assert_eq!(source.tree().rect(left).unwrap().width, 300);
    let path = source.save_layout_as(&dir.path().join("desk")).unwrap();

    let mut target = empty_workspace(EngineConfig::default());
    target.load_layout(&path).unwrap();
    target.run_pending();

    let root = target.tree().root();
    let (first, second) = target.tree().children(root).unwrap();
    assert_eq!(files_in(&target, first), vec!["/a.png", "/c.png"]);
    assert_eq!(files_in(&target, second), vec!["/b.png"]);
    assert_eq!(target.tree().rect(first).unwrap().width, 300);
    assert_eq!(target.layout_path(), Some(path.as_path()));
    assert_eq!(target.host().views().len(), 3);
}

#[test]
fn test_saved_file_is_pretty_json_with_window_size() {
    let dir = tempfile::tempdir().unwrap();
    let mut ws = workspace_with_open_files(EngineConfig::default());
    arrange(&mut ws);
    let path = ws.save_layout_as(&dir.path().join("desk.json")).unwrap();
    assert_eq!(path, dir.path().join("desk.json"));

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains('\n'));
    let layout = SavedLayout::read(&path).unwrap();
    assert_eq!((layout.win_width, layout.win_height), (1000, 600));
    assert!(!layout.locked);
    assert_eq!(layout.path.as_deref(), Some(path.as_path()));
}

#[test]
fn test_declined_save_with_unsaved_document_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut ws = workspace_with_open_files(EngineConfig::default());
    arrange(&mut ws);
    let (_, view) = ws.host_mut().new_document("Untitled");
    ws.on_view_opened(view);
    ws.host_mut().set_confirm_answer(false);

    let result = ws.save_layout_as(&dir.path().join("layout"));
    assert!(matches!(result, Err(LayoutError::Declined)));
    assert_eq!(ws.host().prompts(), &[UNSAVED_DOCUMENTS_PROMPT.to_string()]);
    assert!(!dir.path().join("layout.json").exists());
    assert!(ws.layout_path().is_none());
}

#[test]
fn test_save_with_file_missing_from_disk_asks_first() {
    let dir = tempfile::tempdir().unwrap();
    let mut ws = workspace_with_open_files(EngineConfig::default());
    ws.host_mut().remove_file(Path::new("/c.png"));

    let path = ws.save_layout_as(&dir.path().join("layout")).unwrap();
    assert_eq!(ws.host().prompts(), &[UNSAVED_DOCUMENTS_PROMPT.to_string()]);
    let layout = SavedLayout::read(&path).unwrap();
    assert_eq!(layout.files(|_| true).existing, vec!["/a.png", "/b.png"]);
}

#[test]
fn test_locked_layout_restores_locked() {
    let dir = tempfile::tempdir().unwrap();
    let mut source = workspace_with_open_files(EngineConfig::default());
    arrange(&mut source);
    source.lock();
    let path = source.save_layout_as(&dir.path().join("locked")).unwrap();

    let mut target = empty_workspace(EngineConfig::default());
    target.load_layout(&path).unwrap();
    assert!(!target.is_locked());
    target.run_pending();
    assert!(target.is_locked());

    let pane = target.tree().first_most(target.tree().root());
    assert!(target.close_pane(pane).is_err());
    assert_eq!(target.tree().leaf_count(), 2);
}

#[test]
fn test_missing_layout_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let mut ws = workspace_with_open_files(EngineConfig::default());
    let result = ws.load_layout(&dir.path().join("absent.json"));
    assert!(matches!(result, Err(LayoutError::Io { .. })));
    assert_eq!(ws.host().warnings().len(), 1);
    assert_eq!(ws.tree().tab_count(), 3);
}

#[test]
fn test_persist_writes_layout_and_path_settings() {
    let dir = tempfile::tempdir().unwrap();
    let mut ws = workspace_with_open_files(persisting_config());
    arrange(&mut ws);
    let path = ws.save_layout_as(&dir.path().join("desk")).unwrap();

    ws.tick(Duration::from_secs(5));
    let host = ws.host();
    let stored_path = host
        .read_setting(SETTINGS_GROUP, RESTORE_LAYOUT_PATH_KEY)
        .unwrap();
    assert_eq!(Path::new(&stored_path), path.as_path());
    let json = host.read_setting(SETTINGS_GROUP, RESTORE_LAYOUT_KEY).unwrap();
    let layout = SavedLayout::from_json(&json).unwrap();
    assert_eq!(layout.files(|_| true).existing, vec!["/a.png", "/c.png", "/b.png"]);
}

#[test]
fn test_startup_restore_round_trip_through_settings() {
    let dir = tempfile::tempdir().unwrap();
    let mut source = workspace_with_open_files(persisting_config());
    arrange(&mut source);
    let path = source.save_layout_as(&dir.path().join("desk")).unwrap();
    source.persist_now().unwrap();
    let json = source
        .host()
        .read_setting(SETTINGS_GROUP, RESTORE_LAYOUT_KEY)
        .unwrap();

    let mut host = MemoryHost::with_files(FILES);
    host.add_file(path.clone());
    host.write_setting(SETTINGS_GROUP, RESTORE_LAYOUT_KEY, &json)
        .unwrap();
    host.write_setting(
        SETTINGS_GROUP,
        RESTORE_LAYOUT_PATH_KEY,
        &path.to_string_lossy(),
    )
    .unwrap();
    let mut ws = SplitWorkspace::new(host, persisting_config());
    ws.on_window_shown(CONTAINER);
    ws.run_pending();

    assert!(ws.tree().is_split());
    assert_eq!(ws.tree().tab_count(), 3);
    assert_eq!(ws.layout_path(), Some(path.as_path()));
    assert!(ws.host().prompts().is_empty());
    assert_eq!(ws.last_restore().unwrap().restored.len(), 3);
}

#[test]
fn test_startup_restore_off_leaves_workspace_alone() {
    let mut source = workspace_with_open_files(EngineConfig::default());
    arrange(&mut source);
    let json = source.capture_layout().to_json().unwrap();

    let mut host = MemoryHost::with_files(FILES);
    host.write_setting(SETTINGS_GROUP, RESTORE_LAYOUT_KEY, &json)
        .unwrap();
    let mut ws = SplitWorkspace::new(host, EngineConfig::default());
    ws.on_window_shown(CONTAINER);
    assert!(!ws.startup_restore().unwrap());
    ws.run_pending();
    assert!(!ws.tree().is_split());
    assert!(ws.host().opened().is_empty());
}
