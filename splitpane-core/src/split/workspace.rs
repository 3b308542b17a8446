//! Workspace controller
//!
//! [`SplitWorkspace`] owns the pane tree and everything around it: the
//! engine configuration, the lock flag, the per-view side table, the timer
//! queue, drags in progress and a running restore. The host forwards its
//! window events and pointer input here and drives the timers through
//! [`SplitWorkspace::tick`].
//!
//! Mutations run under a single sync flag. A request arriving while another
//! mutation or a restore is in progress is dropped with [`SplitError::Busy`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::{EngineConfig, ScalingMode};
use crate::error::{CommandError, LayoutError, LayoutResult};
use crate::host::Host;
use crate::tracing::span_names;

use super::commands::{Command, MenuEntry, TabSource, context_menu};
use super::drag::{
    DividerDrag, DragButton, DragMotion, DragPreview, DropAction, DropRules, TabDrag,
};
use super::error::{RemoveResult, SplitError};
use super::geometry::{LayoutMetrics, ResizeReport};
use super::layout::{SavedLayout, with_json_extension};
use super::restore::{RestoreJob, RestoreOptions, RestorePhase, RestoreReport};
use super::scheduler::{Scheduler, Task};
use super::tabs::{TabEntry, TabSelection, TabStrip};
use super::tree::{HitZone, PaneTree};
use super::types::{DocumentId, Edge, Orientation, PaneId, Point, Rect, ViewId};
use super::viewport::{self, ViewportSnapshot};

/// Settings group holding the persisted layout.
pub const SETTINGS_GROUP: &str = "splitpane";

/// Key of the JSON layout written after every layout change.
pub const RESTORE_LAYOUT_KEY: &str = "restoreLayout";

/// Key of the layout file path in use.
pub const RESTORE_LAYOUT_PATH_KEY: &str = "restoreLayoutPath";

/// Value stored under [`RESTORE_LAYOUT_KEY`] when auto-restore is off.
pub const RESTORE_DISABLED: &str = "false";

/// Title of every prompt and warning.
pub const PROMPT_TITLE: &str = "Split Panes";

/// Asked before a restore replaces a layout holding unsaved documents.
pub const UNSAVED_CHANGES_PROMPT: &str = "You have unsaved changes. If you continue the files will be kept open in your new layout.\n\nDo you wish to continue?";

/// Asked before saving a layout while some documents have no file on disk.
pub const UNSAVED_DOCUMENTS_PROMPT: &str = "Some documents are not saved to disk. These will not be included.\n\nDo you wish to continue?";

/// Heading of the warning shown when no file of a layout exists.
pub const NOTHING_TO_RESTORE_WARNING: &str = "Unable to restore session.\nThese files are missing:";

/// Heading of the warning listing files a restore could not open.
pub const MISSING_FILES_WARNING: &str = "These files could not be opened:";

/// Shown when a layout file cannot be written.
pub const SAVE_FAILED_WARNING: &str = "The operation was aborted.";

/// Shown when a layout file cannot be read.
pub const OPEN_FAILED_WARNING: &str = "The operation was aborted. The file could not be opened.";

/// Quiet period after the last container resize before snapshots are dropped.
pub const RESIZE_SETTLE: Duration = Duration::from_millis(250);

const MAX_PENDING_STEPS: usize = 64;

/// Engine-owned record for one host view.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewMeta {
    /// Scaling mode chosen for this view, if any
    pub scaling_mode: Option<ScalingMode>,
    /// Canvas state captured when the current resize began
    pub snapshot: Option<ViewportSnapshot>,
}

/// The split-pane workspace of one host window.
#[derive(Debug)]
pub struct SplitWorkspace<H: Host> {
    host: H,
    config: EngineConfig,
    metrics: LayoutMetrics,
    tree: PaneTree,
    active_pane: PaneId,
    locked: bool,
    syncing: bool,
    attached: bool,
    startup_checked: bool,
    layout_path: Option<PathBuf>,
    views: HashMap<ViewId, ViewMeta>,
    scheduler: Scheduler<Task>,
    now: Duration,
    tab_drag: Option<TabDrag>,
    divider_drag: Option<DividerDrag>,
    restore: Option<RestoreJob>,
    last_restore: Option<RestoreReport>,
}

impl<H: Host> SplitWorkspace<H> {
    /// Creates a detached workspace with a single empty pane.
    ///
    /// Nothing is placed until [`on_window_shown`](Self::on_window_shown).
    #[must_use]
    pub fn new(host: H, config: EngineConfig) -> Self {
        let config = config.sanitized();
        let metrics = LayoutMetrics::from(&config);
        let tree = PaneTree::new(config.layout.divider_thickness);
        Self {
            host,
            metrics,
            active_pane: tree.root(),
            tree,
            config,
            locked: false,
            syncing: false,
            attached: false,
            startup_checked: false,
            layout_path: None,
            views: HashMap::new(),
            scheduler: Scheduler::new(),
            now: Duration::ZERO,
            tab_drag: None,
            divider_drag: None,
            restore: None,
            last_restore: None,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The host collaborator.
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host collaborator.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Active configuration.
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Replaces the configuration and relays out the tree.
    pub fn set_config(&mut self, config: EngineConfig) {
        self.config = config.sanitized();
        self.metrics = LayoutMetrics::from(&self.config);
        self.tree
            .set_divider_thickness(self.config.layout.divider_thickness);
        self.refresh_tabs(None);
        if self.attached {
            self.relayout(true);
        }
        tracing::debug!("Engine configuration replaced");
    }

    /// The pane tree.
    pub const fn tree(&self) -> &PaneTree {
        &self.tree
    }

    /// Pane that receives new views and keyboard tab commands.
    pub const fn active_pane(&self) -> PaneId {
        self.active_pane
    }

    /// Returns true while structural changes are refused.
    pub const fn is_locked(&self) -> bool {
        self.locked
    }

    /// Returns true between window-shown and window-destroyed.
    pub const fn is_attached(&self) -> bool {
        self.attached
    }

    /// Layout file last saved to or loaded from.
    pub fn layout_path(&self) -> Option<&Path> {
        self.layout_path.as_deref()
    }

    /// Phase of the running restore, if any.
    pub fn restore_phase(&self) -> Option<RestorePhase> {
        self.restore.as_ref().map(RestoreJob::phase)
    }

    /// Report of the last finished restore.
    pub const fn last_restore(&self) -> Option<&RestoreReport> {
        self.last_restore.as_ref()
    }

    /// Side-table record of `view`.
    pub fn view_meta(&self, view: ViewId) -> Option<&ViewMeta> {
        self.views.get(&view)
    }

    /// Tab drag in progress.
    pub const fn tab_drag(&self) -> Option<&TabDrag> {
        self.tab_drag.as_ref()
    }

    /// Returns true while a divider is being dragged.
    pub const fn is_dragging_divider(&self) -> bool {
        self.divider_drag.is_some()
    }

    /// Overlays of the active tab drag.
    pub fn drag_preview(&self) -> Option<DragPreview> {
        self.tab_drag
            .as_ref()
            .filter(|drag| drag.is_active())
            .map(|drag| drag.preview(&self.tree))
    }

    /// Host clock time of the last tick.
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Earliest pending timer deadline.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.scheduler.next_due()
    }

    /// Returns true if `task` is pending.
    pub fn is_scheduled(&self, task: Task) -> bool {
        self.scheduler.is_scheduled(task)
    }

    /// Scaling mode applied to `view` on resize.
    pub fn scaling_mode(&self, view: ViewId) -> ScalingMode {
        let default = self.config.resize.default_scaling_mode;
        if !self.config.resize.scaling_mode_per_view {
            return default;
        }
        self.views
            .get(&view)
            .and_then(|meta| meta.scaling_mode)
            .unwrap_or(default)
    }

    /// Chooses the scaling mode of `view`.
    pub fn set_view_scaling_mode(&mut self, view: ViewId, mode: ScalingMode) {
        self.views.entry(view).or_default().scaling_mode = Some(mode);
    }

    /// Context menu of `pane`, opened on tab `tab` if set.
    pub fn context_menu(&self, pane: PaneId, tab: Option<usize>) -> Vec<MenuEntry> {
        context_menu(
            &self.tree,
            pane,
            tab,
            self.locked,
            self.layout_path.as_deref(),
        )
    }

    // ========================================================================
    // Host events
    // ========================================================================

    /// Attaches the workspace to a shown window of size `container`.
    ///
    /// Open views not yet in a pane are added to the active pane. The first
    /// time the window is shown the persisted layout is restored when
    /// auto-restore is enabled.
    pub fn on_window_shown(&mut self, container: Rect) {
        self.attached = true;
        self.adopt_views();
        let report = self.tree.layout(container, self.metrics, true);
        self.apply(&report);
        if !self.startup_checked {
            self.startup_checked = true;
            if let Err(e) = self.startup_restore() {
                tracing::warn!(error = %e, "Startup restore failed");
            }
        }
    }

    /// Relays out the tree after the host container changed size.
    ///
    /// Viewports are re-anchored against snapshots taken at the first resize
    /// event; the snapshots are dropped after a quiet period.
    pub fn on_container_resized(&mut self, container: Rect) {
        if !self.attached {
            return;
        }
        let root = self.tree.root();
        self.take_snapshots(root);
        let report = self.tree.layout(container, self.metrics, false);
        self.apply(&report);
        self.scheduler
            .schedule(Task::ResizeSettle, self.now, RESIZE_SETTLE);
    }

    /// A view was opened by the host.
    pub fn on_view_opened(&mut self, view: ViewId) {
        if !self.attached || self.tree.find_view(view).is_some() {
            return;
        }
        if let Some((pane, _)) = self.bind_view(view, true) {
            self.active_pane = pane;
            self.place_pane(pane);
            self.schedule_persist();
        }
    }

    /// A view got the focus in the host.
    pub fn on_view_activated(&mut self, view: ViewId) {
        if !self.attached {
            return;
        }
        let Some((pane, index)) = self.tree.find_view(view) else {
            self.on_view_opened(view);
            return;
        };
        if let Some(strip) = self.tree.tabs_mut(pane) {
            strip.set_current(index);
        }
        self.active_pane = pane;
        self.place_pane(pane);
    }

    /// A view was closed by the host.
    ///
    /// Its tab is removed; a pane left empty is removed too unless it is the
    /// root or the layout is locked.
    pub fn on_view_closed(&mut self, view: ViewId) {
        self.views.remove(&view);
        let Some((pane, index)) = self.tree.find_view(view) else {
            return;
        };
        if let Some(strip) = self.tree.tabs_mut(pane) {
            strip.remove(index);
        }
        if self.attached {
            self.drop_if_empty(pane);
            self.schedule_persist();
        }
    }

    /// A document was saved, renamed or modified.
    pub fn on_document_changed(&mut self, document: DocumentId) {
        if self.refresh_tabs(Some(document)) {
            self.schedule_persist();
        }
    }

    /// Detaches the workspace. Drags, timers and a running restore are
    /// abandoned.
    pub fn on_window_destroyed(&mut self) {
        self.attached = false;
        self.tab_drag = None;
        self.divider_drag = None;
        if let Some(job) = self.restore.take() {
            tracing::debug!(phase = %job.phase(), "Restore abandoned, window destroyed");
        }
        self.scheduler.clear();
        self.clear_snapshots();
    }

    // ========================================================================
    // Timers
    // ========================================================================

    /// Advances the host clock to `now` and runs every due timer.
    pub fn tick(&mut self, now: Duration) {
        self.now = self.now.max(now);
        for task in self.scheduler.take_due(self.now) {
            self.run_task(task);
        }
    }

    /// Runs pending timers in deadline order, advancing the clock to each.
    pub fn run_pending(&mut self) {
        for _ in 0..MAX_PENDING_STEPS {
            let Some(deadline) = self.scheduler.next_due() else {
                break;
            };
            self.tick(deadline);
        }
    }

    fn run_task(&mut self, task: Task) {
        tracing::trace!(%task, "Timer fired");
        match task {
            Task::Persist => {
                if self.restore.is_none() {
                    if let Err(e) = self.persist_now() {
                        tracing::warn!(error = %e, "Failed to persist layout");
                    }
                }
            }
            Task::DragPoll => self.poll_tab_drag(),
            Task::DividerPoll => self.poll_divider_drag(),
            Task::Restore => self.step_restore(),
            Task::ResizeSettle => {
                if self.divider_drag.is_none() {
                    self.clear_snapshots();
                }
            }
        }
    }

    // ========================================================================
    // Tree mutations
    // ========================================================================

    /// Splits leaf `leaf`.
    ///
    /// The leaf's tabs go to the first child, or to the second when
    /// `swap_sides` is set. The other child receives `source`. Returns the
    /// two children.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout is locked, `leaf` is not a live leaf,
    /// or the source tabs cannot be taken.
    pub fn split(
        &mut self,
        leaf: PaneId,
        orientation: Orientation,
        swap_sides: bool,
        source: Option<TabSource>,
    ) -> Result<(PaneId, PaneId), SplitError> {
        self.sync(|ws| ws.split_inner(leaf, orientation, swap_sides, source))
    }

    fn split_inner(
        &mut self,
        leaf: PaneId,
        orientation: Orientation,
        swap_sides: bool,
        source: Option<TabSource>,
    ) -> Result<(PaneId, PaneId), SplitError> {
        self.ensure_unlocked()?;
        self.leaf_strip(leaf)?;
        if let Some(source) = source {
            if source.pane == leaf && source.empties_source(&self.tree) {
                return Err(SplitError::NoOpDrop);
            }
        }
        let moved = source.map(|source| self.take_tabs(source)).transpose()?;
        let (first, second) = self.tree.split_leaf(leaf, orientation, swap_sides)?;
        let receiving = if swap_sides { first } else { second };
        tracing::debug!(%leaf, %orientation, swap_sides, "Pane split");
        self.land(source, moved, receiving);
        Ok((first, second))
    }

    /// Inserts a new pane between the children of `branch`.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout is locked, `branch` is not a live
    /// branch, or the source tabs cannot be taken.
    pub fn split_between_siblings(
        &mut self,
        branch: PaneId,
        source: Option<TabSource>,
    ) -> Result<PaneId, SplitError> {
        self.sync(|ws| {
            ws.ensure_unlocked()?;
            if !ws.tree.contains(branch) {
                return Err(SplitError::PaneNotFound(branch));
            }
            if ws.tree.is_leaf(branch) {
                return Err(SplitError::NotABranch(branch));
            }
            let moved = source.map(|source| ws.take_tabs(source)).transpose()?;
            let fresh = ws.tree.split_between(branch)?;
            tracing::debug!(%branch, "Pane inserted between siblings");
            Ok(ws.land(source, moved, fresh))
        })
    }

    /// Wraps the whole layout and adds a pane along a workspace edge.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout is locked or the source tabs cannot
    /// be taken.
    pub fn split_at_workspace_edge(
        &mut self,
        edge: Edge,
        source: Option<TabSource>,
    ) -> Result<PaneId, SplitError> {
        self.sync(|ws| {
            ws.ensure_unlocked()?;
            let moved = source.map(|source| ws.take_tabs(source)).transpose()?;
            let fresh = ws
                .tree
                .wrap_root(edge, ws.config.layout.edge_split_fraction);
            tracing::debug!(%edge, "Pane added at workspace edge");
            Ok(ws.land(source, moved, fresh))
        })
    }

    /// Moves (or copies) tabs into leaf `target`. Allowed while locked.
    ///
    /// # Errors
    ///
    /// Returns an error if `target` is not a live leaf, the transfer would
    /// change nothing, or the source tabs cannot be taken.
    pub fn transfer_tabs(
        &mut self,
        source: TabSource,
        target: PaneId,
    ) -> Result<PaneId, SplitError> {
        self.sync(|ws| {
            ws.leaf_strip(target)?;
            if target == source.pane && !source.duplicate {
                return Err(SplitError::NoOpDrop);
            }
            let moved = ws.take_tabs(source)?;
            tracing::debug!(from = %source.pane, to = %target, "Tabs transferred");
            Ok(ws.land(Some(source), Some(moved), target))
        })
    }

    /// Closes leaf `leaf` and every view in it, then simplifies the tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout is locked, `leaf` is not a live leaf,
    /// or the user kept a view open.
    pub fn close_pane(&mut self, leaf: PaneId) -> Result<(), SplitError> {
        self.sync(|ws| {
            ws.ensure_unlocked()?;
            let views = ws.leaf_strip(leaf)?.views();
            let closed = ws.close_views(leaf, &views);
            if closed < views.len() {
                ws.place_pane(leaf);
                ws.schedule_persist();
                return Err(SplitError::CloseDeclined(leaf));
            }
            let results = ws.tree.prune(leaf)?;
            ws.remap(&results);
            ws.relayout(true);
            ws.activate_current(ws.active_pane);
            ws.schedule_persist();
            tracing::debug!(%leaf, "Pane closed");
            Ok(())
        })
    }

    /// Closes the tab at `index`. Returns false if the host kept it open.
    ///
    /// # Errors
    ///
    /// Returns an error if `pane` is not a live leaf or `index` is out of
    /// range.
    pub fn close_tab(&mut self, pane: PaneId, index: usize) -> Result<bool, SplitError> {
        self.sync(|ws| {
            let view = ws.tab(pane, index)?.view;
            if ws.close_views(pane, &[view]) == 0 {
                return Ok(false);
            }
            ws.drop_if_empty(pane);
            ws.schedule_persist();
            Ok(true)
        })
    }

    /// Closes every tab right of `index`. Returns the number closed.
    ///
    /// # Errors
    ///
    /// Returns an error if `pane` is not a live leaf or `index` is out of
    /// range.
    pub fn close_tabs_right(&mut self, pane: PaneId, index: usize) -> Result<usize, SplitError> {
        self.close_range(pane, index, TabStrip::views_right_of)
    }

    /// Closes every tab left of `index`. Returns the number closed.
    ///
    /// # Errors
    ///
    /// Returns an error if `pane` is not a live leaf or `index` is out of
    /// range.
    pub fn close_tabs_left(&mut self, pane: PaneId, index: usize) -> Result<usize, SplitError> {
        self.close_range(pane, index, TabStrip::views_left_of)
    }

    /// Closes every tab except `index`. Returns the number closed.
    ///
    /// # Errors
    ///
    /// Returns an error if `pane` is not a live leaf or `index` is out of
    /// range.
    pub fn close_other_tabs(&mut self, pane: PaneId, index: usize) -> Result<usize, SplitError> {
        self.close_range(pane, index, TabStrip::views_except)
    }

    fn close_range(
        &mut self,
        pane: PaneId,
        index: usize,
        select: fn(&TabStrip, usize) -> Vec<ViewId>,
    ) -> Result<usize, SplitError> {
        self.sync(|ws| {
            ws.tab(pane, index)?;
            let views = select(ws.leaf_strip(pane)?, index);
            let closed = ws.close_views(pane, &views);
            ws.place_pane(pane);
            if closed > 0 {
                ws.schedule_persist();
            }
            Ok(closed)
        })
    }

    /// Opens another view of a tab's document right after it.
    ///
    /// # Errors
    ///
    /// Returns an error if the tab does not exist or the host cannot create
    /// the view.
    pub fn duplicate_tab(&mut self, pane: PaneId, index: usize) -> Result<ViewId, SplitError> {
        self.sync(|ws| {
            let original = ws.tab(pane, index)?;
            let (document, old_view) = (original.document, original.view);
            let view = ws
                .host
                .add_view(document)
                .ok_or(SplitError::ViewNotFound(old_view))?;
            let entry = ws
                .host
                .tab_entry(view, &ws.config.tabs)
                .ok_or(SplitError::ViewNotFound(view))?;
            ws.views.entry(view).or_default();
            if let Some(strip) = ws.tree.tabs_mut(pane) {
                strip.insert(index + 1, entry, true);
            }
            ws.active_pane = pane;
            ws.place_pane(pane);
            ws.schedule_persist();
            Ok(view)
        })
    }

    /// Activates the tab at `index` of `pane`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tab does not exist.
    pub fn select_tab(&mut self, pane: PaneId, index: usize) -> Result<(), SplitError> {
        self.sync(|ws| {
            ws.tab(pane, index)?;
            if let Some(strip) = ws.tree.tabs_mut(pane) {
                strip.set_current(index);
            }
            ws.focus(pane);
            Ok(())
        })
    }

    /// Moves a tab within its strip.
    ///
    /// # Errors
    ///
    /// Returns an error if either index is out of range.
    pub fn reorder_tab(&mut self, pane: PaneId, from: usize, to: usize) -> Result<(), SplitError> {
        self.sync(|ws| {
            let moved = ws
                .tree
                .tabs_mut(pane)
                .ok_or(SplitError::NotALeaf(pane))?
                .move_tab(from, to);
            if !moved {
                return Err(SplitError::TabOutOfRange {
                    pane,
                    index: from.max(to),
                });
            }
            ws.schedule_persist();
            Ok(())
        })
    }

    /// Feeds a wheel delta over the tab strip of `pane`.
    ///
    /// # Errors
    ///
    /// Returns an error if `pane` is not a live leaf.
    pub fn wheel_tabs(&mut self, pane: PaneId, delta: i32) -> Result<Option<usize>, SplitError> {
        self.sync(|ws| {
            ws.leaf_strip(pane)?;
            let changed = ws.tree.tabs_mut(pane).and_then(|strip| strip.wheel(delta));
            if changed.is_some() {
                ws.focus(pane);
            }
            Ok(changed)
        })
    }

    /// Activates the next tab of the active pane, wrapping around.
    ///
    /// # Errors
    ///
    /// Returns an error if another update is in progress.
    pub fn next_tab(&mut self) -> Result<Option<usize>, SplitError> {
        self.step_tab(TabStrip::select_next)
    }

    /// Activates the previous tab of the active pane, wrapping around.
    ///
    /// # Errors
    ///
    /// Returns an error if another update is in progress.
    pub fn previous_tab(&mut self) -> Result<Option<usize>, SplitError> {
        self.step_tab(TabStrip::select_prev)
    }

    fn step_tab(
        &mut self,
        step: fn(&mut TabStrip) -> Option<usize>,
    ) -> Result<Option<usize>, SplitError> {
        self.sync(|ws| {
            let pane = ws.target_leaf();
            let index = ws.tree.tabs_mut(pane).and_then(step);
            if index.is_some() {
                ws.focus(pane);
            }
            Ok(index)
        })
    }

    /// Gathers every tab into a single pane.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout is locked.
    pub fn reset_layout(&mut self) -> Result<(), SplitError> {
        self.sync(|ws| {
            ws.ensure_unlocked()?;
            let root = ws.tree.collapse_all();
            ws.active_pane = root;
            ws.relayout(true);
            ws.activate_current(root);
            ws.schedule_persist();
            tracing::info!("Layout reset");
            Ok(())
        })
    }

    /// Centres every divider.
    ///
    /// # Errors
    ///
    /// Returns an error if another update is in progress.
    pub fn reset_sizes(&mut self) -> Result<(), SplitError> {
        let root = self.tree.root();
        self.equalize(root, true)
    }

    /// Centres the divider of `pane`, and of its subtree when `recursive`.
    ///
    /// # Errors
    ///
    /// Returns an error if `pane` is not a live node.
    pub fn equalize(&mut self, pane: PaneId, recursive: bool) -> Result<(), SplitError> {
        self.sync(|ws| {
            ws.tree.equalize(pane, recursive)?;
            let report = ws.tree.resize(pane, ws.metrics, true);
            ws.apply(&report);
            ws.schedule_persist();
            Ok(())
        })
    }

    /// Removes every empty pane except the root. Returns the number removed.
    ///
    /// # Errors
    ///
    /// Returns an error if another update is in progress.
    pub fn close_empties(&mut self) -> Result<usize, SplitError> {
        self.sync(|ws| {
            let results = ws.tree.close_empties();
            if !results.is_empty() {
                ws.remap(&results);
                ws.relayout(true);
                ws.schedule_persist();
            }
            Ok(results.len())
        })
    }

    // ========================================================================
    // Lock
    // ========================================================================

    /// Locks the layout against structural changes.
    pub fn lock(&mut self) {
        self.set_locked(true, true);
    }

    /// Unlocks the layout.
    pub fn unlock(&mut self) {
        self.set_locked(false, true);
    }

    /// Flips the lock. Returns the new state.
    pub fn toggle_lock(&mut self) -> bool {
        let locked = !self.locked;
        self.set_locked(locked, true);
        locked
    }

    fn set_locked(&mut self, locked: bool, notify: bool) {
        self.locked = locked;
        tracing::info!(locked, "Layout lock changed");
        if notify {
            self.host.notify(if locked {
                "Layout locked"
            } else {
                "Layout unlocked"
            });
            self.schedule_persist();
        }
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Runs a host command.
    ///
    /// # Errors
    ///
    /// Returns the failure of the underlying operation.
    pub fn execute(&mut self, command: Command) -> Result<(), CommandError> {
        tracing::debug!(?command, "Executing command");
        match command {
            Command::NextTab => {
                self.next_tab()?;
            }
            Command::PreviousTab => {
                self.previous_tab()?;
            }
            Command::DuplicateTab { pane, index } => {
                self.duplicate_tab(pane, index)?;
            }
            Command::SplitMove { pane, index, side } => {
                let source = TabSource::tab(pane, index);
                self.split(pane, side.orientation(), side.is_leading(), Some(source))?;
            }
            Command::SplitDuplicate { pane, index, side } => {
                let source = TabSource::tab(pane, index).duplicated();
                self.split(pane, side.orientation(), side.is_leading(), Some(source))?;
            }
            Command::CloseTabsRight { pane, index } => {
                self.close_tabs_right(pane, index)?;
            }
            Command::CloseTabsLeft { pane, index } => {
                self.close_tabs_left(pane, index)?;
            }
            Command::CloseOtherTabs { pane, index } => {
                self.close_other_tabs(pane, index)?;
            }
            Command::ClosePane(pane) => self.close_pane(pane)?,
            Command::ResetLayout => self.reset_layout()?,
            Command::ResetSizes => self.reset_sizes()?,
            Command::SaveLayoutAs(path) => {
                self.save_layout_as(&path)?;
            }
            Command::SaveCurrentLayout => {
                self.save_current_layout()?;
            }
            Command::LoadLayout(path) => self.load_layout(&path)?,
            Command::ToggleLock => {
                self.toggle_lock();
            }
            Command::Lock => self.lock(),
            Command::Unlock => self.unlock(),
        }
        Ok(())
    }

    // ========================================================================
    // Pointer input
    // ========================================================================

    /// Starts a tab drag of `selection` in `pane`.
    ///
    /// Returns false when a drag is already running or `button` drags are
    /// disabled.
    pub fn press_tab(
        &mut self,
        pane: PaneId,
        selection: TabSelection,
        button: DragButton,
        point: Point,
    ) -> bool {
        if !self.attached
            || self.tab_drag.is_some()
            || self.divider_drag.is_some()
            || !self.tree.is_leaf(pane)
        {
            return false;
        }
        let Some(drag) = TabDrag::press(pane, selection, button, point, &self.config.drag) else {
            return false;
        };
        let active = drag.is_active();
        self.tab_drag = Some(drag);
        if active {
            self.schedule_drag_poll();
        }
        true
    }

    /// Starts a divider drag if `point` is on a divider. Returns its branch.
    pub fn press_divider(&mut self, point: Point) -> Option<PaneId> {
        if !self.attached || self.tab_drag.is_some() || self.divider_drag.is_some() {
            return None;
        }
        let (branch, zone) = self.tree.split_at(point, self.metrics.tab_height)?;
        if zone != HitZone::Divider {
            return None;
        }
        let orientation = self.tree.orientation(branch)?;
        if let Some(data) = self.tree.branch_mut(branch) {
            data.divider.set_dragging(true);
        }
        self.take_snapshots(branch);
        self.divider_drag = Some(DividerDrag::new(branch, orientation, point));
        self.scheduler.schedule(
            Task::DividerPoll,
            self.now,
            self.config.drag.divider_poll_interval(),
        );
        tracing::debug!(%branch, "Divider drag started");
        Some(branch)
    }

    /// Feeds a pointer position to the drag in progress.
    pub fn pointer_moved(&mut self, point: Point) -> Option<DragMotion> {
        if let Some(drag) = self.divider_drag.as_mut() {
            drag.motion(point);
            return Some(DragMotion::Moved);
        }
        let drag = self.tab_drag.as_mut()?;
        let motion = drag.motion(point, &self.config.drag);
        match motion {
            DragMotion::Activated => self.schedule_drag_poll(),
            DragMotion::Reorder => {
                self.tab_drag = None;
                tracing::trace!("Tab drag handed back as a reorder");
            }
            DragMotion::Pending | DragMotion::Moved => {}
        }
        Some(motion)
    }

    /// Ends the drag in progress at `point` and commits its drop.
    ///
    /// Returns the committed action, or `None` when nothing was dropped.
    ///
    /// # Errors
    ///
    /// Returns the failure of the committed tree mutation.
    pub fn pointer_released(&mut self, point: Point) -> Result<Option<DropAction>, SplitError> {
        if let Some(mut drag) = self.divider_drag.take() {
            drag.motion(point);
            self.scheduler.cancel(Task::DividerPoll);
            self.apply_divider_delta(&mut drag);
            self.finish_divider_drag(drag.branch());
            return Ok(None);
        }
        let Some(mut drag) = self.tab_drag.take() else {
            return Ok(None);
        };
        self.scheduler.cancel(Task::DragPoll);
        if !drag.is_active() {
            return Ok(None);
        }
        drag.motion(point, &self.config.drag);
        if !self.tree.is_leaf(drag.source()) {
            tracing::debug!(source = %drag.source(), "Drag source vanished");
            return Ok(None);
        }
        let rules = DropRules::new(&self.config, self.locked);
        let Some(candidate) = drag.poll(&self.tree, &rules) else {
            return Ok(None);
        };
        let source = TabSource {
            pane: drag.source(),
            selection: drag.selection(),
            duplicate: false,
        };
        self.commit_drop(candidate.action, source)?;
        Ok(Some(candidate.action))
    }

    /// Abandons the drag in progress without changing the layout.
    pub fn cancel_drag(&mut self) {
        if self.tab_drag.take().is_some() {
            self.scheduler.cancel(Task::DragPoll);
            tracing::debug!("Tab drag cancelled");
        }
        if let Some(drag) = self.divider_drag.take() {
            self.scheduler.cancel(Task::DividerPoll);
            self.finish_divider_drag(drag.branch());
        }
    }

    fn commit_drop(&mut self, action: DropAction, source: TabSource) -> Result<(), SplitError> {
        let _span = tracing::debug_span!(span_names::DRAG_DROP, ?action).entered();
        match action {
            DropAction::EdgeSplit(edge) => self.split_at_workspace_edge(edge, Some(source)).map(|_| ()),
            DropAction::SplitBetween(branch) => self
                .split_between_siblings(branch, Some(source))
                .map(|_| ()),
            DropAction::Transfer(target) => self.transfer_tabs(source, target).map(|_| ()),
            DropAction::Split { target, side } => self
                .split(target, side.orientation(), side.is_leading(), Some(source))
                .map(|_| ()),
        }
    }

    fn schedule_drag_poll(&mut self) {
        self.scheduler
            .schedule(Task::DragPoll, self.now, self.config.drag.poll_interval());
    }

    fn poll_tab_drag(&mut self) {
        let rules = DropRules::new(&self.config, self.locked);
        let Some(drag) = self.tab_drag.as_mut() else {
            return;
        };
        if !self.tree.is_leaf(drag.source()) {
            tracing::debug!(source = %drag.source(), "Drag source vanished");
            self.tab_drag = None;
            return;
        }
        drag.poll(&self.tree, &rules);
        self.schedule_drag_poll();
    }

    fn poll_divider_drag(&mut self) {
        let Some(mut drag) = self.divider_drag.take() else {
            return;
        };
        self.apply_divider_delta(&mut drag);
        self.divider_drag = Some(drag);
        self.scheduler.schedule(
            Task::DividerPoll,
            self.now,
            self.config.drag.divider_poll_interval(),
        );
    }

    fn apply_divider_delta(&mut self, drag: &mut DividerDrag) {
        let delta = drag.take_delta();
        if delta == 0 {
            return;
        }
        let branch = drag.branch();
        let Some(data) = self.tree.branch_mut(branch) else {
            return;
        };
        data.divider.move_by(delta);
        let report = self.tree.resize(branch, self.metrics, false);
        self.apply(&report);
    }

    fn finish_divider_drag(&mut self, branch: PaneId) {
        if let Some(data) = self.tree.branch_mut(branch) {
            data.divider.set_dragging(false);
        }
        self.clear_snapshots();
        self.schedule_persist();
        tracing::debug!(%branch, "Divider drag finished");
    }

    // ========================================================================
    // Layout files
    // ========================================================================

    /// Captures the current tree as a layout.
    pub fn capture_layout(&self) -> SavedLayout {
        SavedLayout::capture(&self.tree, Some(self.active_pane), self.locked, |path| {
            self.host.file_exists(path)
        })
    }

    /// Writes the layout to `path` (`.json` appended when missing) and
    /// remembers the path. Returns the path written.
    ///
    /// # Errors
    ///
    /// Returns an error if the user declines saving while some documents
    /// have no file on disk, no tab has a saved file, or the write fails. A
    /// failed write is reported to the user.
    pub fn save_layout_as(&mut self, path: &Path) -> LayoutResult<PathBuf> {
        if self.has_documents_without_file()
            && !self.host.confirm(PROMPT_TITLE, UNSAVED_DOCUMENTS_PROMPT)
        {
            tracing::debug!("Layout save declined, documents without a file are open");
            return Err(LayoutError::Declined);
        }
        let layout = self.capture_layout();
        if layout.is_empty() {
            return Err(LayoutError::Empty);
        }
        let path = with_json_extension(path);
        let _span = tracing::info_span!(span_names::LAYOUT_SAVE, path = %path.display()).entered();
        if let Err(e) = layout.write(&path) {
            tracing::warn!(path = %path.display(), error = %e, "Failed to save layout");
            self.host.warn(PROMPT_TITLE, SAVE_FAILED_WARNING);
            return Err(e);
        }
        tracing::info!(path = %path.display(), "Layout saved");
        self.layout_path = Some(path.clone());
        self.schedule_persist();
        Ok(path)
    }

    /// Writes the layout to the remembered path.
    ///
    /// # Errors
    ///
    /// Returns an error if no path is remembered or the save fails.
    pub fn save_current_layout(&mut self) -> LayoutResult<PathBuf> {
        let path = self.layout_path.clone().ok_or(LayoutError::NoPath)?;
        let saved = self.save_layout_as(&path)?;
        self.host.notify("Layout saved");
        Ok(saved)
    }

    /// Reads a layout file and restores it.
    ///
    /// The file is parsed completely before the tree is touched.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or the restore
    /// does not start.
    pub fn load_layout(&mut self, path: &Path) -> LayoutResult<()> {
        let _span = tracing::info_span!(span_names::LAYOUT_LOAD, path = %path.display()).entered();
        let layout = match SavedLayout::read(path) {
            Ok(layout) => layout,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to open layout");
                self.host
                    .warn(PROMPT_TITLE, &format!("{OPEN_FAILED_WARNING}\nError:\n{e}"));
                return Err(e);
            }
        };
        self.restore_layout(layout, RestoreOptions::default())
    }

    /// Writes the current layout to the settings store.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the settings write fails.
    pub fn persist_now(&mut self) -> LayoutResult<()> {
        let _span = tracing::debug_span!(span_names::LAYOUT_PERSIST).entered();
        self.scheduler.cancel(Task::Persist);
        let value = if self.config.persistence.restore_layout {
            let layout = self.capture_layout();
            if layout.is_empty() {
                String::new()
            } else {
                layout.to_json()?
            }
        } else {
            RESTORE_DISABLED.to_string()
        };
        let path = self
            .layout_path
            .as_deref()
            .map(|path| path.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.host
            .write_setting(SETTINGS_GROUP, RESTORE_LAYOUT_KEY, &value)?;
        self.host
            .write_setting(SETTINGS_GROUP, RESTORE_LAYOUT_PATH_KEY, &path)?;
        tracing::debug!(bytes = value.len(), "Layout persisted");
        Ok(())
    }

    fn schedule_persist(&mut self) {
        if !self.attached || self.restore.is_some() {
            return;
        }
        let delay = self.config.persistence.save_debounce();
        if self.scheduler.debounce(Task::Persist, self.now, delay) {
            tracing::trace!("Layout save scheduled");
        }
    }

    // ========================================================================
    // Restore
    // ========================================================================

    /// Restores the layout persisted in the settings store.
    ///
    /// Returns false when auto-restore is off or nothing was persisted.
    /// Runs as a session restore: unsaved documents are kept without asking.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted layout cannot be parsed or the
    /// restore does not start.
    pub fn startup_restore(&mut self) -> LayoutResult<bool> {
        if !self.config.persistence.restore_layout {
            return Ok(false);
        }
        let Some(json) = self
            .host
            .read_setting(SETTINGS_GROUP, RESTORE_LAYOUT_KEY)
            .filter(|value| !value.is_empty() && value != RESTORE_DISABLED)
        else {
            return Ok(false);
        };
        let mut layout = SavedLayout::from_json(&json)?;
        layout.path = self
            .host
            .read_setting(SETTINGS_GROUP, RESTORE_LAYOUT_PATH_KEY)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .filter(|path| self.host.file_exists(path));
        let options = RestoreOptions {
            silent: false,
            session: true,
        };
        self.restore_layout(layout, options)?;
        Ok(true)
    }

    /// Starts restoring `layout`.
    ///
    /// The first phase runs immediately; the rest follow on the restore
    /// timer. Unless `options.session` is set, unsaved documents require
    /// confirmation (and abort a silent restore).
    ///
    /// # Errors
    ///
    /// Returns an error if the workspace is detached or busy, the user
    /// declined, or none of the layout's files exist.
    pub fn restore_layout(
        &mut self,
        layout: SavedLayout,
        options: RestoreOptions,
    ) -> LayoutResult<()> {
        if !self.attached {
            return Err(LayoutError::Detached);
        }
        if self.restore.is_some() || self.syncing {
            return Err(LayoutError::RestoreInProgress);
        }
        if !options.session && self.has_unsaved_documents() {
            if options.silent || !self.host.confirm(PROMPT_TITLE, UNSAVED_CHANGES_PROMPT) {
                tracing::debug!("Restore declined, unsaved documents open");
                return Err(LayoutError::Declined);
            }
        }
        let files = layout.files(|path| self.host.file_exists(path));
        if files.existing.is_empty() {
            if !options.silent {
                self.host.warn(
                    PROMPT_TITLE,
                    &file_list_message(NOTHING_TO_RESTORE_WARNING, &files.missing),
                );
            }
            return Err(LayoutError::NothingToRestore {
                missing: files.missing,
            });
        }

        let _span = tracing::info_span!(span_names::LAYOUT_RESTORE, session = options.session).entered();
        self.set_locked(false, false);
        self.cancel_drag();
        self.clear_snapshots();
        self.scheduler.cancel(Task::Persist);
        tracing::info!(
            files = files.existing.len(),
            missing = files.missing.len(),
            "Restoring layout"
        );
        self.restore = Some(RestoreJob::new(layout, options));
        self.step_restore();
        Ok(())
    }

    fn step_restore(&mut self) {
        let metrics = self.metrics;
        let attached = self.attached;
        let Some(job) = self.restore.as_mut() else {
            return;
        };
        if !attached || !job.is_alive(&self.tree) {
            tracing::debug!(phase = %job.phase(), "Restore abandoned");
            self.restore = None;
            return;
        }
        let phase = job.phase();
        let report = match phase {
            RestorePhase::Topology => job.build_topology(&mut self.tree, metrics),
            RestorePhase::Populate => {
                job.populate(&mut self.tree, &mut self.host, &self.config.tabs);
                self.sync_view_table();
                let container = self.tree.container();
                self.tree.layout(container, metrics, true)
            }
            RestorePhase::Resize => job.correct_sizes(&mut self.tree, metrics),
            RestorePhase::Finalize => {
                let report = job.finalize(&mut self.tree, &mut self.host);
                let layout = job.layout();
                let (locked, path) = (layout.locked, layout.path.clone());
                let options = job.options();
                self.restore = None;
                self.finish_restore(report, locked, path, options);
                return;
            }
            RestorePhase::Done => {
                self.restore = None;
                return;
            }
        };
        tracing::debug!(%phase, "Restore step finished");
        self.apply(&report);
        self.scheduler.schedule(
            Task::Restore,
            self.now,
            self.config.persistence.restore_step(),
        );
    }

    fn finish_restore(
        &mut self,
        report: RestoreReport,
        locked: bool,
        path: Option<PathBuf>,
        options: RestoreOptions,
    ) {
        self.sync_view_table();
        if locked {
            self.set_locked(true, !options.silent);
        }
        self.layout_path = path;
        let root = self.tree.root();
        self.active_pane = report
            .active_pane
            .filter(|pane| self.tree.is_leaf(*pane))
            .unwrap_or_else(|| self.tree.first_most(root));
        self.relayout(true);
        self.activate_current(self.active_pane);
        if !report.missing.is_empty() && !options.silent {
            self.host.warn(
                PROMPT_TITLE,
                &file_list_message(MISSING_FILES_WARNING, &report.missing),
            );
        }
        self.last_restore = Some(report);
        self.schedule_persist();
    }

    fn has_documents_without_file(&self) -> bool {
        self.host.documents().into_iter().any(|document| {
            self.host
                .document_path(document)
                .is_none_or(|path| !self.host.file_exists(&path))
        })
    }

    fn has_unsaved_documents(&self) -> bool {
        self.host
            .documents()
            .into_iter()
            .any(|document| self.host.document_modified(document))
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn sync<T>(
        &mut self,
        update: impl FnOnce(&mut Self) -> Result<T, SplitError>,
    ) -> Result<T, SplitError> {
        if !self.attached {
            return Err(SplitError::Detached);
        }
        if self.syncing || self.restore.is_some() {
            tracing::trace!("Sync request dropped, another update is in progress");
            return Err(SplitError::Busy);
        }
        self.syncing = true;
        let result = update(self);
        self.syncing = false;
        if let Err(e) = &result {
            tracing::debug!(error = %e, "Layout update skipped");
        }
        result
    }

    const fn ensure_unlocked(&self) -> Result<(), SplitError> {
        if self.locked {
            Err(SplitError::Locked)
        } else {
            Ok(())
        }
    }

    fn leaf_strip(&self, pane: PaneId) -> Result<&TabStrip, SplitError> {
        if !self.tree.contains(pane) {
            return Err(SplitError::PaneNotFound(pane));
        }
        self.tree.tabs(pane).ok_or(SplitError::NotALeaf(pane))
    }

    fn tab(&self, pane: PaneId, index: usize) -> Result<&TabEntry, SplitError> {
        self.leaf_strip(pane)?
            .get(index)
            .ok_or(SplitError::TabOutOfRange { pane, index })
    }

    fn target_leaf(&self) -> PaneId {
        if self.tree.is_leaf(self.active_pane) {
            self.active_pane
        } else {
            self.tree.first_most(self.tree.root())
        }
    }

    /// Removes the tabs of `source` (or creates copies of them). Returns the
    /// entries and the offset of the one to make current.
    fn take_tabs(&mut self, source: TabSource) -> Result<(Vec<TabEntry>, usize), SplitError> {
        let strip = self.leaf_strip(source.pane)?;
        let (indices, preferred) = match source.selection {
            TabSelection::One(index) if index < strip.len() => (vec![index], 0),
            TabSelection::One(index) => {
                return Err(SplitError::TabOutOfRange {
                    pane: source.pane,
                    index,
                });
            }
            TabSelection::All => ((0..strip.len()).collect(), strip.current_index().unwrap_or(0)),
        };

        let entries = if source.duplicate {
            let documents: Vec<DocumentId> = indices
                .iter()
                .filter_map(|index| strip.get(*index))
                .map(|tab| tab.document)
                .collect();
            let mut entries = Vec::with_capacity(documents.len());
            for document in documents {
                let Some(view) = self.host.add_view(document) else {
                    continue;
                };
                if let Some(entry) = self.host.tab_entry(view, &self.config.tabs) {
                    self.views.entry(view).or_default();
                    entries.push(entry);
                }
            }
            entries
        } else {
            let strip = self
                .tree
                .tabs_mut(source.pane)
                .ok_or(SplitError::NotALeaf(source.pane))?;
            match source.selection {
                TabSelection::One(index) => strip.remove(index).into_iter().collect(),
                TabSelection::All => strip.take_all(),
            }
        };
        if entries.is_empty() {
            return Err(SplitError::NoOpDrop);
        }
        Ok((entries, preferred))
    }

    /// Puts moved tabs into `receiving`, removes a source pane left empty,
    /// and lays the tree out. Returns the receiving pane's live handle.
    fn land(
        &mut self,
        source: Option<TabSource>,
        moved: Option<(Vec<TabEntry>, usize)>,
        receiving: PaneId,
    ) -> PaneId {
        let mut receiving = receiving;
        if let (Some(source), Some((entries, preferred))) = (source, moved) {
            if let Some(strip) = self.tree.tabs_mut(receiving) {
                let start = strip.len();
                let count = entries.len();
                for entry in entries {
                    strip.push(entry, false);
                }
                strip.set_current(start + preferred.min(count.saturating_sub(1)));
            }
            let emptied = !source.duplicate
                && source.pane != receiving
                && !self.tree.is_root(source.pane)
                && self.tree.tabs(source.pane).is_some_and(TabStrip::is_empty);
            if emptied {
                if let Ok(results) = self.tree.prune(source.pane) {
                    for result in &results {
                        receiving = result.remap(receiving);
                    }
                }
            }
        }
        self.active_pane = receiving;
        self.relayout(true);
        self.activate_current(receiving);
        self.schedule_persist();
        receiving
    }

    fn remap(&mut self, results: &[RemoveResult]) {
        for result in results {
            self.active_pane = result.remap(self.active_pane);
        }
        if !self.tree.is_leaf(self.active_pane) {
            self.active_pane = self.tree.first_most(self.tree.root());
        }
    }

    /// Asks the host to close `views` and drops the tabs it closed.
    fn close_views(&mut self, pane: PaneId, views: &[ViewId]) -> usize {
        let mut closed = 0;
        for &view in views {
            if !self.host.close_view(view) {
                tracing::debug!(%view, "Host kept view open");
                continue;
            }
            if let Some(strip) = self.tree.tabs_mut(pane) {
                strip.take_view(view);
            }
            self.views.remove(&view);
            closed += 1;
        }
        closed
    }

    fn drop_if_empty(&mut self, pane: PaneId) {
        let empty = self.tree.tabs(pane).is_some_and(TabStrip::is_empty);
        if empty && !self.tree.is_root(pane) && !self.locked && self.restore.is_none() {
            if let Ok(results) = self.tree.prune(pane) {
                self.remap(&results);
            }
            self.relayout(true);
            self.activate_current(self.active_pane);
        } else {
            self.place_pane(pane);
        }
    }

    fn adopt_views(&mut self) {
        let active = self.host.active_view();
        for view in self.host.views() {
            if self.tree.find_view(view).is_none() {
                self.bind_view(view, Some(view) == active);
            }
        }
    }

    fn bind_view(&mut self, view: ViewId, make_current: bool) -> Option<(PaneId, usize)> {
        let entry = self.host.tab_entry(view, &self.config.tabs)?;
        let pane = self.target_leaf();
        let index = self.tree.tabs_mut(pane)?.push(entry, make_current);
        self.views.entry(view).or_default();
        tracing::debug!(%view, %pane, "View bound to pane");
        Some((pane, index))
    }

    /// Adds side-table records for bound views and drops those of views no
    /// longer in the tree.
    fn sync_view_table(&mut self) {
        let bound: Vec<ViewId> = self
            .tree
            .leaves()
            .into_iter()
            .filter_map(|leaf| self.tree.tabs(leaf))
            .flat_map(TabStrip::views)
            .collect();
        self.views.retain(|view, _| bound.contains(view));
        for view in bound {
            self.views.entry(view).or_default();
        }
    }

    /// Updates labels, modified flags and paths from the host. Returns true
    /// if a path changed.
    fn refresh_tabs(&mut self, document: Option<DocumentId>) -> bool {
        let mut path_changed = false;
        for leaf in self.tree.leaves() {
            let Some(strip) = self.tree.tabs_mut(leaf) else {
                continue;
            };
            for index in 0..strip.len() {
                let Some(entry) = strip.get_mut(index) else {
                    continue;
                };
                if document.is_some_and(|document| document != entry.document) {
                    continue;
                }
                let Some(fresh) = self.host.tab_entry(entry.view, &self.config.tabs) else {
                    continue;
                };
                path_changed |= fresh.path != entry.path;
                entry.label = fresh.label;
                entry.modified = fresh.modified;
                entry.path = fresh.path;
            }
        }
        path_changed
    }

    fn focus(&mut self, pane: PaneId) {
        self.active_pane = pane;
        self.place_pane(pane);
        self.activate_current(pane);
    }

    fn activate_current(&mut self, pane: PaneId) {
        let current = self
            .tree
            .tabs(pane)
            .and_then(TabStrip::current)
            .map(|tab| tab.view);
        if let Some(view) = current {
            self.host.activate_view(view);
        }
    }

    fn relayout(&mut self, force: bool) {
        let container = self.tree.container();
        let report = self.tree.layout(container, self.metrics, force);
        self.apply(&report);
    }

    /// Places the views of every reported leaf and schedules a save when the
    /// pass completed.
    fn apply(&mut self, report: &ResizeReport) {
        for leaf in &report.leaves {
            self.place_leaf(leaf.pane, leaf.content);
        }
        if report.pass_completed {
            self.schedule_persist();
        }
    }

    fn place_pane(&mut self, pane: PaneId) {
        if let Some(geometry) = self.tree.leaf_geometry(pane, self.metrics.tab_height) {
            self.place_leaf(pane, geometry.content);
        }
    }

    fn place_leaf(&mut self, pane: PaneId, content: Rect) {
        let Some(strip) = self.tree.tabs(pane) else {
            return;
        };
        let current = strip.current().map(|tab| tab.view);
        for view in strip.views() {
            self.host.place_view(view, content, Some(view) == current);
        }
        if let Some(view) = current {
            self.preserve_viewport(view, content);
        }
    }

    fn preserve_viewport(&mut self, view: ViewId, content: Rect) {
        let Some(snapshot) = self.views.get(&view).and_then(|meta| meta.snapshot) else {
            return;
        };
        let mode = self.scaling_mode(view);
        let state = viewport::preserve(&snapshot, content, mode, &self.config.resize);
        self.host.apply_canvas(view, state);
    }

    /// Captures the canvas of every visible view under `under` that has no
    /// snapshot yet.
    fn take_snapshots(&mut self, under: PaneId) {
        for leaf in self.tree.leaves_under(under) {
            let Some(view) = self
                .tree
                .tabs(leaf)
                .and_then(TabStrip::current)
                .map(|tab| tab.view)
            else {
                continue;
            };
            let Some(geometry) = self.tree.leaf_geometry(leaf, self.metrics.tab_height) else {
                continue;
            };
            let Some(canvas) = self.host.canvas_state(view) else {
                continue;
            };
            let meta = self.views.entry(view).or_default();
            if meta.snapshot.is_none() {
                meta.snapshot = Some(ViewportSnapshot::new(geometry.content, canvas));
            }
        }
    }

    fn clear_snapshots(&mut self) {
        for meta in self.views.values_mut() {
            meta.snapshot = None;
        }
    }
}

fn file_list_message(heading: &str, files: &[String]) -> String {
    format!("{heading}\n{}", files.join("\n"))
}
