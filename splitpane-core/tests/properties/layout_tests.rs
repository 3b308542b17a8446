//! Property-based tests for layout capture and restore
//!
//! **Feature: layout-persistence**
//!
//! A layout captured from a tree whose tabs all have files, serialized to
//! JSON and restored into a window of the same size, must rebuild the same
//! tree: shape, orientations, files per pane and active tab per pane.

use proptest::prelude::*;
use splitpane_core::config::TabSettings;
use splitpane_core::host::{DocumentHost, MemoryHost};
use splitpane_core::split::{
    DocumentId, LayoutMetrics, Orientation, PaneId, PaneTree, Rect, RestoreJob, RestoreOptions,
    SavedLayout, TabEntry, ViewId,
};

const CONTAINER: Rect = Rect::new(0, 0, 1200, 800);

const METRICS: LayoutMetrics = LayoutMetrics {
    tab_height: 30,
    min_pane_size: 80,
};

/// Structure of a tree, ignoring handles and pixel sizes
#[derive(Debug, Clone, PartialEq, Eq)]
enum Shape {
    Leaf {
        files: Vec<String>,
        current: Option<usize>,
    },
    Branch(Orientation, Box<Shape>, Box<Shape>),
}

fn shape(tree: &PaneTree, id: PaneId) -> Shape {
    if let Some((first, second)) = tree.children(id) {
        return Shape::Branch(
            tree.orientation(id).unwrap(),
            Box::new(shape(tree, first)),
            Box::new(shape(tree, second)),
        );
    }
    let tabs = tree.tabs(id).unwrap();
    Shape::Leaf {
        files: tabs
            .iter()
            .map(|tab| tab.path.as_ref().unwrap().to_string_lossy().into_owned())
            .collect(),
        current: tabs.current_index(),
    }
}

fn leaf_extents(tree: &PaneTree) -> Vec<(i32, i32)> {
    tree.leaves()
        .into_iter()
        .map(|leaf| {
            let rect = tree.rect(leaf).unwrap();
            (rect.width, rect.height)
        })
        .collect()
}

// ============================================================================
// Test Strategies
// ============================================================================

/// A split of a leaf picked by index, followed by an optional divider move
#[derive(Debug, Clone)]
struct Step {
    leaf: usize,
    orientation: Orientation,
    divider_delta: i32,
}

fn steps_strategy(max_steps: usize) -> impl Strategy<Value = Vec<Step>> {
    proptest::collection::vec(
        (
            0usize..16,
            prop_oneof![Just(Orientation::Vertical), Just(Orientation::Horizontal)],
            -200i32..200,
        )
            .prop_map(|(leaf, orientation, divider_delta)| Step {
                leaf,
                orientation,
                divider_delta,
            }),
        0..=max_steps,
    )
}

fn tab_counts_strategy() -> impl Strategy<Value = Vec<(usize, usize)>> {
    proptest::collection::vec((1usize..4, 0usize..4), 8)
}

/// Builds a tree and fills every leaf with files. Returns the tree and
/// every file used.
fn build(steps: &[Step], tabs: &[(usize, usize)]) -> (PaneTree, Vec<String>) {
    let mut tree = PaneTree::new(8);
    tree.layout(CONTAINER, METRICS, true);
    for step in steps {
        let leaves = tree.leaves();
        let leaf = leaves[step.leaf % leaves.len()];
        tree.split_leaf(leaf, step.orientation, false).unwrap();
        tree.layout(CONTAINER, METRICS, true);
        if let Some(branch) = tree.branch_mut(leaf) {
            branch.divider.move_by(step.divider_delta);
        }
        tree.resize(leaf, METRICS, false);
    }

    let mut files = Vec::new();
    for (i, leaf) in tree.leaves().into_iter().enumerate() {
        let (count, current) = tabs[i % tabs.len()];
        let strip = tree.tabs_mut(leaf).unwrap();
        for _ in 0..count {
            let path = format!("/images/file{}.png", files.len());
            strip.push(
                TabEntry::new(ViewId::new(), DocumentId::new()).with_path(path.clone()),
                false,
            );
            files.push(path);
        }
        strip.set_current(current % count);
    }
    (tree, files)
}

fn restore(layout: SavedLayout, host: &mut MemoryHost) -> PaneTree {
    let mut tree = PaneTree::new(8);
    tree.layout(CONTAINER, METRICS, true);
    let mut job = RestoreJob::new(layout, RestoreOptions::default());
    job.build_topology(&mut tree, METRICS);
    job.populate(&mut tree, host, &TabSettings::default());
    job.correct_sizes(&mut tree, METRICS);
    job.finalize(&mut tree, host);
    tree
}

// ============================================================================
// Property 1: Round-Trip
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Feature: layout-persistence, Property 1: Round-Trip
    //
    // *For any* tree whose tabs all have existing files, restoring its saved
    // layout at the same window size reproduces the same structure.

    #[test]
    fn prop_restore_reproduces_saved_tree(
        steps in steps_strategy(4),
        tabs in tab_counts_strategy(),
    ) {
        let (tree, files) = build(&steps, &tabs);
        let saved = SavedLayout::capture(&tree, None, false, |_| true);
        let json = saved.to_json().unwrap();
        let layout = SavedLayout::from_json(&json).unwrap();
        prop_assert_eq!(&layout, &saved);

        let mut host = MemoryHost::with_files(files.iter().map(String::as_str));
        let restored = restore(layout, &mut host);

        prop_assert_eq!(shape(&restored, restored.root()), shape(&tree, tree.root()));
        prop_assert_eq!(host.documents().len(), files.len());
        for ((w1, h1), (w2, h2)) in leaf_extents(&restored).into_iter().zip(leaf_extents(&tree)) {
            prop_assert!((w1 - w2).abs() <= 2, "width {} vs {}", w1, w2);
            prop_assert!((h1 - h2).abs() <= 2, "height {} vs {}", h1, h2);
        }
    }

    #[test]
    fn prop_missing_files_are_reported_not_fatal(
        steps in steps_strategy(3),
        tabs in tab_counts_strategy(),
        gone in proptest::collection::vec(any::<bool>(), 16),
    ) {
        let (tree, files) = build(&steps, &tabs);
        let layout = SavedLayout::capture(&tree, None, false, |_| true);
        let (missing, existing): (Vec<_>, Vec<_>) = files
            .iter()
            .enumerate()
            .partition(|(i, _)| gone[*i % gone.len()]);
        let existing: Vec<String> = existing.into_iter().map(|(_, f)| f.clone()).collect();
        let missing: Vec<String> = missing.into_iter().map(|(_, f)| f.clone()).collect();

        let mut host = MemoryHost::with_files(existing.iter().map(String::as_str));
        let mut restored = PaneTree::new(8);
        restored.layout(CONTAINER, METRICS, true);
        let mut job = RestoreJob::new(layout, RestoreOptions::default());
        job.build_topology(&mut restored, METRICS);
        job.populate(&mut restored, &mut host, &TabSettings::default());
        job.correct_sizes(&mut restored, METRICS);
        let report = job.finalize(&mut restored, &mut host);

        prop_assert_eq!(&report.missing, &missing);
        prop_assert_eq!(&report.restored, &existing);
        prop_assert_eq!(restored.tab_count(), existing.len());
    }
}
