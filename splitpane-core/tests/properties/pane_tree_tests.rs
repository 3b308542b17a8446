//! Property-based tests for the pane tree and its geometry
//!
//! **Feature: pane-tree-geometry**
//!
//! These tests check that arbitrary split sequences, divider moves and
//! container sizes keep the tree partitioned, honour the minimum pane size,
//! and that closing panes always simplifies back to a single root.

use proptest::prelude::*;
use splitpane_core::split::{Divider, LayoutMetrics, Orientation, PaneId, PaneTree, Rect};

const THICKNESS: i32 = 8;

const METRICS: LayoutMetrics = LayoutMetrics {
    tab_height: 30,
    min_pane_size: 80,
};

// ============================================================================
// Test Strategies
// ============================================================================

fn orientation_strategy() -> impl Strategy<Value = Orientation> {
    prop_oneof![Just(Orientation::Vertical), Just(Orientation::Horizontal)]
}

/// A split of the leaf picked by index, modulo the leaf count
#[derive(Debug, Clone)]
struct SplitOp {
    leaf: usize,
    orientation: Orientation,
    swap_sides: bool,
}

fn split_ops_strategy(max_ops: usize) -> impl Strategy<Value = Vec<SplitOp>> {
    proptest::collection::vec(
        (0usize..16, orientation_strategy(), any::<bool>()).prop_map(
            |(leaf, orientation, swap_sides)| SplitOp {
                leaf,
                orientation,
                swap_sides,
            },
        ),
        0..=max_ops,
    )
}

fn container_strategy() -> impl Strategy<Value = Rect> {
    (600i32..1600, 400i32..1000).prop_map(|(width, height)| Rect::new(0, 0, width, height))
}

fn divider_moves_strategy() -> impl Strategy<Value = Vec<(usize, i32)>> {
    proptest::collection::vec((0usize..16, -600i32..600), 0..6)
}

fn build_tree(container: Rect, ops: &[SplitOp]) -> PaneTree {
    let mut tree = PaneTree::new(THICKNESS);
    tree.layout(container, METRICS, true);
    for op in ops {
        let leaves = tree.leaves();
        let leaf = leaves[op.leaf % leaves.len()];
        tree.split_leaf(leaf, op.orientation, op.swap_sides)
            .expect("picked pane is a live leaf");
        tree.layout(container, METRICS, true);
    }
    tree
}

fn move_dividers(tree: &mut PaneTree, moves: &[(usize, i32)]) {
    for &(pick, delta) in moves {
        let branches = tree.branches();
        if branches.is_empty() {
            return;
        }
        let branch = branches[pick % branches.len()];
        if let Some(data) = tree.branch_mut(branch) {
            data.divider.move_by(delta);
        }
        tree.resize(branch, METRICS, false);
    }
}

fn check_partition(tree: &PaneTree, branch: PaneId) -> Result<(), TestCaseError> {
    let rect = tree.rect(branch).unwrap();
    let o = tree.orientation(branch).unwrap();
    let (first, second) = tree.children(branch).unwrap();
    let (f, s) = (tree.rect(first).unwrap(), tree.rect(second).unwrap());

    prop_assert_eq!(f.extent(o) + THICKNESS + s.extent(o), rect.extent(o));
    prop_assert_eq!(f.start(o), rect.start(o));
    prop_assert_eq!(s.start(o), f.start(o) + f.extent(o) + THICKNESS);
    for child in [f, s] {
        prop_assert_eq!(child.start(o.flipped()), rect.start(o.flipped()));
        prop_assert_eq!(child.cross_extent(o), rect.cross_extent(o));
    }
    prop_assert_eq!(tree.parent(first), Some(branch));
    prop_assert_eq!(tree.parent(second), Some(branch));
    Ok(())
}

// ============================================================================
// Property 1: Tree Partition
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Feature: pane-tree-geometry, Property 1: Tree Partition
    //
    // *For any* sequence of splits and divider moves, every branch's
    // children exactly partition its rectangle, separated by the divider.

    #[test]
    fn prop_children_partition_branch(
        container in container_strategy(),
        ops in split_ops_strategy(5),
        moves in divider_moves_strategy(),
    ) {
        let mut tree = build_tree(container, &ops);
        move_dividers(&mut tree, &moves);

        prop_assert_eq!(tree.rect(tree.root()), Some(container));
        for branch in tree.branches() {
            check_partition(&tree, branch)?;
        }
        let leaf_area: i64 = tree.leaves().iter().map(|l| tree.rect(*l).unwrap().area()).sum();
        let divider_area: i64 = tree
            .branches()
            .iter()
            .map(|b| tree.divider_rect(*b).unwrap().area())
            .sum();
        prop_assert_eq!(leaf_area + divider_area, container.area());
    }

    #[test]
    fn prop_leaves_inside_parent(
        container in container_strategy(),
        ops in split_ops_strategy(5),
    ) {
        let tree = build_tree(container, &ops);
        for leaf in tree.leaves() {
            let rect = tree.rect(leaf).unwrap();
            prop_assert!(container.contains_rect(&rect));
            if let Some(parent) = tree.parent(leaf) {
                prop_assert!(tree.rect(parent).unwrap().contains_rect(&rect));
            }
        }
    }
}

// ============================================================================
// Property 2: Minimum Pane Size
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Feature: pane-tree-geometry, Property 2: Minimum Pane Size
    //
    // *For any* divider position, clamping inside an area large enough for
    // two minimum-size panes leaves both sides at least that size.

    #[test]
    fn prop_clamp_honours_minimum(
        orientation in orientation_strategy(),
        start in -200i32..200,
        extent in 0i32..2000,
        offset in -3000i32..3000,
        min_size in 0i32..300,
    ) {
        let area = match orientation {
            Orientation::Vertical => Rect::new(start, 0, extent, 500),
            Orientation::Horizontal => Rect::new(0, start, 500, extent),
        };
        let mut divider = Divider::new(orientation, THICKNESS);
        divider.move_to(offset);
        divider.clamp(area, min_size);

        let (first, second) = divider.child_rects(area);
        if extent >= divider.required_extent(min_size) {
            prop_assert!(first.extent(orientation) >= min_size);
            prop_assert!(second.extent(orientation) >= min_size);
        } else {
            prop_assert!((first.extent(orientation) - second.extent(orientation)).abs() <= 1);
        }
    }

    #[test]
    fn prop_dragged_dividers_stay_clamped(
        ops in split_ops_strategy(3),
        moves in divider_moves_strategy(),
        shrink in (300i32..1200, 300i32..900),
    ) {
        let mut tree = build_tree(Rect::new(0, 0, 1600, 1000), &ops);
        move_dividers(&mut tree, &moves);
        tree.layout(Rect::new(0, 0, shrink.0, shrink.1), METRICS, false);

        for branch in tree.branches() {
            let rect = tree.rect(branch).unwrap();
            let o = tree.orientation(branch).unwrap();
            if rect.extent(o) < 2 * METRICS.min_pane_size + THICKNESS {
                continue;
            }
            let (first, second) = tree.children(branch).unwrap();
            prop_assert!(tree.rect(first).unwrap().extent(o) >= METRICS.min_pane_size);
            prop_assert!(tree.rect(second).unwrap().extent(o) >= METRICS.min_pane_size);
        }
    }
}

// ============================================================================
// Property 3: Simplification
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Feature: pane-tree-geometry, Property 3: Simplification
    //
    // *For any* tree and any order of closing its leaves, every step leaves
    // a full binary tree and the process ends with a single root leaf.

    #[test]
    fn prop_closing_every_leaf_simplifies(
        ops in split_ops_strategy(6),
        order in proptest::collection::vec(0usize..16, 16),
    ) {
        let container = Rect::new(0, 0, 1200, 800);
        let mut tree = build_tree(container, &ops);
        let initial_leaves = tree.leaf_count();

        let mut steps = 0;
        while tree.leaf_count() > 1 {
            let candidates: Vec<PaneId> = tree
                .leaves()
                .into_iter()
                .filter(|leaf| !tree.is_root(*leaf))
                .collect();
            let leaf = candidates[order[steps % order.len()] % candidates.len()];
            tree.prune(leaf).expect("candidate is a live leaf");
            tree.layout(container, METRICS, true);
            steps += 1;

            prop_assert!(steps < initial_leaves);
            prop_assert_eq!(tree.node_count(), 2 * tree.leaf_count() - 1);
            for branch in tree.branches() {
                let (first, second) = tree.children(branch).unwrap();
                prop_assert!(tree.contains(first) && tree.contains(second));
            }
        }

        prop_assert!(!tree.is_split());
        prop_assert_eq!(tree.node_count(), 1);
        prop_assert_eq!(tree.rect(tree.root()), Some(container));
    }
}
