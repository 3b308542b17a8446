//! Property test modules

mod layout_tests;
mod pane_tree_tests;
mod viewport_tests;
