//! Property-based tests for the `SplitPane` core library

// Allow common test patterns that Clippy warns about
#![allow(clippy::redundant_clone)]
#![allow(clippy::similar_names)]
#![allow(clippy::too_many_lines)]

mod properties;
