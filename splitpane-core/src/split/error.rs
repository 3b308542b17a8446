//! Error types for pane tree operations
//!
//! Precondition failures (locked layout, wrong node kind, stale handle) are
//! routine. Callers log them and carry on; they are never shown to the user.

use super::types::{PaneId, ViewId};

/// Errors that can occur during pane tree operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SplitError {
    /// The layout is locked against structural changes.
    #[error("layout is locked")]
    Locked,

    /// The handle does not address a live pane.
    #[error("pane not found: {0}")]
    PaneNotFound(PaneId),

    /// The operation needs a leaf pane.
    #[error("pane is not a leaf: {0}")]
    NotALeaf(PaneId),

    /// The operation needs a branch pane.
    #[error("pane is not a branch: {0}")]
    NotABranch(PaneId),

    /// The tab index is outside the pane's tab strip.
    #[error("tab index {index} out of range for {pane}")]
    TabOutOfRange {
        /// Pane holding the tab strip
        pane: PaneId,
        /// Requested index
        index: usize,
    },

    /// The view is not bound to any pane.
    #[error("view not found: {0}")]
    ViewNotFound(ViewId),

    /// The user kept at least one view of the pane open.
    #[error("closing {0} was declined")]
    CloseDeclined(PaneId),

    /// Another synchronized mutation is in progress.
    #[error("a layout update is already in progress")]
    Busy,

    /// The drop would not change the layout.
    #[error("drop target leaves the layout unchanged")]
    NoOpDrop,

    /// The workspace has been detached from its host window.
    #[error("workspace is detached")]
    Detached,
}

impl SplitError {
    /// Returns true for failures that only mean "nothing to do".
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::Locked
                | Self::NotALeaf(_)
                | Self::NotABranch(_)
                | Self::Busy
                | Self::NoOpDrop
                | Self::Detached
        )
    }
}

/// Structural effect of removing a leaf from the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveResult {
    /// The leaf is the root; it stays in place as an empty workspace.
    KeptRoot(PaneId),
    /// The leaf was removed and its sibling's content moved into the parent.
    ///
    /// `absorbed` no longer exists; any reference to it now points at `into`.
    Collapsed {
        /// Removed leaf
        removed: PaneId,
        /// Sibling whose content was moved up
        absorbed: PaneId,
        /// Former parent, now holding the sibling's content
        into: PaneId,
    },
}

impl RemoveResult {
    /// Translates a handle that may have been absorbed by this removal.
    #[must_use]
    pub fn remap(&self, pane: PaneId) -> PaneId {
        match *self {
            Self::Collapsed { absorbed, into, .. } if absorbed == pane => into,
            _ => pane,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_error_display() {
        let pane = PaneId::new(2, 0);
        assert_eq!(SplitError::Locked.to_string(), "layout is locked");
        assert_eq!(
            SplitError::PaneNotFound(pane).to_string(),
            "pane not found: Pane(2v0)"
        );
        assert_eq!(
            SplitError::TabOutOfRange { pane, index: 4 }.to_string(),
            "tab index 4 out of range for Pane(2v0)"
        );
    }

    #[test]
    fn test_precondition_classification() {
        assert!(SplitError::Locked.is_precondition());
        assert!(SplitError::NotALeaf(PaneId::new(0, 0)).is_precondition());
        assert!(!SplitError::CloseDeclined(PaneId::new(0, 0)).is_precondition());
        assert!(!SplitError::PaneNotFound(PaneId::new(0, 0)).is_precondition());
    }

    #[test]
    fn test_remove_result_remap() {
        let removed = PaneId::new(1, 0);
        let absorbed = PaneId::new(2, 0);
        let into = PaneId::new(0, 0);
        let other = PaneId::new(5, 0);
        let result = RemoveResult::Collapsed {
            removed,
            absorbed,
            into,
        };
        assert_eq!(result.remap(absorbed), into);
        assert_eq!(result.remap(other), other);
        assert_eq!(RemoveResult::KeptRoot(into).remap(absorbed), absorbed);
    }
}
