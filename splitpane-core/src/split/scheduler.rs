//! Keyed one-shot timer queue
//!
//! Everything runs on the host's UI thread. Deadlines are durations on the
//! host's monotonic clock; the host advances the queue by calling
//! `SplitWorkspace::tick` with the current time.

use std::fmt;
use std::time::Duration;

/// Deferred work owned by the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    /// Write the current layout to the settings store
    Persist,
    /// Recompute the drop target of an active tab drag
    DragPoll,
    /// Apply the accumulated delta of a divider drag
    DividerPoll,
    /// Advance the running layout restore by one phase
    Restore,
    /// Drop the viewport snapshots of a finished container resize
    ResizeSettle,
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Persist => "persist",
            Self::DragPoll => "drag-poll",
            Self::DividerPoll => "divider-poll",
            Self::Restore => "restore",
            Self::ResizeSettle => "resize-settle",
        })
    }
}

/// One-shot timers, at most one per key.
#[derive(Debug, Clone)]
pub struct Scheduler<K> {
    entries: Vec<(K, Duration)>,
}

impl<K> Default for Scheduler<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: Copy + Eq + fmt::Debug> Scheduler<K> {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `key` to fire `delay` after `now`, replacing any earlier
    /// deadline for the same key.
    pub fn schedule(&mut self, key: K, now: Duration, delay: Duration) {
        let deadline = now + delay;
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = deadline;
        } else {
            self.entries.push((key, deadline));
        }
    }

    /// Schedules `key` unless it is already pending.
    ///
    /// Repeated requests keep the first deadline, so a burst of changes is
    /// written once, `delay` after the first of them. Returns true if a new
    /// timer was started.
    pub fn debounce(&mut self, key: K, now: Duration, delay: Duration) -> bool {
        if self.is_scheduled(key) {
            return false;
        }
        self.entries.push((key, now + delay));
        true
    }

    /// Cancels `key`. Returns true if it was pending.
    pub fn cancel(&mut self, key: K) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(k, _)| *k != key);
        before != self.entries.len()
    }

    /// Returns true if `key` is pending.
    #[must_use]
    pub fn is_scheduled(&self, key: K) -> bool {
        self.entries.iter().any(|(k, _)| *k == key)
    }

    /// Deadline of `key`.
    #[must_use]
    pub fn deadline(&self, key: K) -> Option<Duration> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, deadline)| *deadline)
    }

    /// Earliest pending deadline.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.entries.iter().map(|(_, deadline)| *deadline).min()
    }

    /// Removes and returns every key due at `now`, earliest first.
    pub fn take_due(&mut self, now: Duration) -> Vec<K> {
        let mut due: Vec<(K, Duration)> = Vec::new();
        self.entries.retain(|(key, deadline)| {
            if *deadline <= now {
                due.push((*key, *deadline));
                false
            } else {
                true
            }
        });
        due.sort_by_key(|(_, deadline)| *deadline);
        due.into_iter().map(|(key, _)| key).collect()
    }

    /// Number of pending keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cancels everything.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
