//! Command history for the line editor.
//!
//! An in-memory ordered log with a fixed capacity. Oldest entries are
//! evicted first once the cap is exceeded. Nothing is persisted to disk.

use std::collections::VecDeque;

/// Default maximum number of history entries.
pub const DEFAULT_HISTORY_CAPACITY: usize = 1000;

/// Bounded, ordered command history (newest last).
#[derive(Debug, Clone)]
pub struct HistoryLog {
    entries: VecDeque<String>,
    capacity: usize,
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl HistoryLog {
    /// Create a history log with the given capacity.
    ///
    /// A capacity of zero is treated as one so the log can always hold
    /// the most recent command.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Add a command to history.
    ///
    /// Empty and whitespace-only lines are skipped, as is a command equal
    /// to the most recent entry.
    pub fn push(&mut self, command: &str) {
        let trimmed = command.trim();
        if trimmed.is_empty() {
            return;
        }
        if self.entries.back().map(String::as_str) == Some(trimmed) {
            return;
        }

        self.entries.push_back(trimmed.to_string());
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Replace the entire log with a single entry.
    ///
    /// Used when a session starts from a derived initial command: that
    /// command becomes the sole entry.
    pub fn reset_to(&mut self, command: &str) {
        self.entries.clear();
        self.push(command);
    }

    /// Entries oldest-first.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Most recent entry, if any.
    pub fn last(&self) -> Option<&str> {
        self.entries.back().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
