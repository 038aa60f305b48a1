//! Process table collaborator.
//!
//! Each session is owned by a process/window manager that keeps a small
//! per-session record: whether the session is closing, which addon bundles
//! it declares, and a pending launch target (a URL or file path from a file
//! association). The manager also shows a loading spinner until the session
//! reports that initialization finished.

use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

/// Opaque session identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Per-session record exposed by the process manager.
#[derive(Debug, Clone, Default)]
pub struct SessionRecord {
    /// Session is being closed by the manager.
    pub closing: bool,
    /// Addon bundles this session declares.
    pub libraries: BTreeSet<String>,
    /// Pending launch target (URL or file path), if any.
    pub launch_target: Option<String>,
    /// Manager-side loading spinner state.
    pub loading: bool,
}

/// The process manager's per-session view, as consumed by sessions.
pub trait ProcessTable: Send + Sync {
    /// Fetch the record for a session, if it is still registered.
    fn record(&self, id: SessionId) -> Option<SessionRecord>;

    /// Clear a session's launch target. Called exactly once per target,
    /// whether or not an initial command was derived from it.
    fn clear_launch_target(&self, id: SessionId);

    /// Signal that initialization finished so the manager can drop its
    /// loading spinner.
    fn finish_loading(&self, id: SessionId);
}

/// In-memory process table, used by the demo binary and by tests.
#[derive(Debug, Default)]
pub struct InMemoryProcessTable {
    records: Mutex<HashMap<SessionId, SessionRecord>>,
}

impl InMemoryProcessTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session with a fresh record.
    pub fn register(&self, id: SessionId, record: SessionRecord) {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id, record);
    }

    /// Flag a session as closing.
    pub fn set_closing(&self, id: SessionId) {
        if let Some(record) = self
            .records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get_mut(&id)
        {
            record.closing = true;
        }
    }

    /// Set a session's launch target (a new file association arrived).
    pub fn set_launch_target(&self, id: SessionId, target: impl Into<String>) {
        if let Some(record) = self
            .records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get_mut(&id)
        {
            record.launch_target = Some(target.into());
        }
    }
}

impl ProcessTable for InMemoryProcessTable {
    fn record(&self, id: SessionId) -> Option<SessionRecord> {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&id)
            .cloned()
    }

    fn clear_launch_target(&self, id: SessionId) {
        if let Some(record) = self
            .records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get_mut(&id)
        {
            record.launch_target = None;
        }
    }

    fn finish_loading(&self, id: SessionId) {
        if let Some(record) = self
            .records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get_mut(&id)
        {
            record.loading = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_roundtrip() {
        let table = InMemoryProcessTable::new();
        let id = SessionId(1);
        table.register(
            id,
            SessionRecord {
                loading: true,
                launch_target: Some("notes.txt".into()),
                ..Default::default()
            },
        );

        let record = table.record(id).unwrap();
        assert!(record.loading);
        assert!(!record.closing);
        assert_eq!(record.launch_target.as_deref(), Some("notes.txt"));

        table.clear_launch_target(id);
        table.finish_loading(id);
        table.set_closing(id);

        let record = table.record(id).unwrap();
        assert!(record.launch_target.is_none());
        assert!(!record.loading);
        assert!(record.closing);
    }

    #[test]
    fn unknown_session_has_no_record() {
        let table = InMemoryProcessTable::new();
        assert!(table.record(SessionId(42)).is_none());
        // Setters on unknown sessions are no-ops, not panics.
        table.clear_launch_target(SessionId(42));
        table.finish_loading(SessionId(42));
    }
}
