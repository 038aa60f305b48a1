//! Shared current-working-directory cell.
//!
//! The working directory is read by the prompt cycle and the autocomplete
//! provider but mutated only by the command interpreter. That split is
//! enforced by handing out two capability types over one shared cell:
//! [`CwdHandle`] (read-write, interpreter only) and [`CwdView`] (read-only).

use std::sync::{Arc, RwLock};

/// Read-write handle to the session's working directory.
///
/// Exactly one collaborator (the command interpreter) should hold one of
/// these; everything else gets a [`CwdView`].
#[derive(Debug, Clone)]
pub struct CwdHandle {
    inner: Arc<RwLock<String>>,
}

/// Read-only view of the session's working directory.
#[derive(Debug, Clone)]
pub struct CwdView {
    inner: Arc<RwLock<String>>,
}

impl CwdHandle {
    /// Create a cell seeded with the given path.
    ///
    /// An empty seed is replaced by `/` so the cell never holds an empty
    /// path.
    pub fn new(initial: impl Into<String>) -> Self {
        let initial = initial.into();
        let initial = if initial.is_empty() {
            "/".to_string()
        } else {
            initial
        };
        Self {
            inner: Arc::new(RwLock::new(initial)),
        }
    }

    /// Replace the working directory.
    ///
    /// Empty paths are rejected to preserve the never-empty invariant.
    pub fn set(&self, path: impl Into<String>) {
        let path = path.into();
        if path.is_empty() {
            tracing::warn!("ignoring empty working-directory update");
            return;
        }
        *self.inner.write().unwrap_or_else(|e| e.into_inner()) = path;
    }

    /// Current working directory.
    pub fn get(&self) -> String {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Derive a read-only view over the same cell.
    pub fn view(&self) -> CwdView {
        CwdView {
            inner: self.inner.clone(),
        }
    }
}

impl CwdView {
    /// Current working directory.
    pub fn get(&self) -> String {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}
