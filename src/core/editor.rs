//! Line-editor addon.
//!
//! Provides the asynchronous "read a line" primitive the prompt cycle
//! suspends on, plus bounded command history, an input buffer for cursor
//! inserts (clipboard paste, launch targets), and the autocomplete
//! candidate set fed from directory listings.
//!
//! At most one read may be outstanding at a time; the prompt cycle's strict
//! alternation depends on it. The widget delivers completed lines through
//! [`LineEditor::deliver_line`]; disposing the session abandons a pending
//! read instead of resolving it.

use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;
use tokio::sync::oneshot;

use crate::history::HistoryLog;
use crate::ui::surface::DisplaySurface;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ReadError {
    /// A read is already outstanding.
    #[error("a line read is already pending")]
    AlreadyPending,

    /// The session was torn down while the read was suspended.
    #[error("pending read abandoned")]
    Abandoned,
}

struct EditorState {
    history: HistoryLog,
    pending: Option<oneshot::Sender<String>>,
    /// Text inserted into the not-yet-submitted input line.
    buffer: String,
    /// Autocomplete candidates from the latest directory listing.
    candidates: Vec<String>,
}

/// The line-editing addon attached to a display surface.
pub struct LineEditor {
    surface: Arc<dyn DisplaySurface>,
    state: Mutex<EditorState>,
}

impl LineEditor {
    pub fn new(surface: Arc<dyn DisplaySurface>, history_capacity: usize) -> Self {
        Self {
            surface,
            state: Mutex::new(EditorState {
                history: HistoryLog::new(history_capacity),
                pending: None,
                buffer: String::new(),
                candidates: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, EditorState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Render a prompt and suspend until a completed line is delivered.
    ///
    /// Errors with [`ReadError::AlreadyPending`] if a read is already
    /// outstanding, and with [`ReadError::Abandoned`] if the editor is
    /// dropped or [`abandon`](Self::abandon)ed while suspended.
    pub async fn read(&self, prompt: &str) -> Result<String, ReadError> {
        let rx = {
            let mut state = self.lock();
            if state.pending.is_some() {
                return Err(ReadError::AlreadyPending);
            }
            let (tx, rx) = oneshot::channel();
            state.pending = Some(tx);
            self.surface.write(prompt);
            rx
        };

        rx.await.map_err(|_| ReadError::Abandoned)
    }

    /// Deliver a completed, newline-terminated line of input.
    ///
    /// Any text previously inserted into the input buffer is prepended.
    /// The full line is recorded in history and resolves the pending read.
    /// Returns false when no read was outstanding (the line is dropped).
    pub fn deliver_line(&self, line: &str) -> bool {
        let (tx, full) = {
            let mut state = self.lock();
            let Some(tx) = state.pending.take() else {
                return false;
            };
            let mut full = std::mem::take(&mut state.buffer);
            full.push_str(line);
            state.history.push(&full);
            (tx, full)
        };
        tx.send(full).is_ok()
    }

    /// Insert text into the current (not yet submitted) input line and echo
    /// it to the display.
    pub fn insert_into_input(&self, text: &str) {
        self.lock().buffer.push_str(text);
        self.surface.write(text);
    }

    /// Echo a full line to the display.
    pub fn println(&self, text: &str) {
        self.surface.write(text);
        self.surface.write("\r\n");
    }

    /// Make `command` the sole history entry.
    pub fn seed_history(&self, command: &str) {
        self.lock().history.reset_to(command);
    }

    /// Abandon any pending read. The suspended `read` resolves with
    /// [`ReadError::Abandoned`].
    pub fn abandon(&self) {
        self.lock().pending.take();
    }

    /// Replace the autocomplete candidate set.
    pub fn set_candidates(&self, entries: Vec<String>) {
        self.lock().candidates = entries;
    }

    /// Current autocomplete candidates.
    pub fn candidates(&self) -> Vec<String> {
        self.lock().candidates.clone()
    }

    /// Snapshot of the history log (oldest first).
    pub fn history(&self) -> Vec<String> {
        self.lock().history.entries().map(str::to_string).collect()
    }

    /// Text sitting in the unsubmitted input line.
    pub fn pending_input(&self) -> String {
        self.lock().buffer.clone()
    }

    /// Whether a read is currently suspended.
    pub fn has_pending_read(&self) -> bool {
        self.lock().pending.is_some()
    }
}
