//! Context-menu copy/paste handling.
//!
//! The container's context-menu gesture is intercepted (the native menu is
//! suppressed by the host) and branches on the widget's selection state:
//! a non-empty selection is copied to the clipboard and cleared, otherwise
//! clipboard text is inserted into the pending input line. The handler is
//! armed once at initialization; it is not part of the prompt cycle.

use std::sync::Arc;

use crate::core::editor::LineEditor;
use crate::ui::clipboard::Clipboard;
use crate::ui::surface::DisplaySurface;

/// What a context-menu invocation ended up doing.
///
/// Clipboard failures are a variant, not an error; callers are free to
/// ignore the outcome entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuOutcome {
    /// Selection text was copied (best-effort) and the selection cleared.
    CopiedSelection(String),
    /// Clipboard text was inserted into the input line.
    PastedFromClipboard(String),
    /// No selection and no readable clipboard; nothing happened.
    ClipboardUnavailable,
}

/// One-time-registered context-menu handler for a session.
pub struct ContextMenuHandler {
    surface: Arc<dyn DisplaySurface>,
    editor: Arc<LineEditor>,
    clipboard: Arc<dyn Clipboard>,
}

impl ContextMenuHandler {
    pub fn new(
        surface: Arc<dyn DisplaySurface>,
        editor: Arc<LineEditor>,
        clipboard: Arc<dyn Clipboard>,
    ) -> Self {
        Self {
            surface,
            editor,
            clipboard,
        }
    }

    /// Handle one context-menu gesture.
    pub fn invoke(&self) -> MenuOutcome {
        if let Some(selection) = self.surface.selection().filter(|s| !s.is_empty()) {
            // Copy is best-effort; the selection is cleared either way.
            let _ = self.clipboard.write_text(&selection);
            self.surface.clear_selection();
            return MenuOutcome::CopiedSelection(selection);
        }

        match self.clipboard.read_text() {
            Some(text) if !text.is_empty() => {
                self.editor.insert_into_input(&text);
                MenuOutcome::PastedFromClipboard(text)
            }
            _ => MenuOutcome::ClipboardUnavailable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::clipboard::{MemoryClipboard, UnavailableClipboard};
    use crate::ui::surface::testing::RecordingSurface;

    fn handler(
        surface: Arc<RecordingSurface>,
        clipboard: Arc<dyn Clipboard>,
    ) -> (ContextMenuHandler, Arc<LineEditor>) {
        let editor = Arc::new(LineEditor::new(surface.clone(), 1000));
        (
            ContextMenuHandler::new(surface, editor.clone(), clipboard),
            editor,
        )
    }

    #[test]
    fn selection_is_copied_and_cleared() {
        let surface = RecordingSurface::with_selection("selected text");
        let clipboard = Arc::new(MemoryClipboard::new());
        let (handler, editor) = handler(surface.clone(), clipboard.clone());

        let outcome = handler.invoke();
        assert_eq!(outcome, MenuOutcome::CopiedSelection("selected text".to_string()));
        assert_eq!(clipboard.read_text(), Some("selected text".to_string()));
        assert!(surface.selection.lock().unwrap().is_none());
        assert_eq!(editor.pending_input(), "");
    }

    #[test]
    fn no_selection_pastes_into_input_line() {
        let surface = RecordingSurface::new();
        let (handler, editor) = handler(
            surface,
            Arc::new(MemoryClipboard::with_text("pasted")) as Arc<dyn Clipboard>,
        );

        let outcome = handler.invoke();
        assert_eq!(outcome, MenuOutcome::PastedFromClipboard("pasted".to_string()));
        assert_eq!(editor.pending_input(), "pasted");
    }

    #[test]
    fn clipboard_failure_is_silent() {
        let surface = RecordingSurface::new();
        let (handler, editor) = handler(surface, Arc::new(UnavailableClipboard));

        assert_eq!(handler.invoke(), MenuOutcome::ClipboardUnavailable);
        assert_eq!(editor.pending_input(), "");
    }

    #[test]
    fn copy_still_clears_selection_when_clipboard_is_unavailable() {
        let surface = RecordingSurface::with_selection("text");
        let (handler, _editor) = handler(surface.clone(), Arc::new(UnavailableClipboard));

        let outcome = handler.invoke();
        assert_eq!(outcome, MenuOutcome::CopiedSelection("text".to_string()));
        assert!(surface.selection.lock().unwrap().is_none());
    }
}
