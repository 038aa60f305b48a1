//! Best-effort clipboard access.
//!
//! Clipboard support is a convenience, never a requirement: a platform
//! without one (or a denied permission) must not surface an error. The
//! trait therefore reports failure as an absent value, and the context-menu
//! handler folds that into an explicit, ignorable outcome variant.

use std::sync::Mutex;

/// System clipboard boundary.
pub trait Clipboard: Send + Sync {
    /// Read clipboard text, if a clipboard is available and holds text.
    fn read_text(&self) -> Option<String>;

    /// Write text to the clipboard. Returns whether the write took.
    fn write_text(&self, text: &str) -> bool;
}

/// Clipboard backed by the OS via `arboard`.
///
/// The `arboard` handle is created lazily and kept for the session's
/// lifetime; every failure is swallowed into `None`/`false`.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Mutex<Option<arboard::Clipboard>>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_clipboard<T>(&self, f: impl FnOnce(&mut arboard::Clipboard) -> Option<T>) -> Option<T> {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if guard.is_none() {
            match arboard::Clipboard::new() {
                Ok(clipboard) => *guard = Some(clipboard),
                Err(e) => {
                    tracing::debug!("clipboard unavailable: {e}");
                    return None;
                }
            }
        }
        guard.as_mut().and_then(f)
    }
}

impl Clipboard for SystemClipboard {
    fn read_text(&self) -> Option<String> {
        self.with_clipboard(|c| c.get_text().ok())
    }

    fn write_text(&self, text: &str) -> bool {
        self.with_clipboard(|c| c.set_text(text.to_string()).ok())
            .is_some()
    }
}

/// In-memory clipboard for tests and clipboard-less environments.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    text: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: &str) -> Self {
        Self {
            text: Mutex::new(Some(text.to_string())),
        }
    }
}

impl Clipboard for MemoryClipboard {
    fn read_text(&self) -> Option<String> {
        self.text.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn write_text(&self, text: &str) -> bool {
        *self.text.lock().unwrap_or_else(|e| e.into_inner()) = Some(text.to_string());
        true
    }
}

/// Clipboard that always fails, mirroring a denied permission.
#[derive(Debug, Default)]
pub struct UnavailableClipboard;

impl Clipboard for UnavailableClipboard {
    fn read_text(&self) -> Option<String> {
        None
    }

    fn write_text(&self, _text: &str) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_clipboard_roundtrip() {
        let clipboard = MemoryClipboard::new();
        assert_eq!(clipboard.read_text(), None);
        assert!(clipboard.write_text("hello"));
        assert_eq!(clipboard.read_text(), Some("hello".to_string()));
    }

    #[test]
    fn unavailable_clipboard_swallows_everything() {
        let clipboard = UnavailableClipboard;
        assert_eq!(clipboard.read_text(), None);
        assert!(!clipboard.write_text("hello"));
    }
}
