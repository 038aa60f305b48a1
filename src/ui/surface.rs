//! Display surface binding.
//!
//! The rendering widget is an opaque library to this crate; sessions only
//! need open/dispose/focus/selection/fit primitives plus a text sink. The
//! [`DisplaySurface`] trait is that boundary, and [`SurfaceFactory`]
//! constructs a widget from the fixed configuration profile once the
//! lifecycle gate decides all capabilities are present.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;

use crate::config::SurfaceProfile;

/// Container size in columns and rows.
pub type ContainerSize = (u16, u16);

#[derive(Error, Debug)]
pub enum SurfaceError {
    #[error("surface already opened into a container")]
    AlreadyOpen,

    #[error("surface construction failed: {0}")]
    Construct(String),
}

/// The opaque terminal display widget.
///
/// Implementations hold whatever rendering state they need behind `&self`;
/// all methods are called from the session's task and from the resize
/// coordinator, so interior mutability must be thread-safe.
///
/// `fit` must be cheap and idempotent: the resize coordinator calls it on
/// every observed container size change with no debouncing. `dispose` ends
/// the widget; any pending read on an attached line editor is abandoned
/// rather than cleaned up.
pub trait DisplaySurface: Send + Sync {
    /// Open the widget into its container region. At most once per session.
    fn open(&self) -> Result<(), SurfaceError>;

    /// Append text to the display.
    fn write(&self, text: &str);

    /// Give the widget input focus.
    fn focus(&self);

    /// Recompute rows/columns against the current container size.
    fn fit(&self);

    /// Current text selection, if non-empty.
    fn selection(&self) -> Option<String>;

    /// Drop the current selection.
    fn clear_selection(&self);

    /// Tear the widget down. Called at most once, and only if the widget
    /// was constructed.
    fn dispose(&self);
}

/// Constructs display surfaces from the fixed configuration profile.
pub trait SurfaceFactory: Send + Sync {
    fn create(&self, profile: &SurfaceProfile) -> Result<Arc<dyn DisplaySurface>, SurfaceError>;
}

/// The screen region the widget opens into.
///
/// Owned by the host; the session only styles it once at initialization and
/// subscribes to its size changes.
pub trait Container: Send + Sync {
    /// Mark the region scrollable and full-height. Called once, right after
    /// the widget opens into it.
    fn set_scrollable_full_height(&self);

    /// Size-change events for the resize coordinator.
    fn size_events(&self) -> watch::Receiver<ContainerSize>;
}

/// Recording surface used across the crate's tests.
#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct RecordingSurface {
        pub writes: Mutex<Vec<String>>,
        pub opened: AtomicBool,
        pub disposed: AtomicBool,
        pub focus_count: AtomicUsize,
        pub fit_count: AtomicUsize,
        pub selection: Mutex<Option<String>>,
    }

    impl RecordingSurface {
        pub fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        pub fn with_selection(text: &str) -> Arc<Self> {
            let surface = Self::new();
            *surface.selection.lock().unwrap() = Some(text.to_string());
            surface
        }

        pub fn written(&self) -> String {
            self.writes.lock().unwrap().join("")
        }
    }

    impl DisplaySurface for RecordingSurface {
        fn open(&self) -> Result<(), SurfaceError> {
            if self.opened.swap(true, Ordering::SeqCst) {
                return Err(SurfaceError::AlreadyOpen);
            }
            Ok(())
        }

        fn write(&self, text: &str) {
            self.writes.lock().unwrap().push(text.to_string());
        }

        fn focus(&self) {
            self.focus_count.fetch_add(1, Ordering::SeqCst);
        }

        fn fit(&self) {
            self.fit_count.fetch_add(1, Ordering::SeqCst);
        }

        fn selection(&self) -> Option<String> {
            self.selection.lock().unwrap().clone()
        }

        fn clear_selection(&self) {
            self.selection.lock().unwrap().take();
        }

        fn dispose(&self) {
            self.disposed.store(true, Ordering::SeqCst);
        }
    }

    /// Factory handing out clones of one recording surface so tests can
    /// inspect what the session did to it.
    pub struct RecordingFactory {
        pub surface: Arc<RecordingSurface>,
        pub create_count: AtomicUsize,
    }

    impl RecordingFactory {
        pub fn new() -> (Arc<Self>, Arc<RecordingSurface>) {
            let surface = RecordingSurface::new();
            (
                Arc::new(Self {
                    surface: surface.clone(),
                    create_count: AtomicUsize::new(0),
                }),
                surface,
            )
        }
    }

    impl SurfaceFactory for RecordingFactory {
        fn create(&self, _profile: &SurfaceProfile) -> Result<Arc<dyn DisplaySurface>, SurfaceError> {
            self.create_count.fetch_add(1, Ordering::SeqCst);
            Ok(self.surface.clone())
        }
    }

    /// Container with a controllable size channel.
    pub struct FakeContainer {
        pub size_tx: tokio::sync::watch::Sender<ContainerSize>,
        pub styled: AtomicUsize,
    }

    impl FakeContainer {
        pub fn new() -> Arc<Self> {
            let (size_tx, _) = tokio::sync::watch::channel((80, 24));
            Arc::new(Self {
                size_tx,
                styled: AtomicUsize::new(0),
            })
        }
    }

    impl Container for FakeContainer {
        fn set_scrollable_full_height(&self) {
            self.styled.fetch_add(1, Ordering::SeqCst);
        }

        fn size_events(&self) -> tokio::sync::watch::Receiver<ContainerSize> {
            self.size_tx.subscribe()
        }
    }
}
