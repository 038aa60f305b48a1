//! Display-facing pieces.
//!
//! - `surface` - the opaque display widget boundary and its container
//! - `clipboard` - best-effort clipboard access
//! - `context_menu` - copy/paste on the context-menu gesture
//! - `resize` - container-size observation and surface refitting

pub mod clipboard;
pub mod context_menu;
pub mod resize;
pub mod surface;

pub use clipboard::{Clipboard, SystemClipboard};
pub use context_menu::{ContextMenuHandler, MenuOutcome};
pub use resize::ResizeCoordinator;
pub use surface::{Container, ContainerSize, DisplaySurface, SurfaceFactory};
