//! termsurf - an async terminal session controller.
//!
//! termsurf owns the lifecycle of an interactive command-shell surface:
//! it binds an opaque display widget to a screen region, loads the
//! line-editor and auto-fit addons, runs an asynchronous read-evaluate
//! loop against a pluggable command interpreter, and tears the session
//! down cleanly when its owner closes it.
//!
//! # Architecture
//!
//! - **Lifecycle gate**: initialization runs exactly once, when the widget
//!   module, container, line-editor and resize capabilities are all
//!   present at the same time; disposal runs exactly once, and only if a
//!   widget was actually constructed.
//! - **Prompt cycle**: render `{user}@{host}:{cwd}$ `, suspend on a line
//!   of input, suspend on the interpreter, repeat. Strictly alternating,
//!   never terminated except by teardown.
//! - **Collaborators**: the command interpreter, filesystem, process
//!   table, clipboard, display widget and container are all traits; the
//!   session only owns the wiring between them.
//!
//! The `termsurf` binary wires a stdout-backed surface and a tiny builtin
//! interpreter to the controller as a working demonstration.

pub mod config;
pub mod core;
pub mod history;
pub mod interp;
pub mod proc;
pub mod ui;
pub mod vfs;

pub use config::Config;
pub use crate::core::{
    Capabilities, Collaborators, CwdHandle, CwdView, GateState, LineEditor, Session,
};
pub use interp::CommandInterpreter;
pub use proc::{InMemoryProcessTable, ProcessTable, SessionId, SessionRecord};
pub use ui::{Clipboard, Container, DisplaySurface, MenuOutcome, SurfaceFactory};
pub use vfs::Filesystem;
