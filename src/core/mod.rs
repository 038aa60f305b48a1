//! Core session machinery.
//!
//! - `lifecycle` - capability gating and the init/dispose state machine
//! - `session` - the controller and its prompt cycle
//! - `editor` - the line-editor addon
//! - `launch` - launch-target and initial-command derivation
//! - `addons` - capability bundle loading
//! - `cwd` - shared working-directory cell

pub mod addons;
pub mod cwd;
pub mod editor;
pub mod launch;
pub mod lifecycle;
pub mod session;

pub use cwd::{CwdHandle, CwdView};
pub use editor::LineEditor;
pub use lifecycle::{Capabilities, GateState};
pub use session::{Collaborators, Session};
