//! Lifecycle gate for session initialization and teardown.
//!
//! Initialization must run exactly once per mounted session, and only when
//! every required capability is present at the same time. Teardown must run
//! exactly once, and only if a widget was actually constructed. Rather than
//! ad hoc conditionals, both invariants hang off a small state machine with
//! a pure transition function that is re-evaluated on every relevant event.

use bitflags::bitflags;

bitflags! {
    /// Capabilities that must all be present before initialization runs.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Capabilities: u8 {
        /// Display widget module is available.
        const WIDGET = 0b0001;
        /// Container region is mounted and ready.
        const CONTAINER = 0b0010;
        /// Line-editor addon module is available.
        const LINE_EDITOR = 0b0100;
        /// Resize addon module is available.
        const RESIZE = 0b1000;
    }
}

/// Gate states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Waiting for capabilities; nothing constructed.
    Idle,
    /// All capabilities present; initialization has been dispatched.
    Ready,
    /// Initialization sequence completed; widget exists.
    Initialized,
    /// Widget disposed (or session closed before construction). Terminal.
    Disposed,
}

/// Action the controller must perform after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateAction {
    /// Nothing to do.
    None,
    /// Run the one-shot initialization sequence.
    Initialize,
    /// Dispose the constructed widget.
    Dispose,
}

/// Evaluate one lifecycle event.
///
/// Pure function over (state, capabilities, closing flag). Re-evaluating
/// with unchanged inputs always yields `GateAction::None`, which is what
/// makes the gate safe against re-entrant event delivery:
///
/// - `Idle` with all capabilities set moves to `Ready` and requests
///   initialization, exactly once.
/// - A closing session disposes only from `Ready`/`Initialized`; closing
///   from `Idle` reaches `Disposed` without any action, since no widget
///   was ever constructed.
/// - `Disposed` is terminal.
pub fn transition(state: GateState, caps: Capabilities, closing: bool) -> (GateState, GateAction) {
    match state {
        GateState::Idle => {
            if closing {
                (GateState::Disposed, GateAction::None)
            } else if caps.is_all() {
                (GateState::Ready, GateAction::Initialize)
            } else {
                (GateState::Idle, GateAction::None)
            }
        }
        GateState::Ready | GateState::Initialized => {
            if closing {
                (GateState::Disposed, GateAction::Dispose)
            } else {
                (state, GateAction::None)
            }
        }
        GateState::Disposed => (GateState::Disposed, GateAction::None),
    }
}
