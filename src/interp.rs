//! Command interpreter collaborator interface.
//!
//! The prompt cycle hands every completed input line to an interpreter and
//! waits for it to settle. Grammar and built-in commands are the
//! interpreter's business; the session only cares that `execute` always
//! returns. The interpreter receives a [`CwdHandle`](crate::core::CwdHandle)
//! at wiring time and is the sole writer of the working directory.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InterpreterError {
    #[error("command failed: {0}")]
    Command(String),

    #[error("interpreter unavailable")]
    Unavailable,
}

/// Executes one line of input.
///
/// `execute` must always settle, success or failure; the prompt cycle
/// continues either way. User-visible error output is the interpreter's
/// responsibility (it owns the display for the duration of the call), the
/// returned error is only logged.
#[async_trait]
pub trait CommandInterpreter: Send + Sync {
    async fn execute(&self, line: &str) -> Result<(), InterpreterError>;
}
