//! Filesystem collaborator interface.
//!
//! The session never walks a filesystem itself; it asks this collaborator
//! for directory listings to seed autocomplete. The implementation behind
//! the trait (virtual, local, remote) is entirely out of scope here.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VfsError {
    #[error("no such directory: {0}")]
    NotFound(String),

    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),
}

/// Directory-listing capability shared by all sessions.
///
/// Implementations must be safe for concurrent use from multiple sessions.
#[async_trait]
pub trait Filesystem: Send + Sync {
    /// List the entry names of a directory.
    async fn list_directory(&self, path: &str) -> Result<Vec<String>, VfsError>;
}
