//! Error types for the Directory actor.

use thiserror::Error;

/// Errors that can occur during directory operations.
///
/// The three remote failures are never handed back to callers as `Err`: the
/// actor turns them into `PageState.error` plus a notification. Their `Display`
/// text is the fixed message the console shows.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DirectoryError {
    /// Listing a page failed.
    #[error("Failed to load users")]
    LoadFailure,

    /// Creating or updating a record failed.
    #[error("Failed to save user")]
    SaveFailure,

    /// Deleting a record failed.
    #[error("Failed to delete user")]
    DeleteFailure,

    /// Pages are numbered from 1.
    #[error("Invalid page number: {0}")]
    InvalidPage(u32),

    /// The actor's mailbox is closed.
    #[error("Actor closed")]
    ActorClosed,

    /// The actor dropped the reply channel.
    #[error("Actor dropped response channel")]
    ActorDropped,

    /// The actor task ended abnormally.
    #[error("Actor task failed: {0}")]
    ActorFailed(String),
}
