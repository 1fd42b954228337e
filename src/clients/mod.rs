//! Type-safe wrappers around the actor mailboxes.

pub mod directory_client;

pub use directory_client::*;
