//! Runtime orchestration and lifecycle management.
//!
//! - [`DirectorySystem`] - starts the Directory actor, wires its remote resource and
//!   notification channel, and shuts it down
//! - [`setup_tracing`] - initializes the tracing/logging infrastructure

pub mod directory_system;
pub mod tracing;

pub use self::directory_system::*;
pub use self::tracing::*;
