//! Pure data structures shared by the controller, the remote resource and the console.

pub mod page;
pub mod record;

pub use page::*;
pub use record::*;
