//! Terminal presentation.
//!
//! - [`table`] - the current page as text columns, with row actions
//! - [`pager`] - page indicators and page selection
//! - [`editor`] - the add/edit form with inline validation
//! - [`console`] - the command loop that ties them to a [`DirectoryClient`](crate::clients::DirectoryClient)
//!
//! Only the console talks to the controller. The other three are plain views over
//! a [`PageState`](crate::model::PageState) or a single record.

pub mod console;
pub mod editor;
pub mod pager;
pub mod table;

pub use console::{Command, Console, ConsoleError};
pub use editor::{EditorField, EditorMode, RecordEditor};
pub use pager::Pager;
pub use table::{RecordTable, TableAction, BUSY_INDICATOR};
