//! # Directory Controller
//!
//! The actor that keeps one page of the remote user collection in memory and
//! reconciles it after every create, update and delete.
//!
//! ## Structure
//!
//! - [`actor`] - [`DirectoryActor`], the event loop owning [`PageState`](crate::model::PageState)
//! - [`message`] - requests from clients and resolutions from remote calls
//! - [`error`] - [`DirectoryError`], including the fixed user-facing failure messages
//! - [`new()`] - factory that creates the actor and its client
//!
//! ## Usage
//!
//! ```rust,ignore
//! let (actor, client) = directory::new(&config, resource, notifier);
//! tokio::spawn(actor.run());
//!
//! let state = client.load_page(1).await?;
//! println!("{} of {} pages", state.current_page, state.total_pages);
//! ```
//!
//! ## Operation Summary
//!
//! | Operation | Success | Failure |
//! |-----------|---------|---------|
//! | load page | records replaced, page count recomputed | `error` set, records kept |
//! | create | optimistic record shown, last page refetched | `error` set, records kept |
//! | update | matching record merged in place | `error` set, records kept |
//! | delete | matching record removed, page count kept | `error` set, records kept |

pub mod actor;
pub mod error;
pub mod message;

pub use actor::DirectoryActor;
pub use error::*;
pub use message::{DirectoryRequest, Reply};

use crate::clients::DirectoryClient;
use crate::config::DirectoryConfig;
use crate::model::PageState;
use crate::notify::Notifier;
use crate::remote::UserResource;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

/// Creates a new Directory actor and its client.
pub fn new(
    config: &DirectoryConfig,
    resource: Arc<dyn UserResource>,
    notifier: Notifier,
) -> (DirectoryActor, DirectoryClient) {
    let (sender, receiver) = mpsc::channel(32);
    let (publisher, state) = watch::channel(PageState::new(config.page_size));

    let actor = DirectoryActor::new(config, receiver, publisher, resource, notifier);
    let client = DirectoryClient::new(sender, state);

    (actor, client)
}
