//! # User Directory
//!
//! > **A paginated CRUD console over a remote user collection.**
//!
//! The crate keeps one page of a REST collection in memory and keeps it consistent
//! with the server through page loads, creates, updates and deletes. The state has
//! a single owner, an actor, and everything else talks to it by message.
//!
//! ## Design
//!
//! ### One writer
//! [`DirectoryActor`](directory::DirectoryActor) owns the
//! [`PageState`](model::PageState). Handlers never await the network: remote calls
//! run as spawned tasks and post their outcome back to the actor, which applies it
//! and publishes a fresh snapshot. Readers only ever see whole snapshots.
//!
//! ### Out-of-order resolutions
//! Two page loads can resolve in either order. By default the last one to resolve
//! is what stays on screen; [`SupersedePolicy`](config::SupersedePolicy) can switch
//! this to "latest request wins".
//!
//! ### Optimistic create
//! A created record is shown immediately on top of the current page, then replaced
//! by a fetch of the last page.
//!
//! ### Errors
//! Remote failures are reported as fixed messages on the state (`Failed to load
//! users`, `Failed to save user`, `Failed to delete user`) and as notifications.
//! The previously displayed records are always kept.
//!
//! ## Module Tour
//!
//! - [`directory`]: the controller actor, its messages and errors
//! - [`clients`]: [`DirectoryClient`](clients::DirectoryClient), the typed front of the mailbox
//! - [`remote`]: the [`UserResource`](remote::UserResource) trait, its HTTP
//!   implementation and test doubles
//! - [`model`]: records, drafts, patches and the page state
//! - [`validation`]: editor field rules
//! - [`notify`]: success/failure notifications and the toast queue
//! - [`ui`]: table, pager, editor and the console loop
//! - [`config`]: flags, environment and `.env`
//! - [`lifecycle`]: [`DirectorySystem`](lifecycle::DirectorySystem) and tracing setup
//!
//! ## Running
//!
//! ```bash
//! RUST_LOG=info cargo run -- --page-size 5
//! ```

pub mod clients;
pub mod config;
pub mod directory;
pub mod lifecycle;
pub mod model;
pub mod notify;
pub mod remote;
pub mod ui;
pub mod validation;
