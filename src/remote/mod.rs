//! # Remote User Resource
//!
//! The REST collection the directory mirrors. The controller only ever talks to it
//! through the [`UserResource`] trait, which keeps the HTTP implementation
//! ([`HttpUserResource`]) and the in-memory doubles in [`mock`] interchangeable.
//!
//! Every call is a plain request/response. Any non-success status, transport
//! failure or undecodable body comes back as a [`RemoteError`]; the controller does
//! not look any deeper than "the call failed".

pub mod http;
pub mod mock;
pub mod wire;

pub use http::HttpUserResource;

use crate::model::{Record, RecordDraft, RecordId, RecordPatch};
use async_trait::async_trait;

/// One page of records plus the collection size, when the resource reported it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListPage {
    pub records: Vec<Record>,
    pub total_count: Option<u64>,
}

/// Errors surfaced by a remote call.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },
    #[error("Malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Invalid resource url: {0}")]
    InvalidUrl(String),
    #[error("Resource unavailable: {0}")]
    Unavailable(String),
}

/// CRUD contract of the remote user collection.
///
/// Arguments are owned so implementations can move them into spawned work or
/// across channels.
#[async_trait]
pub trait UserResource: Send + Sync + 'static {
    /// Fetches `limit` records of the 1-based `page`.
    async fn list(&self, page: u32, limit: usize) -> Result<ListPage, RemoteError>;

    /// Stores a new record. The echo may be partial.
    async fn create(&self, draft: RecordDraft) -> Result<RecordPatch, RemoteError>;

    /// Replaces the record with `id`. The echo may be partial.
    async fn update(&self, id: RecordId, draft: RecordDraft) -> Result<RecordPatch, RemoteError>;

    async fn delete(&self, id: RecordId) -> Result<(), RemoteError>;
}
