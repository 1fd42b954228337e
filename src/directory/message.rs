//! # Directory Messages
//!
//! Requests the [`DirectoryClient`](crate::clients::DirectoryClient) sends to the
//! actor, and the resolutions spawned remote calls post back to it.

use crate::directory::DirectoryError;
use crate::model::{PageState, RecordDraft, RecordId, RecordPatch};
use crate::remote::{ListPage, RemoteError};
use tokio::sync::oneshot;

/// What one operation left behind.
///
/// `state.error` is the page banner and may still hold an earlier operation's
/// message; `failure` is set only when *this* operation's remote call failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub state: PageState,
    pub failure: Option<DirectoryError>,
}

/// One-shot reply sent once the operation completed.
pub type Response = oneshot::Sender<Result<Reply, DirectoryError>>;

/// Operations a caller can ask of the directory.
#[derive(Debug)]
pub enum DirectoryRequest {
    LoadPage {
        page: u32,
        respond_to: Response,
    },
    Create {
        draft: RecordDraft,
        respond_to: Response,
    },
    /// Update by id; a draft without an id is handled as a create.
    Update {
        draft: RecordDraft,
        respond_to: Response,
    },
    Delete {
        id: RecordId,
        respond_to: Response,
    },
}

/// Outcome of a remote call, applied by the actor in arrival order.
#[derive(Debug)]
pub(crate) enum Resolution {
    Page {
        seq: u64,
        page: u32,
        result: Result<ListPage, RemoteError>,
        respond_to: Option<Response>,
        /// Follow-up fetch of a create; the reply belongs to the create.
        refetch: bool,
    },
    Created {
        draft: RecordDraft,
        result: Result<RecordPatch, RemoteError>,
        respond_to: Response,
    },
    Updated {
        id: RecordId,
        draft: RecordDraft,
        result: Result<RecordPatch, RemoteError>,
        respond_to: Response,
    },
    Deleted {
        id: RecordId,
        result: Result<(), RemoteError>,
        respond_to: Response,
    },
}
