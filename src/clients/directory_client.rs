//! # Directory Client
//!
//! Provides a high-level API for interacting with the Directory actor.
//! Every method sends one request and resolves once the actor has applied its
//! outcome, handing back the page state at that point.

use crate::directory::message::{DirectoryRequest, Reply};
use crate::directory::DirectoryError;
use crate::model::{PageState, RecordDraft, RecordId};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, instrument};

/// Client for interacting with the Directory actor.
///
/// Remote failures do not come back as `Err`; they show up as
/// [`PageState::error`] on the returned state. `Err` means the actor itself is
/// unreachable.
#[derive(Clone)]
pub struct DirectoryClient {
    sender: mpsc::Sender<DirectoryRequest>,
    state: watch::Receiver<PageState>,
}

impl DirectoryClient {
    pub(crate) fn new(
        sender: mpsc::Sender<DirectoryRequest>,
        state: watch::Receiver<PageState>,
    ) -> Self {
        Self { sender, state }
    }

    async fn request(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<Reply, DirectoryError>>) -> DirectoryRequest,
    ) -> Result<Reply, DirectoryError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| DirectoryError::ActorClosed)?;
        response.await.map_err(|_| DirectoryError::ActorDropped)?
    }

    /// Fetches `page` (1-based) and makes it the displayed page.
    #[instrument(skip(self))]
    pub async fn load_page(&self, page: u32) -> Result<PageState, DirectoryError> {
        if page == 0 {
            return Err(DirectoryError::InvalidPage(page));
        }
        debug!("Sending request");
        self.request(|respond_to| DirectoryRequest::LoadPage { page, respond_to })
            .await
            .map(|reply| reply.state)
    }

    /// Creates a record. Resolves after the follow-up fetch of the last page.
    ///
    /// The draft is expected to have passed [`validate`](crate::validation::validate).
    #[instrument(skip(self))]
    pub async fn create_record(&self, draft: RecordDraft) -> Result<PageState, DirectoryError> {
        debug!("Sending request");
        self.request(|respond_to| DirectoryRequest::Create { draft, respond_to })
            .await
            .map(|reply| reply.state)
    }

    /// Updates the record with the draft's id.
    #[instrument(skip(self))]
    pub async fn update_record(&self, draft: RecordDraft) -> Result<PageState, DirectoryError> {
        debug!("Sending request");
        self.request(|respond_to| DirectoryRequest::Update { draft, respond_to })
            .await
            .map(|reply| reply.state)
    }

    #[instrument(skip(self))]
    pub async fn delete_record(&self, id: RecordId) -> Result<PageState, DirectoryError> {
        debug!("Sending request");
        self.request(|respond_to| DirectoryRequest::Delete { id, respond_to })
            .await
            .map(|reply| reply.state)
    }

    /// Editor entry point: update when the draft has an id, create otherwise.
    ///
    /// [`Reply::failure`] is `Some(SaveFailure)` only when the write itself
    /// failed. A create whose follow-up page fetch fails still counts as saved.
    #[instrument(skip(self))]
    pub async fn save(&self, draft: RecordDraft) -> Result<Reply, DirectoryError> {
        debug!("Sending request");
        match draft.existing_id() {
            Some(_) => {
                self.request(|respond_to| DirectoryRequest::Update { draft, respond_to })
                    .await
            }
            None => {
                self.request(|respond_to| DirectoryRequest::Create { draft, respond_to })
                    .await
            }
        }
    }

    /// The most recently published state.
    pub fn snapshot(&self) -> PageState {
        self.state.borrow().clone()
    }

    /// A receiver that wakes on every published state.
    pub fn subscribe(&self) -> watch::Receiver<PageState> {
        self.state.clone()
    }
}
