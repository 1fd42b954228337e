//! # Directory Actor
//!
//! The controller that owns [`PageState`]. It is the only writer of that state and
//! the only caller of the remote resource.
//!
//! ## Concurrency Model
//!
//! Requests arrive on the mailbox and are handled one at a time. A handler never
//! awaits the network itself: it marks the state as loading, spawns the remote
//! call and moves on, so a delete can be handled while a page fetch is still in
//! flight. Each spawned call posts a [`Resolution`] back on a private channel and
//! the actor applies it when it arrives. Resolutions are therefore applied in the
//! order they *resolve*, not the order they were requested.
//!
//! Every change is published on a `watch` channel as a full snapshot; one snapshot
//! is one render frame for the console.
//!
//! ## Optimistic Create
//!
//! A successful create is shown in two phases. First the synthesized record is
//! published as `PageState.overlay` on top of the last authoritative page. Then a
//! fetch of the (new) last page is issued; whenever that fetch resolves, success or
//! failure, the overlay is cleared and the fetched page stands on its own.

use crate::config::{DirectoryConfig, SupersedePolicy};
use crate::directory::message::{DirectoryRequest, Reply, Resolution, Response};
use crate::directory::DirectoryError;
use crate::model::{total_pages, PageState, RecordDraft, RecordId, RecordPatch};
use crate::notify::Notifier;
use crate::remote::{ListPage, RemoteError, UserResource};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

/// The actor behind [`DirectoryClient`](crate::clients::DirectoryClient).
pub struct DirectoryActor {
    receiver: mpsc::Receiver<DirectoryRequest>,
    resolved_tx: mpsc::UnboundedSender<Resolution>,
    resolved_rx: mpsc::UnboundedReceiver<Resolution>,
    state: PageState,
    publisher: watch::Sender<PageState>,
    resource: Arc<dyn UserResource>,
    notifier: Notifier,
    policy: SupersedePolicy,
    default_total: u64,
    /// Sequence number of the most recently issued page fetch.
    latest_seq: u64,
    /// Fetch whose resolution retires the optimistic overlay.
    overlay_seq: Option<u64>,
    in_flight: usize,
}

impl DirectoryActor {
    pub(crate) fn new(
        config: &DirectoryConfig,
        receiver: mpsc::Receiver<DirectoryRequest>,
        publisher: watch::Sender<PageState>,
        resource: Arc<dyn UserResource>,
        notifier: Notifier,
    ) -> Self {
        let (resolved_tx, resolved_rx) = mpsc::unbounded_channel();
        Self {
            receiver,
            resolved_tx,
            resolved_rx,
            state: PageState::new(config.page_size),
            publisher,
            resource,
            notifier,
            policy: config.supersede,
            default_total: config.default_total,
            latest_seq: 0,
            overlay_seq: None,
            in_flight: 0,
        }
    }

    /// Runs the event loop until every client is dropped and no remote call is
    /// still outstanding.
    pub async fn run(mut self) {
        info!(page_size = self.state.page_size, policy = ?self.policy, "Directory started");
        let mut mailbox_open = true;

        loop {
            tokio::select! {
                Some(resolution) = self.resolved_rx.recv() => self.apply(resolution),
                request = self.receiver.recv(), if mailbox_open => match request {
                    Some(request) => self.handle(request),
                    None => mailbox_open = false,
                },
            }
            if !mailbox_open && self.in_flight == 0 {
                break;
            }
        }

        info!(
            records = self.state.records.len(),
            page = self.state.current_page,
            total_pages = self.state.total_pages,
            "Shutdown"
        );
    }

    // =========================================================================
    // Requests
    // =========================================================================

    fn handle(&mut self, request: DirectoryRequest) {
        match request {
            DirectoryRequest::LoadPage { page, respond_to } => {
                debug!(page, "LoadPage");
                self.start_load(page, Some(respond_to), false);
            }
            DirectoryRequest::Create { draft, respond_to } => {
                debug!(?draft, "Create");
                self.start_create(draft, respond_to);
            }
            DirectoryRequest::Update { draft, respond_to } => {
                let Some(id) = draft.existing_id().cloned() else {
                    debug!(?draft, "Update without id, creating instead");
                    self.start_create(draft, respond_to);
                    return;
                };
                debug!(%id, ?draft, "Update");
                let resource = self.resource.clone();
                let call_draft = draft.clone();
                let call_id = id.clone();
                self.spawn_remote(
                    async move { resource.update(call_id, call_draft).await },
                    move |result| Resolution::Updated {
                        id,
                        draft,
                        result,
                        respond_to,
                    },
                );
            }
            DirectoryRequest::Delete { id, respond_to } => {
                debug!(%id, "Delete");
                let resource = self.resource.clone();
                let call_id = id.clone();
                self.spawn_remote(
                    async move { resource.delete(call_id).await },
                    move |result| Resolution::Deleted {
                        id,
                        result,
                        respond_to,
                    },
                );
            }
        }
    }

    fn start_load(&mut self, page: u32, respond_to: Option<Response>, refetch: bool) -> u64 {
        self.latest_seq += 1;
        let seq = self.latest_seq;
        self.state.error = None;

        let resource = self.resource.clone();
        let limit = self.state.page_size;
        self.spawn_remote(
            async move { resource.list(page, limit).await },
            move |result| Resolution::Page {
                seq,
                page,
                result,
                respond_to,
                refetch,
            },
        );
        seq
    }

    fn start_create(&mut self, draft: RecordDraft, respond_to: Response) {
        let resource = self.resource.clone();
        let call_draft = draft.clone();
        self.spawn_remote(
            async move { resource.create(call_draft).await },
            move |result| Resolution::Created {
                draft,
                result,
                respond_to,
            },
        );
    }

    /// Runs a remote call off the actor's task and routes its outcome back here.
    fn spawn_remote<T, F>(
        &mut self,
        call: F,
        resolve: impl FnOnce(Result<T, RemoteError>) -> Resolution + Send + 'static,
    ) where
        T: Send + 'static,
        F: Future<Output = Result<T, RemoteError>> + Send + 'static,
    {
        self.in_flight += 1;
        self.state.loading = true;
        self.publish();

        let resolved_tx = self.resolved_tx.clone();
        tokio::spawn(async move {
            let result = call.await;
            let _ = resolved_tx.send(resolve(result));
        });
    }

    // =========================================================================
    // Resolutions
    // =========================================================================

    fn apply(&mut self, resolution: Resolution) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.state.loading = self.in_flight > 0;

        match resolution {
            Resolution::Page {
                seq,
                page,
                result,
                respond_to,
                refetch,
            } => {
                let failure = self.apply_page(seq, page, result);
                self.publish();
                // The create already succeeded; a failed refetch is only a load problem.
                let failure = if refetch { None } else { failure };
                reply(respond_to, &self.state, failure);
            }
            Resolution::Created {
                draft,
                result,
                respond_to,
            } => self.apply_created(draft, result, respond_to),
            Resolution::Updated {
                id,
                draft,
                result,
                respond_to,
            } => {
                let failure = self.apply_updated(&id, draft, result);
                self.publish();
                reply(Some(respond_to), &self.state, failure);
            }
            Resolution::Deleted {
                id,
                result,
                respond_to,
            } => {
                let failure = self.apply_deleted(&id, result);
                self.publish();
                reply(Some(respond_to), &self.state, failure);
            }
        }
    }

    fn apply_page(
        &mut self,
        seq: u64,
        page: u32,
        result: Result<ListPage, RemoteError>,
    ) -> Option<DirectoryError> {
        if self.overlay_seq.is_some_and(|overlay_seq| seq >= overlay_seq) {
            self.state.overlay = None;
            self.overlay_seq = None;
        }

        if self.policy == SupersedePolicy::LatestRequestWins && seq != self.latest_seq {
            debug!(seq, page, latest = self.latest_seq, "Discarded superseded page");
            return None;
        }

        match result {
            Ok(listed) => {
                let page_size = self.state.page_size;
                let mut records = listed.records;
                if records.len() > page_size {
                    warn!(received = records.len(), page_size, "Page larger than page size, truncating");
                    records.truncate(page_size);
                }
                let total_count = listed.total_count.unwrap_or(self.default_total);

                self.state.records = records;
                self.state.total_pages = total_pages(total_count, page_size);
                self.state.current_page = page.min(self.state.last_page());
                if self.state.current_page != page {
                    warn!(page, last_page = self.state.last_page(), "Requested page beyond last page");
                }
                info!(
                    page = self.state.current_page,
                    records = self.state.records.len(),
                    total_pages = self.state.total_pages,
                    "Page loaded"
                );
                None
            }
            Err(e) => {
                warn!(page, error = %e, "Load failed");
                Some(self.fail(DirectoryError::LoadFailure))
            }
        }
    }

    fn apply_created(
        &mut self,
        draft: RecordDraft,
        result: Result<RecordPatch, RemoteError>,
        respond_to: Response,
    ) {
        let patch = match result {
            Ok(patch) => patch,
            Err(e) => {
                warn!(error = %e, "Create failed");
                let failure = self.fail(DirectoryError::SaveFailure);
                self.publish();
                reply(Some(respond_to), &self.state, Some(failure));
                return;
            }
        };

        let mut record = draft.to_record();
        record.id = None;
        record.merge(patch);
        if record.id.is_none() {
            record.id = Some(RecordId::placeholder());
        }
        if let Some(id) = &record.id {
            info!(%id, "Created");
        }

        let visible = self.state.visible_records().len() as u64;
        let last_page = total_pages(visible + 1, self.state.page_size);
        self.state.total_pages = last_page;
        self.state.current_page = last_page.max(1);
        self.state.overlay = Some(record);
        self.notifier.success("User added successfully!");
        self.publish();

        let page = self.state.current_page;
        let seq = self.start_load(page, Some(respond_to), true);
        self.overlay_seq = Some(seq);
    }

    fn apply_updated(
        &mut self,
        id: &RecordId,
        draft: RecordDraft,
        result: Result<RecordPatch, RemoteError>,
    ) -> Option<DirectoryError> {
        let patch = match result {
            Ok(patch) => patch,
            Err(e) => {
                warn!(%id, error = %e, "Update failed");
                return Some(self.fail(DirectoryError::SaveFailure));
            }
        };

        let submitted = draft.to_record();
        let targets = self
            .state
            .records
            .iter_mut()
            .chain(self.state.overlay.as_mut())
            .filter(|record| record.has_id(id));
        let mut matched = 0;
        for record in targets {
            record.merge(RecordPatch {
                id: None,
                name: Some(submitted.name.clone()),
                email: Some(submitted.email.clone()),
                department: Some(submitted.department.clone()),
            });
            record.merge(patch.clone());
            matched += 1;
        }

        if matched == 0 {
            debug!(%id, "Updated record is not on this page");
        }
        info!(%id, "Updated");
        self.notifier.success("User updated successfully!");
        None
    }

    fn apply_deleted(&mut self, id: &RecordId, result: Result<(), RemoteError>) -> Option<DirectoryError> {
        if let Err(e) = result {
            warn!(%id, error = %e, "Delete failed");
            return Some(self.fail(DirectoryError::DeleteFailure));
        }

        self.state.records.retain(|record| !record.has_id(id));
        if self.state.overlay.as_ref().is_some_and(|record| record.has_id(id)) {
            self.state.overlay = None;
        }
        info!(%id, remaining = self.state.records.len(), "Deleted");
        self.notifier.success("User deleted successfully!");
        None
    }

    /// Raises the banner and the notification for `error`, handing it back for the reply.
    fn fail(&mut self, error: DirectoryError) -> DirectoryError {
        let message = error.to_string();
        self.notifier.error(message.clone());
        self.state.error = Some(message);
        error
    }

    fn publish(&self) {
        self.publisher.send_replace(self.state.clone());
    }
}

fn reply(respond_to: Option<Response>, state: &PageState, failure: Option<DirectoryError>) {
    if let Some(respond_to) = respond_to {
        let _ = respond_to.send(Ok(Reply {
            state: state.clone(),
            failure,
        }));
    }
}
