//! # Mock Remote Resource
//!
//! In-memory doubles for [`UserResource`] so the controller can be tested without
//! a network.
//!
//! | Double | Use it when |
//! |--------|-------------|
//! | [`MockResource`] | Replies can be scripted up front (`expect_list().return_ok(..)`) |
//! | [`create_mock_resource`] | The test must decide *when* each call resolves |
//!
//! The second form hands each request to the test together with its reply
//! channel. Holding two list replies and answering them in reverse order is how
//! the superseded-fetch tests reproduce a slow first page.
//!
//! ```rust,ignore
//! let (resource, mut requests) = create_mock_resource();
//! let system = DirectorySystem::with_resource(config, Arc::new(resource));
//!
//! let pending = tokio::spawn(async move { client.load_page(1).await });
//! let (page, limit, respond_to) = expect_list(&mut requests).await.unwrap();
//! respond_to.send(Ok(ListPage::default())).unwrap();
//! ```

use crate::model::{RecordDraft, RecordId, RecordPatch};
use crate::remote::{ListPage, RemoteError, UserResource};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{mpsc, oneshot};

/// Reply channel handed to the test for one intercepted call.
pub type Responder<T> = oneshot::Sender<Result<T, RemoteError>>;

/// A call intercepted by [`ChannelResource`].
#[derive(Debug)]
pub enum RemoteRequest {
    List {
        page: u32,
        limit: usize,
        respond_to: Responder<ListPage>,
    },
    Create {
        draft: RecordDraft,
        respond_to: Responder<RecordPatch>,
    },
    Update {
        id: RecordId,
        draft: RecordDraft,
        respond_to: Responder<RecordPatch>,
    },
    Delete {
        id: RecordId,
        respond_to: Responder<()>,
    },
}

/// [`UserResource`] that forwards every call over a channel and waits for the
/// other end to answer it.
#[derive(Debug, Clone)]
pub struct ChannelResource {
    sender: mpsc::UnboundedSender<RemoteRequest>,
}

impl ChannelResource {
    async fn call<T>(
        &self,
        build: impl FnOnce(Responder<T>) -> RemoteRequest,
    ) -> Result<T, RemoteError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .map_err(|_| RemoteError::Unavailable("mock receiver dropped".into()))?;
        response
            .await
            .map_err(|_| RemoteError::Unavailable("mock reply dropped".into()))?
    }
}

#[async_trait]
impl UserResource for ChannelResource {
    async fn list(&self, page: u32, limit: usize) -> Result<ListPage, RemoteError> {
        self.call(|respond_to| RemoteRequest::List {
            page,
            limit,
            respond_to,
        })
        .await
    }

    async fn create(&self, draft: RecordDraft) -> Result<RecordPatch, RemoteError> {
        self.call(|respond_to| RemoteRequest::Create { draft, respond_to })
            .await
    }

    async fn update(&self, id: RecordId, draft: RecordDraft) -> Result<RecordPatch, RemoteError> {
        self.call(|respond_to| RemoteRequest::Update {
            id,
            draft,
            respond_to,
        })
        .await
    }

    async fn delete(&self, id: RecordId) -> Result<(), RemoteError> {
        self.call(|respond_to| RemoteRequest::Delete { id, respond_to })
            .await
    }
}

/// Creates a channel-backed resource and the receiver the test answers from.
pub fn create_mock_resource() -> (ChannelResource, mpsc::UnboundedReceiver<RemoteRequest>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (ChannelResource { sender }, receiver)
}

/// Waits for the next request and returns it if it is a list call.
pub async fn expect_list(
    receiver: &mut mpsc::UnboundedReceiver<RemoteRequest>,
) -> Option<(u32, usize, Responder<ListPage>)> {
    match receiver.recv().await {
        Some(RemoteRequest::List {
            page,
            limit,
            respond_to,
        }) => Some((page, limit, respond_to)),
        _ => None,
    }
}

/// Waits for the next request and returns it if it is a create call.
pub async fn expect_create(
    receiver: &mut mpsc::UnboundedReceiver<RemoteRequest>,
) -> Option<(RecordDraft, Responder<RecordPatch>)> {
    match receiver.recv().await {
        Some(RemoteRequest::Create { draft, respond_to }) => Some((draft, respond_to)),
        _ => None,
    }
}

/// Waits for the next request and returns it if it is an update call.
pub async fn expect_update(
    receiver: &mut mpsc::UnboundedReceiver<RemoteRequest>,
) -> Option<(RecordId, RecordDraft, Responder<RecordPatch>)> {
    match receiver.recv().await {
        Some(RemoteRequest::Update {
            id,
            draft,
            respond_to,
        }) => Some((id, draft, respond_to)),
        _ => None,
    }
}

/// Waits for the next request and returns it if it is a delete call.
pub async fn expect_delete(
    receiver: &mut mpsc::UnboundedReceiver<RemoteRequest>,
) -> Option<(RecordId, Responder<()>)> {
    match receiver.recv().await {
        Some(RemoteRequest::Delete { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

enum Expectation {
    List {
        page: Option<u32>,
        response: Result<ListPage, RemoteError>,
    },
    Create {
        response: Result<RecordPatch, RemoteError>,
    },
    Update {
        id: RecordId,
        response: Result<RecordPatch, RemoteError>,
    },
    Delete {
        id: RecordId,
        response: Result<(), RemoteError>,
    },
}

impl Expectation {
    fn accepts(&self, request: &RemoteRequest) -> bool {
        matches!(
            (self, request),
            (Expectation::List { .. }, RemoteRequest::List { .. })
                | (Expectation::Create { .. }, RemoteRequest::Create { .. })
                | (Expectation::Update { .. }, RemoteRequest::Update { .. })
                | (Expectation::Delete { .. }, RemoteRequest::Delete { .. })
        )
    }
}

type Expectations = Arc<Mutex<VecDeque<Expectation>>>;

/// Scripted resource that answers calls from a queue of expectations.
///
/// # Example
/// ```rust,ignore
/// let mut mock = MockResource::new();
/// mock.expect_list(Some(1)).return_ok(ListPage { records, total_count: Some(10) });
/// mock.expect_delete(RecordId::from(3)).return_ok(());
///
/// let system = DirectorySystem::with_resource(config, mock.resource());
/// // drive the controller...
/// mock.verify();
/// ```
///
/// A call that does not match the head of the queue is answered with
/// [`RemoteError::Unavailable`] and recorded; [`verify`](Self::verify) reports it.
pub struct MockResource {
    resource: ChannelResource,
    expectations: Expectations,
    mismatches: Arc<Mutex<Vec<String>>>,
    _handle: tokio::task::JoinHandle<()>,
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockResource {
    /// Creates a mock with no expectations. Must be called inside a Tokio runtime.
    pub fn new() -> Self {
        let (resource, mut receiver) = create_mock_resource();
        let expectations: Expectations = Arc::new(Mutex::new(VecDeque::new()));
        let mismatches = Arc::new(Mutex::new(Vec::new()));
        let queue = expectations.clone();
        let errors = mismatches.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                // An expectation of another kind stays queued so `verify` still sees it.
                let expectation = {
                    let mut queue = lock(&queue);
                    if queue.front().is_some_and(|next| next.accepts(&request)) {
                        queue.pop_front()
                    } else {
                        None
                    }
                };
                let mismatch = |what: String| {
                    lock(&errors).push(what.clone());
                    RemoteError::Unavailable(what)
                };

                match (request, expectation) {
                    (
                        RemoteRequest::List {
                            page, respond_to, ..
                        },
                        Some(Expectation::List {
                            page: expected,
                            response,
                        }),
                    ) => {
                        let reply = match expected {
                            Some(want) if want != page => {
                                Err(mismatch(format!("list page {page}, expected {want}")))
                            }
                            _ => response,
                        };
                        let _ = respond_to.send(reply);
                    }
                    (RemoteRequest::Create { respond_to, .. }, Some(Expectation::Create { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        RemoteRequest::Update { id, respond_to, .. },
                        Some(Expectation::Update {
                            id: expected,
                            response,
                        }),
                    ) => {
                        let reply = if id == expected {
                            response
                        } else {
                            Err(mismatch(format!("update {id}, expected {expected}")))
                        };
                        let _ = respond_to.send(reply);
                    }
                    (
                        RemoteRequest::Delete { id, respond_to },
                        Some(Expectation::Delete {
                            id: expected,
                            response,
                        }),
                    ) => {
                        let reply = if id == expected {
                            response
                        } else {
                            Err(mismatch(format!("delete {id}, expected {expected}")))
                        };
                        let _ = respond_to.send(reply);
                    }
                    (request, _) => {
                        let error = mismatch(format!("unexpected request {request:?}"));
                        match request {
                            RemoteRequest::List { respond_to, .. } => {
                                let _ = respond_to.send(Err(error));
                            }
                            RemoteRequest::Create { respond_to, .. }
                            | RemoteRequest::Update { respond_to, .. } => {
                                let _ = respond_to.send(Err(error));
                            }
                            RemoteRequest::Delete { respond_to, .. } => {
                                let _ = respond_to.send(Err(error));
                            }
                        }
                    }
                }
            }
        });

        Self {
            resource,
            expectations,
            mismatches,
            _handle: handle,
        }
    }

    /// Returns the resource to hand to the controller.
    pub fn resource(&self) -> Arc<dyn UserResource> {
        Arc::new(self.resource.clone())
    }

    /// Expects a list call, optionally for a specific page.
    pub fn expect_list(&mut self, page: Option<u32>) -> ExpectationBuilder<ListPage> {
        ExpectationBuilder::new(self.expectations.clone(), move |response| {
            Expectation::List { page, response }
        })
    }

    pub fn expect_create(&mut self) -> ExpectationBuilder<RecordPatch> {
        ExpectationBuilder::new(self.expectations.clone(), |response| {
            Expectation::Create { response }
        })
    }

    pub fn expect_update(&mut self, id: RecordId) -> ExpectationBuilder<RecordPatch> {
        ExpectationBuilder::new(self.expectations.clone(), move |response| {
            Expectation::Update { id, response }
        })
    }

    pub fn expect_delete(&mut self, id: RecordId) -> ExpectationBuilder<()> {
        ExpectationBuilder::new(self.expectations.clone(), move |response| {
            Expectation::Delete { id, response }
        })
    }

    /// Panics if an expectation is left over or a call did not match.
    pub fn verify(&self) {
        let mismatches = lock(&self.mismatches);
        if !mismatches.is_empty() {
            panic!("Unexpected remote calls: {mismatches:?}");
        }
        let remaining = lock(&self.expectations).len();
        if remaining != 0 {
            panic!("Not all expectations were met. {remaining} remaining");
        }
    }
}

impl Default for MockResource {
    fn default() -> Self {
        Self::new()
    }
}

/// Finishes one expectation with its scripted reply.
pub struct ExpectationBuilder<T> {
    expectations: Expectations,
    build: Box<dyn FnOnce(Result<T, RemoteError>) -> Expectation + Send>,
}

impl<T> ExpectationBuilder<T> {
    fn new(
        expectations: Expectations,
        build: impl FnOnce(Result<T, RemoteError>) -> Expectation + Send + 'static,
    ) -> Self {
        Self {
            expectations,
            build: Box::new(build),
        }
    }

    pub fn return_ok(self, value: T) {
        let expectation = (self.build)(Ok(value));
        lock(&self.expectations).push_back(expectation);
    }

    pub fn return_err(self, error: RemoteError) {
        let expectation = (self.build)(Err(error));
        lock(&self.expectations).push_back(expectation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;

    #[tokio::test]
    async fn channel_resource_hands_reply_to_test() {
        let (resource, mut requests) = create_mock_resource();

        let call = tokio::spawn(async move { resource.list(2, 5).await });

        let (page, limit, respond_to) = expect_list(&mut requests).await.expect("list request");
        assert_eq!((page, limit), (2, 5));
        respond_to
            .send(Ok(ListPage {
                records: vec![Record::new("A", "a@b.c", "D").with_id(6)],
                total_count: Some(10),
            }))
            .unwrap();

        let listed = call.await.unwrap().unwrap();
        assert_eq!(listed.records.len(), 1);
        assert_eq!(listed.total_count, Some(10));
    }

    #[tokio::test]
    async fn scripted_mock_answers_in_order() {
        let mut mock = MockResource::new();
        mock.expect_delete(RecordId::from(4)).return_ok(());
        mock.expect_create()
            .return_err(RemoteError::Status { status: 500, url: "/users".into() });

        let resource = mock.resource();
        resource.delete(RecordId::from(4)).await.unwrap();
        assert!(resource.create(RecordDraft::default()).await.is_err());

        mock.verify();
    }

    #[tokio::test]
    #[should_panic(expected = "Unexpected remote calls")]
    async fn mismatched_call_fails_verification() {
        let mut mock = MockResource::new();
        mock.expect_delete(RecordId::from(4)).return_ok(());

        let result = mock.resource().delete(RecordId::from(5)).await;
        assert!(result.is_err());

        mock.verify();
    }

    #[tokio::test]
    async fn unexpected_kind_leaves_expectation_queued() {
        let mut mock = MockResource::new();
        mock.expect_delete(RecordId::from(4)).return_ok(());

        let resource = mock.resource();
        assert!(resource.list(1, 5).await.is_err());
        resource.delete(RecordId::from(4)).await.unwrap();
    }

    #[tokio::test]
    #[should_panic(expected = "1 remaining")]
    async fn unmet_expectation_survives_a_stray_call() {
        let mut mock = MockResource::new();
        mock.expect_delete(RecordId::from(4)).return_ok(());

        let _ = mock.resource().list(1, 5).await;

        // Report the leftover expectation rather than the stray call.
        lock(&mock.mismatches).clear();
        mock.verify();
    }
}
