//! # Mock Clients for Testing
//!
//! [`MockClient`] implements the same wire protocol as a real store actor but
//! operates entirely in memory: expectations are queued up front, requests
//! are answered from the queue, and [`MockClient::verify`] asserts that every
//! expectation was consumed. This lets client-side logic (validation,
//! orchestration, error mapping) be tested deterministically without
//! spawning a single actor.
//!
//! For lower-level assertions, [`create_mock_client`] returns a raw client
//! plus the receiving end of its channel, so a test can inspect each
//! [`StoreRequest`] directly and reply by hand.

use crate::client::StoreClient;
use crate::entity::StoreEntity;
use crate::error::ActorError;
use crate::message::StoreRequest;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// An expected request and its canned response.
enum Expectation<T: StoreEntity> {
    Get {
        response: Result<Option<T>, ActorError>,
    },
    Create {
        response: Result<T::Id, ActorError>,
    },
    Update {
        response: Result<T, ActorError>,
    },
    Delete {
        response: Result<(), ActorError>,
    },
    Query {
        response: Result<Vec<T>, ActorError>,
    },
    Command {
        response: Result<T::Reply, ActorError>,
    },
}

/// A mock store client with expectation tracking.
///
/// # Example
/// ```ignore
/// let mut mock = MockClient::<DailyQuota>::new();
/// mock.expect_command().return_ok(QuotaReply::Consumed);
///
/// let client = QuotaClient::new(mock.client());
/// // exercise code under test ...
/// mock.verify();
/// ```
pub struct MockClient<T: StoreEntity> {
    client: StoreClient<T>,
    expectations: Arc<Mutex<VecDeque<Expectation<T>>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: StoreEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: StoreEntity> MockClient<T> {
    /// Creates a new mock client with no expectations.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<StoreRequest<T>>(100);
        let expectations = Arc::new(Mutex::new(VecDeque::new()));
        let expectations_clone = expectations.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = {
                    let mut exps = expectations_clone.lock().unwrap();
                    exps.pop_front()
                };

                match (request, expectation) {
                    (
                        StoreRequest::Get { respond_to, .. },
                        Some(Expectation::Get { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        StoreRequest::Create { respond_to, .. },
                        Some(Expectation::Create { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        StoreRequest::Update { respond_to, .. },
                        Some(Expectation::Update { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        StoreRequest::Delete { respond_to, .. },
                        Some(Expectation::Delete { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        StoreRequest::Query { respond_to, .. },
                        Some(Expectation::Query { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        StoreRequest::Command { respond_to, .. },
                        Some(Expectation::Command { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    _ => {
                        panic!("Unexpected request or expectation mismatch");
                    }
                }
            }
        });

        Self {
            client: StoreClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    /// Returns the client half for use in tests.
    pub fn client(&self) -> StoreClient<T> {
        self.client.clone()
    }

    /// Expects a `get` request.
    pub fn expect_get(&mut self) -> ExpectationBuilder<'_, T, Option<T>> {
        ExpectationBuilder {
            expectations: &self.expectations,
            wrap: Box::new(|response| Expectation::Get { response }),
        }
    }

    /// Expects a `create` request.
    pub fn expect_create(&mut self) -> ExpectationBuilder<'_, T, T::Id> {
        ExpectationBuilder {
            expectations: &self.expectations,
            wrap: Box::new(|response| Expectation::Create { response }),
        }
    }

    /// Expects an `update` request.
    pub fn expect_update(&mut self) -> ExpectationBuilder<'_, T, T> {
        ExpectationBuilder {
            expectations: &self.expectations,
            wrap: Box::new(|response| Expectation::Update { response }),
        }
    }

    /// Expects a `delete` request.
    pub fn expect_delete(&mut self) -> ExpectationBuilder<'_, T, ()> {
        ExpectationBuilder {
            expectations: &self.expectations,
            wrap: Box::new(|response| Expectation::Delete { response }),
        }
    }

    /// Expects a `query` request.
    pub fn expect_query(&mut self) -> ExpectationBuilder<'_, T, Vec<T>> {
        ExpectationBuilder {
            expectations: &self.expectations,
            wrap: Box::new(|response| Expectation::Query { response }),
        }
    }

    /// Expects a store-level `command` request.
    pub fn expect_command(&mut self) -> ExpectationBuilder<'_, T, T::Reply> {
        ExpectationBuilder {
            expectations: &self.expectations,
            wrap: Box::new(|response| Expectation::Command { response }),
        }
    }

    /// Panics unless every queued expectation was consumed.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }
}

/// Builder binding a canned response to the next queued expectation.
pub struct ExpectationBuilder<'a, T: StoreEntity, R> {
    expectations: &'a Arc<Mutex<VecDeque<Expectation<T>>>>,
    wrap: Box<dyn FnOnce(Result<R, ActorError>) -> Expectation<T> + 'a>,
}

impl<'a, T: StoreEntity, R> ExpectationBuilder<'a, T, R> {
    /// Queue a successful response.
    pub fn return_ok(self, value: R) {
        let expectation = (self.wrap)(Ok(value));
        self.expectations.lock().unwrap().push_back(expectation);
    }

    /// Queue an error response.
    pub fn return_err(self, error: ActorError) {
        let expectation = (self.wrap)(Err(error));
        self.expectations.lock().unwrap().push_back(expectation);
    }
}

// =============================================================================
// RECEIVER-LEVEL HELPERS
// =============================================================================

/// Creates a raw mock client and the receiver for asserting requests.
///
/// Useful when a test wants to look at the request payload itself rather
/// than just replying to it.
pub fn create_mock_client<T: StoreEntity>(
    buffer_size: usize,
) -> (StoreClient<T>, mpsc::Receiver<StoreRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (StoreClient::new(sender), receiver)
}

/// Receives the next message and asserts it is a `Create` request.
pub async fn expect_create<T: StoreEntity>(
    receiver: &mut mpsc::Receiver<StoreRequest<T>>,
) -> Option<(
    T::Create,
    tokio::sync::oneshot::Sender<Result<T::Id, ActorError>>,
)> {
    match receiver.recv().await {
        Some(StoreRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Receives the next message and asserts it is a `Command` request.
pub async fn expect_command<T: StoreEntity>(
    receiver: &mut mpsc::Receiver<StoreRequest<T>>,
) -> Option<(
    T::Command,
    tokio::sync::oneshot::Sender<Result<T::Reply, ActorError>>,
)> {
    match receiver.recv().await {
        Some(StoreRequest::Command {
            command,
            respond_to,
        }) => Some((command, respond_to)),
        _ => None,
    }
}

/// Receives the next message and asserts it is a `Query` request.
pub async fn expect_query<T: StoreEntity>(
    receiver: &mut mpsc::Receiver<StoreRequest<T>>,
) -> Option<(
    T::Query,
    tokio::sync::oneshot::Sender<Result<Vec<T>, ActorError>>,
)> {
    match receiver.recv().await {
        Some(StoreRequest::Query { query, respond_to }) => Some((query, respond_to)),
        _ => None,
    }
}
