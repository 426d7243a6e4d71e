//! # Generic Store Actor
//!
//! The [`StoreActor`] owns the in-memory collection for one record type and
//! processes all incoming [`StoreRequest`]s sequentially. Each actor runs in
//! its own tokio task, which guarantees exclusive access to its state without
//! locking: one message is always a complete unit of work, and a `Command`
//! that mutates many rows can never interleave with another request on the
//! same store.

use crate::client::StoreClient;
use crate::entity::StoreEntity;
use crate::error::ActorError;
use crate::message::StoreRequest;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Source of fresh identifiers for records created through the generic
/// `Create` path. Entities with natural keys may ignore the generated value
/// and derive their own id from the creation payload.
pub type IdSource<I> = Box<dyn FnMut() -> I + Send>;

/// The actor that manages a collection of entities.
///
/// Created together with its [`StoreClient`] via [`StoreActor::new`]; the
/// client half is cheap to clone and is the only way to reach the store. The
/// actor exits when every client has been dropped.
pub struct StoreActor<T: StoreEntity> {
    receiver: mpsc::Receiver<StoreRequest<T>>,
    store: HashMap<T::Id, T>,
    id_source: IdSource<T::Id>,
}

impl<T: StoreEntity> StoreActor<T> {
    /// Creates a new `StoreActor` and its associated client.
    ///
    /// `buffer_size` is the mpsc channel capacity; senders wait when it is
    /// full. `id_source` produces identifiers for the generic create path.
    pub fn new(
        buffer_size: usize,
        id_source: impl FnMut() -> T::Id + Send + 'static,
    ) -> (Self, StoreClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            id_source: Box::new(id_source),
        };
        let client = StoreClient::new(sender);
        (actor, client)
    }

    /// Runs the actor's event loop until the channel closes.
    ///
    /// `context` is injected into every entity hook, which is how an actor
    /// gains access to dependencies wired up after construction.
    pub async fn run(mut self, context: T::Context) {
        let store_kind = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(store_kind, "Store actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::Create { params, respond_to } => {
                    debug!(store_kind, ?params, "Create");
                    let id = (self.id_source)();
                    match T::from_create_params(id, params) {
                        Ok(mut item) => {
                            if let Err(e) = item.on_create(&context).await {
                                warn!(store_kind, error = %e, "on_create failed");
                                let _ = respond_to.send(Err(ActorError::entity(e)));
                                continue;
                            }
                            let id = item.id().clone();
                            self.store.insert(id.clone(), item);
                            info!(store_kind, %id, size = self.store.len(), "Created");
                            let _ = respond_to.send(Ok(id));
                        }
                        Err(e) => {
                            warn!(store_kind, error = %e, "Create failed");
                            let _ = respond_to.send(Err(ActorError::entity(e)));
                        }
                    }
                }
                StoreRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    let found = item.is_some();
                    debug!(store_kind, %id, found, "Get");
                    let _ = respond_to.send(Ok(item));
                }
                StoreRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(store_kind, %id, ?update, "Update");
                    if let Some(item) = self.store.get_mut(&id) {
                        if let Err(e) = item.on_update(update, &context).await {
                            warn!(store_kind, %id, error = %e, "Update failed");
                            let _ = respond_to.send(Err(ActorError::entity(e)));
                            continue;
                        }
                        info!(store_kind, %id, "Updated");
                        let _ = respond_to.send(Ok(item.clone()));
                    } else {
                        warn!(store_kind, %id, "Not found");
                        let _ = respond_to.send(Err(ActorError::NotFound(id.to_string())));
                    }
                }
                StoreRequest::Delete { id, respond_to } => {
                    debug!(store_kind, %id, "Delete");
                    if let Some(item) = self.store.get(&id) {
                        if let Err(e) = item.on_delete(&context).await {
                            warn!(store_kind, %id, error = %e, "on_delete failed");
                            let _ = respond_to.send(Err(ActorError::entity(e)));
                            continue;
                        }
                        self.store.remove(&id);
                        info!(store_kind, %id, size = self.store.len(), "Deleted");
                        let _ = respond_to.send(Ok(()));
                    } else {
                        warn!(store_kind, %id, "Not found");
                        let _ = respond_to.send(Err(ActorError::NotFound(id.to_string())));
                    }
                }
                StoreRequest::Query { query, respond_to } => {
                    let rows: Vec<T> = self
                        .store
                        .values()
                        .filter(|item| item.matches(&query))
                        .cloned()
                        .collect();
                    debug!(store_kind, ?query, hits = rows.len(), "Query");
                    let _ = respond_to.send(Ok(rows));
                }
                StoreRequest::Command {
                    command,
                    respond_to,
                } => {
                    debug!(store_kind, ?command, "Command");
                    let result = T::apply(&mut self.store, command, &context)
                        .await
                        .map_err(ActorError::entity);
                    match &result {
                        Ok(_) => info!(store_kind, "Command ok"),
                        Err(e) => warn!(store_kind, error = %e, "Command failed"),
                    }
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(store_kind, size = self.store.len(), "Shutdown");
    }
}
