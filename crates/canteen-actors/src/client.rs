//! # Generic Store Client
//!
//! The [`StoreClient`] is the caller-facing half of a store actor. It holds
//! only an mpsc sender, so it is cheap to clone and safe to share across
//! tasks; every method sends one request and awaits the typed oneshot reply.

use crate::entity::StoreEntity;
use crate::error::ActorError;
use crate::message::StoreRequest;
use tokio::sync::{mpsc, oneshot};

/// Type-safe client for a [`StoreActor`](crate::StoreActor).
#[derive(Clone)]
pub struct StoreClient<T: StoreEntity> {
    sender: mpsc::Sender<StoreRequest<T>>,
}

impl<T: StoreEntity> StoreClient<T> {
    pub fn new(sender: mpsc::Sender<StoreRequest<T>>) -> Self {
        Self { sender }
    }

    pub async fn create(&self, params: T::Create) -> Result<T::Id, ActorError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Create { params, respond_to })
            .await
            .map_err(|_| ActorError::Closed)?;
        response.await.map_err(|_| ActorError::Dropped)?
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, ActorError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Get { id, respond_to })
            .await
            .map_err(|_| ActorError::Closed)?;
        response.await.map_err(|_| ActorError::Dropped)?
    }

    pub async fn update(&self, id: T::Id, update: T::Update) -> Result<T, ActorError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Update {
                id,
                update,
                respond_to,
            })
            .await
            .map_err(|_| ActorError::Closed)?;
        response.await.map_err(|_| ActorError::Dropped)?
    }

    pub async fn delete(&self, id: T::Id) -> Result<(), ActorError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Delete { id, respond_to })
            .await
            .map_err(|_| ActorError::Closed)?;
        response.await.map_err(|_| ActorError::Dropped)?
    }

    pub async fn query(&self, query: T::Query) -> Result<Vec<T>, ActorError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Query { query, respond_to })
            .await
            .map_err(|_| ActorError::Closed)?;
        response.await.map_err(|_| ActorError::Dropped)?
    }

    pub async fn command(&self, command: T::Command) -> Result<T::Reply, ActorError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Command {
                command,
                respond_to,
            })
            .await
            .map_err(|_| ActorError::Closed)?;
        response.await.map_err(|_| ActorError::Dropped)?
    }
}
