//! # StoreHandle Trait
//!
//! Common interface for domain-specific client wrappers. Provides default
//! `get`, `query`, and `delete` methods on top of the generic
//! [`StoreClient`], so each wrapper only implements its own domain
//! operations and error mapping.

use crate::{ActorError, StoreClient, StoreEntity};
use async_trait::async_trait;

/// Trait for domain clients to inherit the standard store operations.
///
/// Implementors supply the inner generic client and a mapping from
/// [`ActorError`] to their own error type; `get`/`query`/`delete` come for
/// free.
#[async_trait]
pub trait StoreHandle<T: StoreEntity>: Send + Sync {
    /// The domain-specific error type.
    type Error: Send + Sync;

    /// Access the inner generic client.
    fn inner(&self) -> &StoreClient<T>;

    /// Map framework errors to the domain error type.
    fn map_error(e: ActorError) -> Self::Error;

    /// Fetch a record by id.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }

    /// Fetch all records matching a filter.
    #[tracing::instrument(skip(self, query))]
    async fn query(&self, query: T::Query) -> Result<Vec<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().query(query).await.map_err(Self::map_error)
    }

    /// Delete a record by id.
    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: T::Id) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.inner().delete(id).await.map_err(Self::map_error)
    }
}
