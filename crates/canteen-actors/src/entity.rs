//! # StoreEntity Trait
//!
//! Contract every stored record type (Order, DailyQuota, ConfigEntry, …) must
//! implement to be managed by the generic [`StoreActor`](crate::StoreActor).
//! Associated types pin down the record's identifier, creation/update
//! payloads, row filter, and store-level commands, so a client can never send
//! the wrong payload to the wrong store.
//!
//! Two kinds of operation exist:
//!
//! - **Row operations** (`Create`, `Get`, `Update`, `Delete`, `Query`) touch
//!   one record, or filter records one at a time via [`StoreEntity::matches`].
//! - **Store commands** (`Command`) receive exclusive access to the whole
//!   collection for the duration of one message. A multi-row mutation such as
//!   a nightly status sweep is therefore atomic with respect to every other
//!   operation on the same store: nothing interleaves with it.
//!
//! Hooks with default implementations (`on_create`, `on_delete`) only need to
//! be overridden when the entity has side effects, e.g. reserving a quota
//! slot against another actor through the injected `Context`.

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait implemented by any record type managed by a [`StoreActor`](crate::StoreActor).
///
/// The `Context` associated type carries the actor's runtime dependencies
/// (typically clients of other actors) and is injected into every hook via
/// `run(context)`, not at construction time. Wiring dependencies late keeps
/// actor construction free of ordering constraints.
#[async_trait]
pub trait StoreEntity: Clone + Send + Sync + 'static {
    /// Unique identifier. Either generated by the actor's id source or
    /// derived from the creation payload (see [`StoreEntity::from_create_params`]).
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;

    /// Payload required to create a new record.
    type Create: Send + Sync + Debug;

    /// Payload applied to an existing record.
    type Update: Send + Sync + Debug;

    /// Row filter evaluated by [`StoreEntity::matches`] during a query.
    type Query: Send + Sync + Debug;

    /// Store-level command operating on the whole collection at once.
    type Command: Send + Sync + Debug;

    /// Result type returned by store-level commands.
    type Reply: Send + Sync + Debug;

    /// Runtime dependencies injected into hooks. Use `()` when none exist.
    type Context: Send + Sync;

    /// Domain error type for this store.
    type Error: std::error::Error + Send + Sync + 'static;

    /// The record's identifier. The actor keys its map with this value, so an
    /// entity may override the generated id inside `from_create_params`
    /// (e.g. a quota row keyed by group and date).
    fn id(&self) -> &Self::Id;

    /// Builds the record from a generated id and the creation payload.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Row filter for queries.
    fn matches(&self, query: &Self::Query) -> bool;

    /// Executes a store-level command with exclusive access to the whole map.
    async fn apply(
        store: &mut HashMap<Self::Id, Self>,
        command: Self::Command,
        ctx: &Self::Context,
    ) -> Result<Self::Reply, Self::Error>;

    // --- Lifecycle hooks ---

    /// Called after the record is built, before it is inserted. Side effects
    /// (validation against other actors, reservations) belong here; an error
    /// discards the record.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called when an update payload arrives for an existing record.
    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Called immediately before the record is removed.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }
}
