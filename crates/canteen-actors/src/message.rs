//! # Store Messages
//!
//! Message types exchanged between a [`StoreClient`](crate::StoreClient) and
//! its [`StoreActor`](crate::StoreActor). Each request carries a oneshot
//! channel for the reply, so every call site gets a typed response without
//! sharing any state with the actor.

use crate::entity::StoreEntity;
use crate::error::ActorError;
use tokio::sync::oneshot;

/// Oneshot reply channel used by store actors.
pub type Respond<T> = oneshot::Sender<Result<T, ActorError>>;

/// Requests a store actor can process.
///
/// The variants map onto the standard lifecycle of a persistent record
/// (create, read, update, delete) plus two collection-level operations:
/// `Query` filters rows through [`StoreEntity::matches`], and `Command` hands
/// the entire collection to [`StoreEntity::apply`] for one atomic, possibly
/// multi-row unit of work.
#[derive(Debug)]
pub enum StoreRequest<T: StoreEntity> {
    Create {
        params: T::Create,
        respond_to: Respond<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Respond<Option<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Respond<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Respond<()>,
    },
    Query {
        query: T::Query,
        respond_to: Respond<Vec<T>>,
    },
    Command {
        command: T::Command,
        respond_to: Respond<T::Reply>,
    },
}
