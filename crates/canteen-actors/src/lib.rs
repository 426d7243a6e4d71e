//! # Canteen Store Actors
//!
//! A small, generic store-actor framework: each record family (orders,
//! quotas, configuration entries, …) is owned by one [`StoreActor`] running
//! in its own tokio task, and reached through a cloneable [`StoreClient`].
//!
//! ## Concurrency model
//!
//! - Each actor processes its messages **sequentially**; it owns its state
//!   exclusively, so no locks are needed.
//! - One message is one unit of work. A store-level `Command` receives the
//!   whole collection for its duration, which makes multi-row mutations
//!   (nightly sweeps, billing batches) atomic with respect to every other
//!   request on that store.
//! - Multiple actors run in parallel; they communicate only through
//!   message-passing clients.
//!
//! ## Wiring pattern
//!
//! 1. **Create**: [`StoreActor::new`] returns the actor (server half) and its
//!    client.
//! 2. **Wire**: dependencies (other clients) are injected via `run(context)`,
//!    not at construction time, so the creation order of actors never
//!    matters.
//! 3. **Run**: spawn the actor's loop in a background task. It exits when the
//!    last client is dropped.
//!
//! ## Testing
//!
//! The [`mock`] module provides [`MockClient`](mock::MockClient) with queued
//! expectations, plus receiver-level helpers for asserting on raw requests.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod tracing;

pub use actor::StoreActor;
pub use client::StoreClient;
pub use client_trait::StoreHandle;
pub use entity::StoreEntity;
pub use error::ActorError;
pub use message::{Respond, StoreRequest};
