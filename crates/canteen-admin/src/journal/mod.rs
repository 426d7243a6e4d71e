//! The job journal actor: durable record of scheduled-job runs.

pub mod entity;
pub mod error;

pub use entity::{JournalCommand, JournalQuery, JournalReply, JournalUpdate};
pub use error::JournalError;

use crate::clients::JournalClient;
use crate::model::JournalEntry;
use canteen_actors::StoreActor;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Creates a new job journal actor and its client.
pub fn new() -> (StoreActor<JournalEntry>, JournalClient) {
    let entry_counter = Arc::new(AtomicU64::new(1));
    let next_entry_id = move || entry_counter.fetch_add(1, Ordering::SeqCst);

    let (actor, generic_client) = StoreActor::new(32, next_entry_id);
    let client = JournalClient::new(generic_client);

    (actor, client)
}
