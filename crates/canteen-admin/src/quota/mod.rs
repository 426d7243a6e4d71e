//! The quota ledger actor: per-group, per-day meal slot counters.

pub mod entity;
pub mod error;

pub use entity::{QuotaCommand, QuotaCreate, QuotaQuery, QuotaReply, QuotaUpdate};
pub use error::QuotaError;

use crate::clients::QuotaClient;
use crate::model::quota::QuotaKey;
use crate::model::DailyQuota;
use canteen_actors::StoreActor;

/// Creates a new quota ledger actor and its client.
pub fn new() -> (StoreActor<DailyQuota>, QuotaClient) {
    // Rows carry their natural (group, date) key; the generic id source is
    // only consulted on the direct create path and always overridden.
    let (actor, generic_client) = StoreActor::new(32, QuotaKey::placeholder);
    let client = QuotaClient::new(generic_client);

    (actor, client)
}
