//! The configuration store actor: operational settings behind a simple
//! get/set key-value contract.

pub mod entity;
pub mod error;

pub use entity::{ConfigCommand, ConfigQuery, ConfigReply, ConfigUpdate};
pub use error::ConfigError;

use crate::clients::ConfigClient;
use crate::model::ConfigEntry;
use canteen_actors::StoreActor;

/// Creates a new configuration store actor and its client.
pub fn new() -> (StoreActor<ConfigEntry>, ConfigClient) {
    // Entries are keyed by their configuration key; the generic id source is
    // never used for anything meaningful.
    let (actor, generic_client) = StoreActor::new(32, String::new);
    let client = ConfigClient::new(generic_client);

    (actor, client)
}
