//! The order book actor: owns every order together with its consumption
//! history, so the uniqueness of consumption records and the batch commands
//! of the schedulers are enforced within one sequential task.

pub mod entity;
pub mod error;

pub use entity::{BillingApplied, OrderCommand, OrderQuery, OrderReply, OrderUpdate};
pub use error::OrderError;

use crate::clients::{OrderBookClient, QuotaClient};
use crate::model::{Order, OrderId};
use canteen_actors::StoreActor;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Dependencies injected into the order actor at wiring time. Group orders
/// reserve and release quota slots through this client.
pub struct OrderContext {
    pub quotas: QuotaClient,
}

/// Creates a new order book actor and its client.
pub fn new() -> (StoreActor<Order>, OrderBookClient) {
    let order_id_counter = Arc::new(AtomicU64::new(1));
    let next_order_id = move || OrderId(order_id_counter.fetch_add(1, Ordering::SeqCst));

    let (actor, generic_client) = StoreActor::new(32, next_order_id);
    let client = OrderBookClient::new(generic_client);

    (actor, client)
}
