//! # Order Book Client
//!
//! High-level API for the order book actor. Placement validation (quota
//! consumption, formula restriction) happens in the order entity's
//! `on_create` hook; the batch operations used by the schedulers each map
//! onto one atomic store command.

use crate::billing::BillingDecision;
use crate::model::{Order, OrderCreate, OrderId};
use crate::order_book::{
    BillingApplied, OrderCommand, OrderError, OrderReply, OrderUpdate,
};
use async_trait::async_trait;
use canteen_actors::{ActorError, StoreClient, StoreHandle};
use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, instrument};

fn recover(e: ActorError) -> OrderError {
    e.entity_as::<OrderError>()
        .cloned()
        .unwrap_or_else(|| OrderError::Actor(e.to_string()))
}

/// Client for interacting with the order book actor.
#[derive(Clone)]
pub struct OrderBookClient {
    inner: StoreClient<Order>,
}

impl OrderBookClient {
    pub fn new(inner: StoreClient<Order>) -> Self {
        Self { inner }
    }

    /// Place a new order. Group orders reserve their quota slot here and
    /// fail when the quota is exhausted or the formula is restricted.
    #[instrument(skip(self, params))]
    pub async fn place_order(&self, params: OrderCreate) -> Result<OrderId, OrderError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(recover)
    }

    /// Cancel a pre-ordered meal, releasing any group quota slot.
    #[instrument(skip(self))]
    pub async fn cancel_order(
        &self,
        id: OrderId,
        reason: String,
        by: String,
        at: NaiveDateTime,
    ) -> Result<Order, OrderError> {
        debug!("Sending request");
        self.inner
            .update(id, OrderUpdate::Cancel { reason, by, at })
            .await
            .map_err(recover)
    }

    /// Record a physical redemption (badge scan) for an order.
    #[instrument(skip(self))]
    pub async fn record_consumption(
        &self,
        id: OrderId,
        user_email: String,
        location: String,
        by: String,
        at: NaiveDateTime,
    ) -> Result<Order, OrderError> {
        debug!("Sending request");
        match self
            .inner
            .command(OrderCommand::RecordConsumption {
                id,
                user_email,
                location,
                by,
                at,
            })
            .await
        {
            Ok(OrderReply::Recorded(order)) => Ok(order),
            Ok(_) => unreachable!("RecordConsumption must return Recorded"),
            Err(e) => Err(recover(e)),
        }
    }

    /// Flip `date`'s still-pre-ordered meals to not-retrieved. Returns the
    /// number of orders swept.
    #[instrument(skip(self))]
    pub async fn sweep_not_retrieved(
        &self,
        date: NaiveDate,
        by: String,
        at: NaiveDateTime,
    ) -> Result<usize, OrderError> {
        debug!("Sending request");
        match self
            .inner
            .command(OrderCommand::SweepNotRetrieved { date, by, at })
            .await
        {
            Ok(OrderReply::Swept(count)) => Ok(count),
            Ok(_) => unreachable!("SweepNotRetrieved must return Swept"),
            Err(e) => Err(recover(e)),
        }
    }

    /// Confirm `date`'s unvalidated internal orders. Returns the number of
    /// orders confirmed.
    #[instrument(skip(self))]
    pub async fn auto_confirm(
        &self,
        date: NaiveDate,
        by: String,
        at: NaiveDateTime,
    ) -> Result<usize, OrderError> {
        debug!("Sending request");
        match self
            .inner
            .command(OrderCommand::AutoConfirm { date, by, at })
            .await
        {
            Ok(OrderReply::Confirmed(count)) => Ok(count),
            Ok(_) => unreachable!("AutoConfirm must return Confirmed"),
            Err(e) => Err(recover(e)),
        }
    }

    /// Count pre-ordered meals with a service date in `[from, until]`.
    #[instrument(skip(self))]
    pub async fn count_preordered(
        &self,
        from: NaiveDate,
        until: NaiveDate,
    ) -> Result<usize, OrderError> {
        debug!("Sending request");
        match self
            .inner
            .command(OrderCommand::CountPreOrdered { from, until })
            .await
        {
            Ok(OrderReply::Counted(count)) => Ok(count),
            Ok(_) => unreachable!("CountPreOrdered must return Counted"),
            Err(e) => Err(recover(e)),
        }
    }

    /// Apply a billing plan in one atomic batch.
    #[instrument(skip(self, decisions))]
    pub async fn apply_billing(
        &self,
        decisions: Vec<BillingDecision>,
        by: String,
        at: NaiveDateTime,
    ) -> Result<BillingApplied, OrderError> {
        debug!(count = decisions.len(), "Sending request");
        match self
            .inner
            .command(OrderCommand::ApplyBilling { decisions, by, at })
            .await
        {
            Ok(OrderReply::BillingApplied(applied)) => Ok(applied),
            Ok(_) => unreachable!("ApplyBilling must return BillingApplied"),
            Err(e) => Err(recover(e)),
        }
    }
}

#[async_trait]
impl StoreHandle<Order> for OrderBookClient {
    type Error = OrderError;

    fn inner(&self) -> &StoreClient<Order> {
        &self.inner
    }

    fn map_error(e: ActorError) -> Self::Error {
        recover(e)
    }
}
