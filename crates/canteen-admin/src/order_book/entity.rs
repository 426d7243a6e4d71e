//! [`StoreEntity`] implementation for [`Order`]: creation side effects,
//! cancellation, row filtering, and the batch commands the schedulers run.

use crate::billing::{BillingDecision, BillingVerdict};
use crate::model::{
    ClientKind, ConsumptionOutcome, MealKind, Order, OrderCreate, OrderId, OrderStatus,
};
use crate::order_book::{OrderContext, OrderError};
use crate::quota::QuotaError;
use async_trait::async_trait;
use canteen_actors::StoreEntity;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::{debug, info};

/// Row filter for order queries. Empty `statuses` matches any status.
#[derive(Debug, Clone, Default)]
pub struct OrderQuery {
    pub statuses: Vec<OrderStatus>,
    /// Inclusive lower bound on the service date.
    pub service_from: Option<NaiveDate>,
    /// Exclusive upper bound on the service date.
    pub service_before: Option<NaiveDate>,
    pub internal_only: bool,
    /// Only orders without a live consumption record.
    pub unconsumed_only: bool,
    pub include_deleted: bool,
}

/// Updates applicable to an existing order.
#[derive(Debug, Clone)]
pub enum OrderUpdate {
    /// Cancel a pre-ordered meal, releasing any group quota slot.
    Cancel {
        reason: String,
        by: String,
        at: NaiveDateTime,
    },
}

/// Batch operations on the whole order book. Each command is one atomic
/// unit of work: nothing else touches the store while it runs.
#[derive(Debug, Clone)]
pub enum OrderCommand {
    /// A redemption event (badge scan). Transitions the order to `Consumed`
    /// and appends the single physical consumption record.
    RecordConsumption {
        id: OrderId,
        user_email: String,
        location: String,
        by: String,
        at: NaiveDateTime,
    },
    /// Nightly sweep: flip today's still-pre-ordered meals to `NotRetrieved`.
    SweepNotRetrieved {
        date: NaiveDate,
        by: String,
        at: NaiveDateTime,
    },
    /// Evening auto-confirmation of same-day internal orders.
    AutoConfirm {
        date: NaiveDate,
        by: String,
        at: NaiveDateTime,
    },
    /// Count pre-ordered meals in an inclusive date range.
    CountPreOrdered { from: NaiveDate, until: NaiveDate },
    /// Apply a billing plan: billed orders get a `Billed` consumption
    /// record, exempted orders only an audit stamp. Status never changes.
    ApplyBilling {
        decisions: Vec<BillingDecision>,
        by: String,
        at: NaiveDateTime,
    },
}

/// Results of the batch commands.
#[derive(Debug, Clone)]
pub enum OrderReply {
    Recorded(Order),
    Swept(usize),
    Confirmed(usize),
    Counted(usize),
    BillingApplied(BillingApplied),
}

/// Summary of one applied billing batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BillingApplied {
    pub billed: usize,
    pub exempted: usize,
    /// Decisions dropped because the order vanished or was validated
    /// between planning and application.
    pub skipped: usize,
    pub total: Decimal,
}

fn quota_to_order_error(err: QuotaError) -> OrderError {
    match err {
        QuotaError::Exhausted { group, date, .. } => OrderError::QuotaExhausted { group, date },
        QuotaError::UnknownGroup(group) => OrderError::UnknownGroup(group),
        QuotaError::Actor(msg) => OrderError::Actor(msg),
    }
}

#[async_trait]
impl StoreEntity for Order {
    type Id = OrderId;
    type Create = OrderCreate;
    type Update = OrderUpdate;
    type Query = OrderQuery;
    type Command = OrderCommand;
    type Reply = OrderReply;
    type Context = OrderContext;
    type Error = OrderError;

    fn id(&self) -> &OrderId {
        &self.id
    }

    fn from_create_params(id: OrderId, params: OrderCreate) -> Result<Self, OrderError> {
        if params.quantity == 0 {
            return Err(OrderError::Validation("quantity must be positive".into()));
        }
        if params.amount < Decimal::ZERO {
            return Err(OrderError::Validation("amount must not be negative".into()));
        }
        Ok(Self {
            id,
            created_at: params.created_at,
            service_date: params.service_date,
            period: params.period,
            status: OrderStatus::PreOrdered,
            quantity: params.quantity,
            client: params.client,
            formula: params.formula,
            meal: params.meal,
            amount: params.amount,
            cancel_reason: None,
            created_by: params.created_by,
            modified_by: None,
            modified_at: None,
            deleted: false,
            consumptions: Vec::new(),
        })
    }

    /// Group orders reserve a quota slot before the order is stored; the
    /// restriction flag is enforced here because the ledger only counts.
    async fn on_create(&mut self, ctx: &OrderContext) -> Result<(), OrderError> {
        let ClientKind::Group { group_id } = &self.client else {
            return Ok(());
        };
        let group_id = *group_id;

        let quota = ctx
            .quotas
            .ensure(group_id, self.service_date)
            .await
            .map_err(quota_to_order_error)?;
        if quota.standard_only && self.meal != MealKind::Standard {
            return Err(OrderError::RestrictedFormula(group_id));
        }
        ctx.quotas
            .try_consume(group_id, self.service_date, self.period, self.quantity)
            .await
            .map_err(quota_to_order_error)
    }

    async fn on_update(&mut self, update: OrderUpdate, ctx: &OrderContext) -> Result<(), OrderError> {
        match update {
            OrderUpdate::Cancel { reason, by, at } => {
                if !self.status.can_become(OrderStatus::Cancelled) {
                    return Err(OrderError::InvalidTransition {
                        from: self.status,
                        to: OrderStatus::Cancelled,
                    });
                }
                self.status = OrderStatus::Cancelled;
                self.cancel_reason = Some(reason);
                self.touch(&by, at);
                if let ClientKind::Group { group_id } = &self.client {
                    ctx.quotas
                        .release(*group_id, self.service_date, self.period, self.quantity)
                        .await
                        .map_err(quota_to_order_error)?;
                }
                Ok(())
            }
        }
    }

    fn matches(&self, query: &OrderQuery) -> bool {
        if self.deleted && !query.include_deleted {
            return false;
        }
        if !query.statuses.is_empty() && !query.statuses.contains(&self.status) {
            return false;
        }
        if let Some(from) = query.service_from {
            if self.service_date < from {
                return false;
            }
        }
        if let Some(before) = query.service_before {
            if self.service_date >= before {
                return false;
            }
        }
        if query.internal_only && self.user_email().is_none() {
            return false;
        }
        if query.unconsumed_only && !self.is_unconsumed() {
            return false;
        }
        true
    }

    async fn apply(
        store: &mut HashMap<OrderId, Order>,
        command: OrderCommand,
        _ctx: &OrderContext,
    ) -> Result<OrderReply, OrderError> {
        match command {
            OrderCommand::RecordConsumption {
                id,
                user_email,
                location,
                by,
                at,
            } => {
                let order = store
                    .get_mut(&id)
                    .filter(|o| !o.deleted)
                    .ok_or_else(|| OrderError::NotFound(id.to_string()))?;
                if order.live_consumption().is_some() {
                    return Err(OrderError::AlreadyConsumed(id));
                }
                if !order.status.can_become(OrderStatus::Consumed) {
                    return Err(OrderError::InvalidTransition {
                        from: order.status,
                        to: OrderStatus::Consumed,
                    });
                }
                order.status = OrderStatus::Consumed;
                order.push_consumption(
                    user_email,
                    at.date(),
                    ConsumptionOutcome::Physical { location },
                    at,
                );
                order.touch(&by, at);
                info!(order_id = %id, "Consumption recorded");
                Ok(OrderReply::Recorded(order.clone()))
            }

            OrderCommand::SweepNotRetrieved { date, by, at } => {
                let mut swept = 0;
                for order in store.values_mut() {
                    if order.deleted
                        || order.service_date != date
                        || order.status != OrderStatus::PreOrdered
                    {
                        continue;
                    }
                    // PreOrdered -> NotRetrieved is always legal; the filter
                    // above is the real guard.
                    order.status = OrderStatus::NotRetrieved;
                    order.touch(&by, at);
                    swept += 1;
                }
                Ok(OrderReply::Swept(swept))
            }

            OrderCommand::AutoConfirm { date, by, at } => {
                let mut confirmed = 0;
                for order in store.values_mut() {
                    if order.deleted
                        || order.service_date != date
                        || order.status != OrderStatus::PreOrdered
                        || order.live_consumption().is_some()
                    {
                        continue;
                    }
                    let Some(email) = order.user_email().map(str::to_string) else {
                        continue;
                    };
                    order.status = OrderStatus::Consumed;
                    order.push_consumption(
                        email,
                        date,
                        ConsumptionOutcome::Physical {
                            location: "auto-confirmation".into(),
                        },
                        at,
                    );
                    order.touch(&by, at);
                    confirmed += 1;
                }
                Ok(OrderReply::Confirmed(confirmed))
            }

            OrderCommand::CountPreOrdered { from, until } => {
                let count = store
                    .values()
                    .filter(|o| {
                        !o.deleted
                            && o.status == OrderStatus::PreOrdered
                            && o.service_date >= from
                            && o.service_date <= until
                    })
                    .count();
                Ok(OrderReply::Counted(count))
            }

            OrderCommand::ApplyBilling { decisions, by, at } => {
                let mut applied = BillingApplied {
                    billed: 0,
                    exempted: 0,
                    skipped: 0,
                    total: Decimal::ZERO,
                };
                for decision in decisions {
                    let Some(order) = store.get_mut(&decision.order_id).filter(|o| !o.deleted)
                    else {
                        debug!(order_id = %decision.order_id, "Billing decision skipped: order gone");
                        applied.skipped += 1;
                        continue;
                    };
                    match decision.verdict {
                        BillingVerdict::Charge { amount } => {
                            if order.live_consumption().is_some() {
                                debug!(order_id = %order.id, "Billing decision skipped: already validated");
                                applied.skipped += 1;
                                continue;
                            }
                            order.push_consumption(
                                decision.user_email,
                                order.service_date,
                                ConsumptionOutcome::Billed {
                                    amount,
                                    reason: "NOT RETRIEVED".into(),
                                },
                                at,
                            );
                            order.touch(&by, at);
                            applied.billed += 1;
                            applied.total += amount;
                        }
                        BillingVerdict::Exempt { .. } => {
                            // Exempted orders keep no financial trace; they
                            // stay eligible for future runs.
                            order.touch(&by, at);
                            applied.exempted += 1;
                        }
                    }
                }
                Ok(OrderReply::BillingApplied(applied))
            }
        }
    }
}
