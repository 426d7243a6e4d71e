//! Order records and their embedded consumption history.

use crate::model::quota::GroupId;
use crate::model::status::OrderStatus;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub u64);

impl From<u64> for OrderId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "order-{}", self.0)
    }
}

/// Meal service period an order belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServicePeriod {
    Day,
    Night,
}

impl Display for ServicePeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServicePeriod::Day => write!(f, "day"),
            ServicePeriod::Night => write!(f, "night"),
        }
    }
}

/// Formula (daily menu) reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormulaId(pub u32);

impl Display for FormulaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "formula-{}", self.0)
    }
}

/// Meal tier of a formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MealKind {
    Standard,
    Improved,
}

/// Who an order is for.
///
/// Only `Internal` orders are eligible for the unconsumed-order billing run;
/// group and visitor orders are settled through other channels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientKind {
    Internal { user_email: String },
    Group { group_id: GroupId },
    Visitor { name: String },
}

/// How a consumption record came to exist.
///
/// `Physical` is a real redemption (badge scan or auto-confirmation) with the
/// place it happened; `Billed` marks an order that was charged without ever
/// being picked up. Both share the one-record-per-order constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConsumptionOutcome {
    Physical { location: String },
    Billed { amount: Decimal, reason: String },
}

/// Record of an order having been redeemed, physically or via billing.
///
/// Append-only: records are soft-deleted but never edited. At most one
/// non-deleted record exists per order, enforced by the order book before
/// insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionRecord {
    /// Sequence number within the order's history, starting at 1.
    pub seq: u32,
    pub user_email: String,
    pub date: NaiveDate,
    pub quantity: u32,
    pub outcome: ConsumptionOutcome,
    pub recorded_at: NaiveDateTime,
    pub deleted: bool,
}

/// A meal order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub created_at: NaiveDateTime,
    /// The day the meal is to be consumed.
    pub service_date: NaiveDate,
    pub period: ServicePeriod,
    pub status: OrderStatus,
    pub quantity: u32,
    pub client: ClientKind,
    pub formula: FormulaId,
    pub meal: MealKind,
    pub amount: Decimal,
    pub cancel_reason: Option<String>,
    pub created_by: String,
    pub modified_by: Option<String>,
    pub modified_at: Option<NaiveDateTime>,
    pub deleted: bool,
    /// Consumption history; at most one non-deleted entry.
    pub consumptions: Vec<ConsumptionRecord>,
}

/// Payload for placing a new order.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub service_date: NaiveDate,
    pub period: ServicePeriod,
    pub quantity: u32,
    pub client: ClientKind,
    pub formula: FormulaId,
    pub meal: MealKind,
    pub amount: Decimal,
    pub created_by: String,
    pub created_at: NaiveDateTime,
}

impl Order {
    /// The live (non-deleted) consumption record, if one exists.
    pub fn live_consumption(&self) -> Option<&ConsumptionRecord> {
        self.consumptions.iter().find(|record| !record.deleted)
    }

    /// True when the order was never validated, physically or via billing.
    pub fn is_unconsumed(&self) -> bool {
        self.live_consumption().is_none()
    }

    /// The internal user behind the order, when there is one.
    pub fn user_email(&self) -> Option<&str> {
        match &self.client {
            ClientKind::Internal { user_email } => Some(user_email),
            _ => None,
        }
    }

    /// The group behind the order, when there is one.
    pub fn group_id(&self) -> Option<GroupId> {
        match &self.client {
            ClientKind::Group { group_id } => Some(*group_id),
            _ => None,
        }
    }

    /// Stamps the modification audit fields.
    pub fn touch(&mut self, by: &str, at: NaiveDateTime) {
        self.modified_by = Some(by.to_string());
        self.modified_at = Some(at);
    }

    /// Appends a consumption record to the history.
    ///
    /// Callers must have checked [`Order::is_unconsumed`] first; the order
    /// book does this inside the same command, so the check cannot race.
    pub fn push_consumption(
        &mut self,
        user_email: String,
        date: NaiveDate,
        outcome: ConsumptionOutcome,
        recorded_at: NaiveDateTime,
    ) {
        let seq = self.consumptions.len() as u32 + 1;
        self.consumptions.push(ConsumptionRecord {
            seq,
            user_email,
            date,
            quantity: self.quantity,
            outcome,
            recorded_at,
            deleted: false,
        });
    }
}
