//! Error types for the order book.

use crate::model::{GroupId, OrderId, OrderStatus};
use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// The requested order was not found.
    #[error("Order not found: {0}")]
    NotFound(String),

    /// The requested status change is illegal for the order's current state.
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: OrderStatus,
        to: OrderStatus,
    },

    /// The order already carries a live consumption record.
    #[error("Order {0} already has a consumption record")]
    AlreadyConsumed(OrderId),

    /// The group's quota for the requested date and period is exhausted.
    #[error("Quota exhausted for {group} on {date}")]
    QuotaExhausted { group: GroupId, date: chrono::NaiveDate },

    /// The group is restricted to standard formulas.
    #[error("Group {0} is restricted to standard formulas")]
    RestrictedFormula(GroupId),

    /// The order references a group the quota ledger does not know.
    #[error("Unknown group: {0}")]
    UnknownGroup(GroupId),

    /// The order payload is invalid.
    #[error("Order validation error: {0}")]
    Validation(String),

    /// An error occurred while communicating with the actor system.
    #[error("Order book communication error: {0}")]
    Actor(String),
}

impl From<String> for OrderError {
    fn from(msg: String) -> Self {
        OrderError::Actor(msg)
    }
}
