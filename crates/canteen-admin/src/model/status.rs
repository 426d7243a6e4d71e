//! Order status values and the transition rules between them.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Lifecycle status of an order.
///
/// `PreOrdered` is the initial state. Every other state is terminal with
/// respect to automatic transitions; manual admin overrides live outside
/// this crate. Billing never moves an order out of `PreOrdered`: a
/// billed-but-unretrieved order keeps its status unless the nightly sweep
/// later flips it to `NotRetrieved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    PreOrdered,
    Consumed,
    NotRetrieved,
    Cancelled,
    Unavailable,
}

impl OrderStatus {
    /// True for states the automatic pipeline must never touch again.
    pub fn is_terminal(self) -> bool {
        !matches!(self, OrderStatus::PreOrdered)
    }

    /// Whether the state machine allows moving from `self` to `target`.
    ///
    /// All legal transitions start at `PreOrdered`; the caller is still
    /// responsible for the trigger-specific preconditions (a consumption
    /// event for `Consumed`, the sweep date filter for `NotRetrieved`).
    pub fn can_become(self, target: OrderStatus) -> bool {
        matches!(
            (self, target),
            (
                OrderStatus::PreOrdered,
                OrderStatus::Consumed
                    | OrderStatus::NotRetrieved
                    | OrderStatus::Cancelled
                    | OrderStatus::Unavailable,
            )
        )
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OrderStatus::PreOrdered => "pre-ordered",
            OrderStatus::Consumed => "consumed",
            OrderStatus::NotRetrieved => "not-retrieved",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Unavailable => "unavailable",
        };
        write!(f, "{name}")
    }
}
