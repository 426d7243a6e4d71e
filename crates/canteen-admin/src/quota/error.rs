//! Error types for the quota ledger.

use crate::model::{GroupId, ServicePeriod};
use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur during quota operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum QuotaError {
    /// The group is not in the catalog the ledger was wired with.
    #[error("Unknown group: {0}")]
    UnknownGroup(GroupId),

    /// Not enough slots left for the requested consumption.
    #[error("Quota exhausted for {group} on {date} ({period}): {remaining} left, {requested} requested")]
    Exhausted {
        group: GroupId,
        date: NaiveDate,
        period: ServicePeriod,
        remaining: u32,
        requested: u32,
    },

    /// An error occurred while communicating with the actor system.
    #[error("Quota ledger communication error: {0}")]
    Actor(String),
}

impl From<String> for QuotaError {
    fn from(msg: String) -> Self {
        QuotaError::Actor(msg)
    }
}
