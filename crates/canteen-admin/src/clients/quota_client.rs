//! # Quota Client
//!
//! High-level API for the quota ledger actor.

use crate::model::{DailyQuota, GroupId, ServicePeriod};
use crate::quota::{QuotaCommand, QuotaError, QuotaReply};
use async_trait::async_trait;
use canteen_actors::{ActorError, StoreClient, StoreHandle};
use chrono::NaiveDate;
use tracing::{debug, instrument};

fn recover(e: ActorError) -> QuotaError {
    e.entity_as::<QuotaError>()
        .cloned()
        .unwrap_or_else(|| QuotaError::Actor(e.to_string()))
}

/// Client for interacting with the quota ledger actor.
#[derive(Clone)]
pub struct QuotaClient {
    inner: StoreClient<DailyQuota>,
}

impl QuotaClient {
    pub fn new(inner: StoreClient<DailyQuota>) -> Self {
        Self { inner }
    }

    /// Get or create the quota row for (group, date).
    #[instrument(skip(self))]
    pub async fn ensure(&self, group: GroupId, date: NaiveDate) -> Result<DailyQuota, QuotaError> {
        debug!("Sending request");
        match self
            .inner
            .command(QuotaCommand::Ensure { group, date })
            .await
        {
            Ok(QuotaReply::Quota(quota)) => Ok(quota),
            Ok(_) => unreachable!("Ensure must return a quota row"),
            Err(e) => Err(recover(e)),
        }
    }

    /// Atomically check and consume `qty` slots for the period.
    #[instrument(skip(self))]
    pub async fn try_consume(
        &self,
        group: GroupId,
        date: NaiveDate,
        period: ServicePeriod,
        qty: u32,
    ) -> Result<(), QuotaError> {
        debug!("Sending request");
        match self
            .inner
            .command(QuotaCommand::TryConsume {
                group,
                date,
                period,
                qty,
            })
            .await
        {
            Ok(QuotaReply::Consumed) => Ok(()),
            Ok(_) => unreachable!("TryConsume must return Consumed"),
            Err(e) => Err(recover(e)),
        }
    }

    /// Give back `qty` slots after a cancellation.
    #[instrument(skip(self))]
    pub async fn release(
        &self,
        group: GroupId,
        date: NaiveDate,
        period: ServicePeriod,
        qty: u32,
    ) -> Result<(), QuotaError> {
        debug!("Sending request");
        match self
            .inner
            .command(QuotaCommand::Release {
                group,
                date,
                period,
                qty,
            })
            .await
        {
            Ok(QuotaReply::Released) => Ok(()),
            Ok(_) => unreachable!("Release must return Released"),
            Err(e) => Err(recover(e)),
        }
    }

    /// Slots left for (group, date, period); `None` means uncapped.
    #[instrument(skip(self))]
    pub async fn remaining(
        &self,
        group: GroupId,
        date: NaiveDate,
        period: ServicePeriod,
    ) -> Result<Option<u32>, QuotaError> {
        debug!("Sending request");
        match self
            .inner
            .command(QuotaCommand::Remaining {
                group,
                date,
                period,
            })
            .await
        {
            Ok(QuotaReply::Remaining(left)) => Ok(left),
            Ok(_) => unreachable!("Remaining must return Remaining"),
            Err(e) => Err(recover(e)),
        }
    }
}

#[async_trait]
impl StoreHandle<DailyQuota> for QuotaClient {
    type Error = QuotaError;

    fn inner(&self) -> &StoreClient<DailyQuota> {
        &self.inner
    }

    fn map_error(e: ActorError) -> Self::Error {
        recover(e)
    }
}
