//! [`StoreEntity`] implementation for [`DailyQuota`].
//!
//! Rows are keyed by (group, date) and created on demand from the group's
//! defaults. Check-and-increment runs inside one store command, so two
//! concurrent orders can never both take the last slot.

use crate::model::quota::{DailyQuota, Group, GroupCatalog, GroupId, QuotaKey};
use crate::model::ServicePeriod;
use crate::quota::QuotaError;
use async_trait::async_trait;
use canteen_actors::StoreEntity;
use chrono::NaiveDate;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::debug;

/// Payload for creating a quota row directly (tests, imports). The normal
/// path is the `Ensure` command, which seeds rows from the catalog.
#[derive(Debug, Clone)]
pub struct QuotaCreate {
    pub group: Group,
    pub date: NaiveDate,
}

/// Updates are not part of the ledger contract; rows change only through
/// commands.
#[derive(Debug, Clone)]
pub enum QuotaUpdate {}

/// Row filter for quota queries.
#[derive(Debug, Clone, Default)]
pub struct QuotaQuery {
    pub group: Option<GroupId>,
    pub date: Option<NaiveDate>,
}

/// The quota ledger contract.
#[derive(Debug, Clone)]
pub enum QuotaCommand {
    /// Get or create the row for (group, date).
    Ensure { group: GroupId, date: NaiveDate },
    /// Atomically check remaining ≥ qty and count the consumption.
    TryConsume {
        group: GroupId,
        date: NaiveDate,
        period: ServicePeriod,
        qty: u32,
    },
    /// Give slots back on cancellation.
    Release {
        group: GroupId,
        date: NaiveDate,
        period: ServicePeriod,
        qty: u32,
    },
    /// Slots left for (group, date, period); `None` means uncapped.
    Remaining {
        group: GroupId,
        date: NaiveDate,
        period: ServicePeriod,
    },
}

#[derive(Debug, Clone)]
pub enum QuotaReply {
    Quota(DailyQuota),
    Consumed,
    Released,
    Remaining(Option<u32>),
}

fn ensure_row<'a>(
    store: &'a mut HashMap<QuotaKey, DailyQuota>,
    catalog: &GroupCatalog,
    group: GroupId,
    date: NaiveDate,
) -> Result<&'a mut DailyQuota, QuotaError> {
    let key = QuotaKey::new(group, date);
    match store.entry(key) {
        Entry::Occupied(row) => Ok(row.into_mut()),
        Entry::Vacant(slot) => {
            let group_def = catalog.get(group).ok_or(QuotaError::UnknownGroup(group))?;
            debug!(%key, "Seeding quota row from group defaults");
            Ok(slot.insert(DailyQuota::from_group(group_def, date)))
        }
    }
}

#[async_trait]
impl StoreEntity for DailyQuota {
    type Id = QuotaKey;
    type Create = QuotaCreate;
    type Update = QuotaUpdate;
    type Query = QuotaQuery;
    type Command = QuotaCommand;
    type Reply = QuotaReply;
    type Context = GroupCatalog;
    type Error = QuotaError;

    fn id(&self) -> &QuotaKey {
        &self.key
    }

    /// The generated id is ignored; a quota row's key is (group, date).
    fn from_create_params(_id: QuotaKey, params: QuotaCreate) -> Result<Self, QuotaError> {
        Ok(DailyQuota::from_group(&params.group, params.date))
    }

    fn matches(&self, query: &QuotaQuery) -> bool {
        if let Some(group) = query.group {
            if self.key.group != group {
                return false;
            }
        }
        if let Some(date) = query.date {
            if self.key.date != date {
                return false;
            }
        }
        true
    }

    async fn apply(
        store: &mut HashMap<QuotaKey, DailyQuota>,
        command: QuotaCommand,
        catalog: &GroupCatalog,
    ) -> Result<QuotaReply, QuotaError> {
        match command {
            QuotaCommand::Ensure { group, date } => {
                let row = ensure_row(store, catalog, group, date)?;
                Ok(QuotaReply::Quota(row.clone()))
            }
            QuotaCommand::TryConsume {
                group,
                date,
                period,
                qty,
            } => {
                let row = ensure_row(store, catalog, group, date)?;
                if let Some(remaining) = row.remaining(period) {
                    if remaining < qty {
                        return Err(QuotaError::Exhausted {
                            group,
                            date,
                            period,
                            remaining,
                            requested: qty,
                        });
                    }
                }
                row.record_consumption(period, qty);
                Ok(QuotaReply::Consumed)
            }
            QuotaCommand::Release {
                group,
                date,
                period,
                qty,
            } => {
                let row = ensure_row(store, catalog, group, date)?;
                row.release(period, qty);
                Ok(QuotaReply::Released)
            }
            QuotaCommand::Remaining {
                group,
                date,
                period,
            } => {
                let row = ensure_row(store, catalog, group, date)?;
                Ok(QuotaReply::Remaining(row.remaining(period)))
            }
        }
    }

    async fn on_update(
        &mut self,
        update: QuotaUpdate,
        _ctx: &GroupCatalog,
    ) -> Result<(), QuotaError> {
        match update {}
    }
}
