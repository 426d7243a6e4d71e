//! Groups and their per-day meal quotas.

use crate::model::order::ServicePeriod;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;

/// Type-safe identifier for external client groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupId(pub u32);

impl Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "group-{}", self.0)
    }
}

/// An external client group (non-internal client category).
///
/// The optional capacities are the defaults a [`DailyQuota`] row is seeded
/// from on first use; `None` means the period is not capped for this group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub code: String,
    pub day_quota: Option<u32>,
    pub night_quota: Option<u32>,
    /// Restricts the group to standard formulas only.
    pub standard_only: bool,
}

/// Immutable group directory injected into the quota actor at wiring time.
#[derive(Clone)]
pub struct GroupCatalog {
    groups: Arc<HashMap<GroupId, Group>>,
}

impl GroupCatalog {
    pub fn new(groups: Vec<Group>) -> Self {
        Self {
            groups: Arc::new(groups.into_iter().map(|g| (g.id, g)).collect()),
        }
    }

    pub fn get(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(&id)
    }
}

/// Natural key of a quota row: one row per group per service day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuotaKey {
    pub group: GroupId,
    pub date: NaiveDate,
}

impl QuotaKey {
    pub fn new(group: GroupId, date: NaiveDate) -> Self {
        Self { group, date }
    }

    /// Placeholder key for the generic create path; quota rows always
    /// override it with their natural key.
    pub fn placeholder() -> Self {
        Self {
            group: GroupId(0),
            date: NaiveDate::default(),
        }
    }
}

impl Display for QuotaKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.group, self.date)
    }
}

/// Per-group, per-day consumption counters against the group's capacities.
///
/// Created on demand when a group first orders for a date. `consumed` may
/// exceed `capacity` after manual interventions; `remaining` floors at zero
/// rather than going negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyQuota {
    pub key: QuotaKey,
    pub day_capacity: Option<u32>,
    pub night_capacity: Option<u32>,
    pub day_consumed: u32,
    pub night_consumed: u32,
    /// Copied from the group at creation time.
    pub standard_only: bool,
}

impl DailyQuota {
    /// Seeds a fresh row from the group's default capacities.
    pub fn from_group(group: &Group, date: NaiveDate) -> Self {
        Self {
            key: QuotaKey::new(group.id, date),
            day_capacity: group.day_quota,
            night_capacity: group.night_quota,
            day_consumed: 0,
            night_consumed: 0,
            standard_only: group.standard_only,
        }
    }

    pub fn capacity(&self, period: ServicePeriod) -> Option<u32> {
        match period {
            ServicePeriod::Day => self.day_capacity,
            ServicePeriod::Night => self.night_capacity,
        }
    }

    pub fn consumed(&self, period: ServicePeriod) -> u32 {
        match period {
            ServicePeriod::Day => self.day_consumed,
            ServicePeriod::Night => self.night_consumed,
        }
    }

    fn consumed_mut(&mut self, period: ServicePeriod) -> &mut u32 {
        match period {
            ServicePeriod::Day => &mut self.day_consumed,
            ServicePeriod::Night => &mut self.night_consumed,
        }
    }

    /// Slots left for the period. `None` means the period is uncapped;
    /// otherwise `capacity - consumed`, floored at zero.
    pub fn remaining(&self, period: ServicePeriod) -> Option<u32> {
        self.capacity(period)
            .map(|cap| cap.saturating_sub(self.consumed(period)))
    }

    /// Counts a consumption without a capacity check. Callers check
    /// [`DailyQuota::remaining`] first.
    pub fn record_consumption(&mut self, period: ServicePeriod, qty: u32) {
        *self.consumed_mut(period) += qty;
    }

    /// Gives back slots on cancellation, floored at zero.
    pub fn release(&mut self, period: ServicePeriod, qty: u32) {
        let consumed = self.consumed_mut(period);
        *consumed = consumed.saturating_sub(qty);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group() -> Group {
        Group {
            id: GroupId(7),
            name: "Atelier Nord".into(),
            code: "AN".into(),
            day_quota: Some(5),
            night_quota: None,
            standard_only: true,
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    #[test]
    fn remaining_never_goes_negative() {
        let mut quota = DailyQuota::from_group(&group(), date());
        quota.day_consumed = 7; // over capacity after a manual intervention
        assert_eq!(quota.remaining(ServicePeriod::Day), Some(0));
    }

    #[test]
    fn uncapped_period_has_no_remaining_bound() {
        let quota = DailyQuota::from_group(&group(), date());
        assert_eq!(quota.remaining(ServicePeriod::Night), None);
    }

    #[test]
    fn release_floors_at_zero() {
        let mut quota = DailyQuota::from_group(&group(), date());
        quota.record_consumption(ServicePeriod::Day, 2);
        quota.release(ServicePeriod::Day, 5);
        assert_eq!(quota.day_consumed, 0);
    }
}
