//! Typed billing policy, loaded from the configuration store.
//!
//! Every field has a documented default; an absent or unparseable value
//! falls back rather than failing, because a misconfigured key must never
//! stop the nightly pipeline.

use crate::model::config::{self, keys};
use tracing::warn;

/// Billing policy for unconsumed past orders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingPolicy {
    /// Master switch; when false the reconciler does nothing.
    pub active: bool,
    /// Percentage of the order amount charged, 0–100.
    pub percentage: u32,
    /// Free absences per user before charges apply.
    pub grace_absences: u32,
    /// Free-cancellation window in hours. Carried for completeness; the
    /// exemption walk does not consult it.
    pub free_cancel_hours: u32,
    /// Bill orders whose service date falls on a weekend.
    pub bill_weekends: bool,
    /// Bill orders whose service date falls on a public holiday.
    pub bill_holidays: bool,
}

impl Default for BillingPolicy {
    fn default() -> Self {
        Self {
            active: false,
            percentage: 100,
            grace_absences: 0,
            free_cancel_hours: 24,
            bill_weekends: false,
            bill_holidays: false,
        }
    }
}

impl BillingPolicy {
    /// Builds the policy from raw configuration values.
    ///
    /// `lookup` returns the stored string for a key, or `None` when unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let raw = |key: &str| lookup(key);

        let mut percentage = config::parse_or(
            raw(keys::BILLING_PERCENTAGE).as_deref(),
            defaults.percentage,
            keys::BILLING_PERCENTAGE,
        );
        if percentage > 100 {
            warn!(percentage, "Billing percentage above 100, clamping");
            percentage = 100;
        }

        Self {
            active: config::parse_flag(
                raw(keys::BILLING_ACTIVE).as_deref(),
                defaults.active,
                keys::BILLING_ACTIVE,
            ),
            percentage,
            grace_absences: config::parse_or(
                raw(keys::BILLING_GRACE_ABSENCES).as_deref(),
                defaults.grace_absences,
                keys::BILLING_GRACE_ABSENCES,
            ),
            free_cancel_hours: config::parse_or(
                raw(keys::BILLING_FREE_CANCEL_HOURS).as_deref(),
                defaults.free_cancel_hours,
                keys::BILLING_FREE_CANCEL_HOURS,
            ),
            bill_weekends: config::parse_flag(
                raw(keys::BILLING_WEEKENDS).as_deref(),
                defaults.bill_weekends,
                keys::BILLING_WEEKENDS,
            ),
            bill_holidays: config::parse_flag(
                raw(keys::BILLING_HOLIDAYS).as_deref(),
                defaults.bill_holidays,
                keys::BILLING_HOLIDAYS,
            ),
        }
    }
}
