//! Weekly order closure.
//!
//! Once the configured weekly cutoff has passed, next week's Monday–Friday
//! pre-orders are considered locked. Locking changes no order field: the
//! job's durable effects are the day marker and the logged count, which is
//! exactly what downstream consumers need to know the window is closed.

use crate::clients::{ConfigClient, OrderBookClient};
use crate::config_store::ConfigError;
use crate::guard::IdempotencyGuard;
use crate::model::config::{self, keys};
use crate::model::JobName;
use crate::scheduling::{JobError, JobOutcome, ScheduledJob};
use async_trait::async_trait;
use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, Timelike, Weekday};
use std::time::Duration;
use tracing::debug;

const POLL_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// When the weekly closure takes effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosurePolicy {
    pub weekday: Weekday,
    /// Hour of day, 0–23.
    pub hour: u32,
}

impl Default for ClosurePolicy {
    fn default() -> Self {
        Self {
            weekday: Weekday::Fri,
            hour: 12,
        }
    }
}

impl ClosurePolicy {
    /// Builds the policy from raw configuration values; the weekday is
    /// stored as 1 = Monday … 7 = Sunday.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let weekday_num: u32 = config::parse_or(
            lookup(keys::CLOSURE_WEEKDAY).as_deref(),
            defaults.weekday.number_from_monday(),
            keys::CLOSURE_WEEKDAY,
        );
        let weekday = match weekday_num {
            1 => Weekday::Mon,
            2 => Weekday::Tue,
            3 => Weekday::Wed,
            4 => Weekday::Thu,
            5 => Weekday::Fri,
            6 => Weekday::Sat,
            7 => Weekday::Sun,
            _ => defaults.weekday,
        };

        let mut hour: u32 = config::parse_or(
            lookup(keys::CLOSURE_HOUR).as_deref(),
            defaults.hour,
            keys::CLOSURE_HOUR,
        );
        if hour > 23 {
            hour = defaults.hour;
        }

        Self { weekday, hour }
    }
}

/// True once the weekly cutoff has passed: the cutoff weekday at or after
/// the cutoff hour, or any later weekday of the same week.
pub fn is_blocking_time(now: NaiveDateTime, policy: &ClosurePolicy) -> bool {
    let today = now.date().weekday().num_days_from_monday();
    let cutoff = policy.weekday.num_days_from_monday();
    today > cutoff || (today == cutoff && now.hour() >= policy.hour)
}

/// Next week's Monday–Friday window.
pub fn next_week_span(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let to_next_monday = 7 - today.weekday().num_days_from_monday();
    let monday = today + Days::new(u64::from(to_next_monday));
    (monday, monday + Days::new(4))
}

/// The weekly closure job.
pub struct ClosureScheduler {
    orders: OrderBookClient,
    config: ConfigClient,
    guard: IdempotencyGuard,
}

impl ClosureScheduler {
    pub fn new(orders: OrderBookClient, config: ConfigClient, guard: IdempotencyGuard) -> Self {
        Self {
            orders,
            config,
            guard,
        }
    }

    async fn load_policy(&self) -> Result<ClosurePolicy, ConfigError> {
        let weekday = self.config.get(keys::CLOSURE_WEEKDAY).await?;
        let hour = self.config.get(keys::CLOSURE_HOUR).await?;
        Ok(ClosurePolicy::from_lookup(|key| match key {
            keys::CLOSURE_WEEKDAY => weekday.clone(),
            keys::CLOSURE_HOUR => hour.clone(),
            _ => None,
        }))
    }
}

#[async_trait]
impl ScheduledJob for ClosureScheduler {
    fn name(&self) -> JobName {
        JobName::Closure
    }

    fn poll_interval(&self) -> Duration {
        POLL_INTERVAL
    }

    fn guard(&self) -> &IdempotencyGuard {
        &self.guard
    }

    async fn execute(&self, now: NaiveDateTime) -> Result<JobOutcome, JobError> {
        let policy = self.load_policy().await?;
        if !is_blocking_time(now, &policy) {
            return Ok(JobOutcome::Skipped);
        }

        let today = now.date();
        if self.guard.has_run(JobName::Closure, today).await? {
            debug!("Closure already recorded today");
            return Ok(JobOutcome::Skipped);
        }

        let (monday, friday) = next_week_span(today);
        let count = self.orders.count_preordered(monday, friday).await?;
        let summary = format!("closure window {monday}..{friday}: {count} pre-orders locked");
        self.guard
            .mark_completed(JobName::Closure, today, summary.clone(), now)
            .await?;
        Ok(JobOutcome::Completed(summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn blocking_starts_at_the_cutoff_hour() {
        let policy = ClosurePolicy::default(); // Friday 12:00
        assert!(!is_blocking_time(at(2026, 3, 6, 11, 59), &policy)); // Friday morning
        assert!(is_blocking_time(at(2026, 3, 6, 12, 0), &policy)); // Friday noon
        assert!(is_blocking_time(at(2026, 3, 7, 0, 5), &policy)); // Saturday
        assert!(is_blocking_time(at(2026, 3, 8, 23, 0), &policy)); // Sunday
        assert!(!is_blocking_time(at(2026, 3, 5, 18, 0), &policy)); // Thursday
        assert!(!is_blocking_time(at(2026, 3, 9, 13, 0), &policy)); // next Monday
    }

    #[test]
    fn next_week_span_is_monday_to_friday() {
        // From a Friday.
        let (monday, friday) = next_week_span(NaiveDate::from_ymd_opt(2026, 3, 6).unwrap());
        assert_eq!(monday, NaiveDate::from_ymd_opt(2026, 3, 9).unwrap());
        assert_eq!(friday, NaiveDate::from_ymd_opt(2026, 3, 13).unwrap());

        // From a Monday the span is still the following week.
        let (monday, _) = next_week_span(NaiveDate::from_ymd_opt(2026, 3, 9).unwrap());
        assert_eq!(monday, NaiveDate::from_ymd_opt(2026, 3, 16).unwrap());
    }

    #[test]
    fn policy_parses_weekday_numbers_and_falls_back() {
        let policy = ClosurePolicy::from_lookup(|key| match key {
            keys::CLOSURE_WEEKDAY => Some("4".into()),
            keys::CLOSURE_HOUR => Some("16".into()),
            _ => None,
        });
        assert_eq!(policy.weekday, Weekday::Thu);
        assert_eq!(policy.hour, 16);

        let fallback = ClosurePolicy::from_lookup(|key| match key {
            keys::CLOSURE_WEEKDAY => Some("9".into()),
            keys::CLOSURE_HOUR => Some("27".into()),
            _ => None,
        });
        assert_eq!(fallback, ClosurePolicy::default());
    }
}
