//! Evening auto-confirmation of same-day orders.
//!
//! When enabled, internal orders still pre-ordered at 21:00 are confirmed as
//! consumed, each receiving its physical consumption record. Orders the
//! sweep would otherwise flip to not-retrieved at 23:59 are therefore
//! settled in the user's favour when the site runs in trust mode.

use crate::clients::{ConfigClient, OrderBookClient};
use crate::guard::IdempotencyGuard;
use crate::model::config::{self, keys};
use crate::model::JobName;
use crate::scheduling::{JobError, JobOutcome, ScheduledJob};
use async_trait::async_trait;
use chrono::{NaiveDateTime, Timelike};
use std::time::Duration;
use tracing::debug;

const POLL_INTERVAL: Duration = Duration::from_secs(5 * 60);
const CONFIRM_HOUR: u32 = 21;

/// Audit identity stamped on auto-confirmed orders.
const CONFIRM_ACTOR: &str = "auto-confirmation";

/// The evening auto-confirmation job.
pub struct AutoConfirmScheduler {
    orders: OrderBookClient,
    config: ConfigClient,
    guard: IdempotencyGuard,
}

impl AutoConfirmScheduler {
    pub fn new(orders: OrderBookClient, config: ConfigClient, guard: IdempotencyGuard) -> Self {
        Self {
            orders,
            config,
            guard,
        }
    }
}

#[async_trait]
impl ScheduledJob for AutoConfirmScheduler {
    fn name(&self) -> JobName {
        JobName::AutoConfirm
    }

    fn poll_interval(&self) -> Duration {
        POLL_INTERVAL
    }

    fn guard(&self) -> &IdempotencyGuard {
        &self.guard
    }

    async fn execute(&self, now: NaiveDateTime) -> Result<JobOutcome, JobError> {
        let enabled = config::parse_flag(
            self.config.get(keys::AUTO_CONFIRMATION).await?.as_deref(),
            false,
            keys::AUTO_CONFIRMATION,
        );
        if !enabled {
            return Ok(JobOutcome::Skipped);
        }
        if now.hour() < CONFIRM_HOUR {
            return Ok(JobOutcome::Skipped);
        }

        let today = now.date();
        if self.guard.has_run(JobName::AutoConfirm, today).await? {
            debug!("Auto-confirmation already recorded today");
            return Ok(JobOutcome::Skipped);
        }

        let confirmed = self
            .orders
            .auto_confirm(today, CONFIRM_ACTOR.into(), now)
            .await?;
        let summary = format!("{confirmed} orders auto-confirmed for {today}");
        self.guard
            .mark_completed(JobName::AutoConfirm, today, summary.clone(), now)
            .await?;
        Ok(JobOutcome::Completed(summary))
    }
}
