//! Nightly status sweep.
//!
//! At 23:59 the day's still-pre-ordered meals are flipped to not-retrieved.
//! The guard marker is durable (journal-backed), so a process restart around
//! midnight cannot cause a second sweep for the same date; and since the
//! sweep filter already excludes swept rows, even a duplicate run would only
//! waste work, not corrupt state.

use crate::clients::OrderBookClient;
use crate::guard::IdempotencyGuard;
use crate::model::JobName;
use crate::scheduling::{JobError, JobOutcome, ScheduledJob};
use async_trait::async_trait;
use chrono::{NaiveDateTime, Timelike};
use std::time::Duration;
use tracing::debug;

const POLL_INTERVAL: Duration = Duration::from_secs(60);
const SWEEP_HOUR: u32 = 23;
const SWEEP_MINUTE: u32 = 59;

/// Audit identity stamped on swept orders.
const SWEEP_ACTOR: &str = "status-sweep";

/// The nightly not-retrieved sweep job.
pub struct StatusSweepScheduler {
    orders: OrderBookClient,
    guard: IdempotencyGuard,
}

impl StatusSweepScheduler {
    pub fn new(orders: OrderBookClient, guard: IdempotencyGuard) -> Self {
        Self { orders, guard }
    }
}

#[async_trait]
impl ScheduledJob for StatusSweepScheduler {
    fn name(&self) -> JobName {
        JobName::StatusSweep
    }

    fn poll_interval(&self) -> Duration {
        POLL_INTERVAL
    }

    fn guard(&self) -> &IdempotencyGuard {
        &self.guard
    }

    async fn execute(&self, now: NaiveDateTime) -> Result<JobOutcome, JobError> {
        if now.hour() != SWEEP_HOUR || now.minute() < SWEEP_MINUTE {
            return Ok(JobOutcome::Skipped);
        }

        let today = now.date();
        if self.guard.has_run(JobName::StatusSweep, today).await? {
            debug!("Sweep already recorded today");
            return Ok(JobOutcome::Skipped);
        }

        let swept = self
            .orders
            .sweep_not_retrieved(today, SWEEP_ACTOR.into(), now)
            .await?;
        let summary = format!("{swept} orders marked not-retrieved for {today}");
        self.guard
            .mark_completed(JobName::StatusSweep, today, summary.clone(), now)
            .await?;
        Ok(JobOutcome::Completed(summary))
    }
}
