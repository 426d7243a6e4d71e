//! Scheduled background jobs and their shared poll-loop harness.
//!
//! Every job is an independent tokio task that wakes on a fixed interval,
//! decides whether its moment has come, does one unit of work through the
//! store clients, and goes back to sleep. Precision is deliberately coarse:
//! the cutoff predicates tolerate late polls, and the once-per-day guard
//! absorbs double fires.
//!
//! The decision step ([`ScheduledJob::execute`]) takes the current wall
//! clock as a parameter, so tests drive it with pinned timestamps and never
//! wait on real timers.

pub mod autoconfirm;
pub mod billing;
pub mod closure;
pub mod sweep;

pub use autoconfirm::AutoConfirmScheduler;
pub use billing::BillingReconciler;
pub use closure::ClosureScheduler;
pub use sweep::StatusSweepScheduler;

use crate::config_store::ConfigError;
use crate::guard::IdempotencyGuard;
use crate::journal::JournalError;
use crate::model::JobName;
use crate::order_book::OrderError;
use crate::quota::QuotaError;
use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

/// Errors a job iteration can surface.
#[derive(Debug, Error)]
pub enum JobError {
    #[error(transparent)]
    Order(#[from] OrderError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Journal(#[from] JournalError),
    #[error(transparent)]
    Quota(#[from] QuotaError),
}

/// What one poll iteration did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// Not the job's moment (wrong time, disabled, or already ran today).
    Skipped,
    /// The job ran; the summary is also journaled with the day marker.
    Completed(String),
}

/// A background job driven by the poll-loop harness.
#[async_trait]
pub trait ScheduledJob: Send + Sync + 'static {
    fn name(&self) -> JobName;

    fn poll_interval(&self) -> Duration;

    fn guard(&self) -> &IdempotencyGuard;

    /// One decision-and-work step at the given wall-clock time.
    async fn execute(&self, now: NaiveDateTime) -> Result<JobOutcome, JobError>;

    /// Runs one iteration, journaling a failed attempt for audit. A failure
    /// does not write the day marker, so the job retries on the next poll.
    async fn run_once(&self, now: NaiveDateTime) -> Result<JobOutcome, JobError> {
        match self.execute(now).await {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                if let Err(journal_err) = self
                    .guard()
                    .mark_failed(self.name(), now.date(), &err.to_string(), now)
                    .await
                {
                    warn!(job = %self.name(), error = %journal_err, "Could not journal the failure");
                }
                Err(err)
            }
        }
    }
}

/// Spawns the poll loop for a job.
///
/// The loop wakes every `poll_interval`, runs one iteration, and exits when
/// the shutdown signal flips. An iteration error is logged and the loop
/// continues; nothing short of shutdown stops a scheduler. In-flight store
/// commands always run to completion because shutdown is only observed
/// between iterations.
pub fn spawn<J: ScheduledJob>(job: J, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(job.poll_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(job = %job.name(), "Scheduler started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let now = Local::now().naive_local();
                    match job.run_once(now).await {
                        Ok(JobOutcome::Skipped) => {}
                        Ok(JobOutcome::Completed(summary)) => {
                            // The structured completion event doubles as the
                            // notification feed for downstream consumers.
                            info!(job = %job.name(), %summary, "Job completed");
                        }
                        Err(error) => {
                            warn!(job = %job.name(), %error, "Job iteration failed");
                        }
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!(job = %job.name(), "Scheduler stopped");
    })
}
