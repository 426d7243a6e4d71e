//! Once-per-day execution guard for scheduled jobs.

use crate::clients::JournalClient;
use crate::journal::JournalError;
use crate::model::{JobName, JournalOutcome};
use chrono::{NaiveDate, NaiveDateTime};
use tracing::info;

/// Ensures each scheduled job runs at most once per calendar day, backed by
/// the durable job journal.
///
/// Only a `Completed` entry blocks a re-run: a failed attempt leaves the day
/// open so the job retries on its next poll. The guard is check-then-act
/// within one scheduler iteration; it is not a distributed lock, so a
/// multi-instance deployment would need real coordination. Single-instance
/// deployment is assumed.
#[derive(Clone)]
pub struct IdempotencyGuard {
    journal: JournalClient,
}

impl IdempotencyGuard {
    pub fn new(journal: JournalClient) -> Self {
        Self { journal }
    }

    /// Whether `job` already completed for `date`.
    pub async fn has_run(&self, job: JobName, date: NaiveDate) -> Result<bool, JournalError> {
        self.journal.has_completed(job, date).await
    }

    /// Records a successful run with its summary payload.
    pub async fn mark_completed(
        &self,
        job: JobName,
        date: NaiveDate,
        summary: String,
        at: NaiveDateTime,
    ) -> Result<(), JournalError> {
        info!(%job, %date, %summary, "Marking job completed");
        self.journal
            .append(job, date, JournalOutcome::Completed { summary }, at)
            .await?;
        Ok(())
    }

    /// Records a failed attempt for audit. Does not block a retry.
    pub async fn mark_failed(
        &self,
        job: JobName,
        date: NaiveDate,
        error: &str,
        at: NaiveDateTime,
    ) -> Result<(), JournalError> {
        self.journal
            .append(
                job,
                date,
                JournalOutcome::Failed {
                    error: error.to_string(),
                },
                at,
            )
            .await?;
        Ok(())
    }
}
