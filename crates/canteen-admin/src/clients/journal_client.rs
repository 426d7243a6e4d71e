//! # Journal Client
//!
//! High-level API for the job journal actor.

use crate::journal::{JournalCommand, JournalError, JournalReply};
use crate::model::{JobName, JournalAppend, JournalEntry, JournalOutcome};
use async_trait::async_trait;
use canteen_actors::{ActorError, StoreClient, StoreHandle};
use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, instrument};

/// Client for interacting with the job journal actor.
#[derive(Clone)]
pub struct JournalClient {
    inner: StoreClient<JournalEntry>,
}

impl JournalClient {
    pub fn new(inner: StoreClient<JournalEntry>) -> Self {
        Self { inner }
    }

    /// Whether a `Completed` entry exists for (job, date).
    #[instrument(skip(self))]
    pub async fn has_completed(&self, job: JobName, date: NaiveDate) -> Result<bool, JournalError> {
        debug!("Sending request");
        match self
            .inner
            .command(JournalCommand::HasCompleted { job, date })
            .await
        {
            Ok(JournalReply::Completed(found)) => Ok(found),
            Err(e) => Err(Self::map_error(e)),
        }
    }

    /// Append one journal line.
    #[instrument(skip(self, outcome))]
    pub async fn append(
        &self,
        job: JobName,
        date: NaiveDate,
        outcome: JournalOutcome,
        recorded_at: NaiveDateTime,
    ) -> Result<u64, JournalError> {
        debug!("Sending request");
        self.inner
            .create(JournalAppend {
                job,
                date,
                outcome,
                recorded_at,
            })
            .await
            .map_err(Self::map_error)
    }
}

#[async_trait]
impl StoreHandle<JournalEntry> for JournalClient {
    type Error = JournalError;

    fn inner(&self) -> &StoreClient<JournalEntry> {
        &self.inner
    }

    fn map_error(e: ActorError) -> Self::Error {
        e.entity_as::<JournalError>()
            .cloned()
            .unwrap_or_else(|| JournalError::Actor(e.to_string()))
    }
}
