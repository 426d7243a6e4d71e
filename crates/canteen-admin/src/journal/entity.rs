//! [`StoreEntity`] implementation for [`JournalEntry`].
//!
//! The journal is append-only: entries are created and scanned, never
//! updated or deleted. `HasCompleted` is the existence check behind the
//! once-per-day guard.

use crate::journal::JournalError;
use crate::model::{JobName, JournalAppend, JournalEntry, JournalOutcome};
use async_trait::async_trait;
use canteen_actors::StoreEntity;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Entries are immutable once written.
#[derive(Debug, Clone)]
pub enum JournalUpdate {}

/// Row filter for journal queries.
#[derive(Debug, Clone, Default)]
pub struct JournalQuery {
    pub job: Option<JobName>,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub enum JournalCommand {
    /// Does a `Completed` entry exist for (job, date)?
    HasCompleted { job: JobName, date: NaiveDate },
}

#[derive(Debug, Clone)]
pub enum JournalReply {
    Completed(bool),
}

#[async_trait]
impl StoreEntity for JournalEntry {
    type Id = u64;
    type Create = JournalAppend;
    type Update = JournalUpdate;
    type Query = JournalQuery;
    type Command = JournalCommand;
    type Reply = JournalReply;
    type Context = ();
    type Error = JournalError;

    fn id(&self) -> &u64 {
        &self.id
    }

    fn from_create_params(id: u64, params: JournalAppend) -> Result<Self, JournalError> {
        Ok(JournalEntry {
            id,
            job: params.job,
            date: params.date,
            outcome: params.outcome,
            recorded_at: params.recorded_at,
        })
    }

    fn matches(&self, query: &JournalQuery) -> bool {
        if let Some(job) = query.job {
            if self.job != job {
                return false;
            }
        }
        if let Some(date) = query.date {
            if self.date != date {
                return false;
            }
        }
        true
    }

    async fn apply(
        store: &mut HashMap<u64, JournalEntry>,
        command: JournalCommand,
        _ctx: &(),
    ) -> Result<JournalReply, JournalError> {
        match command {
            JournalCommand::HasCompleted { job, date } => {
                let found = store.values().any(|entry| {
                    entry.job == job
                        && entry.date == date
                        && matches!(entry.outcome, JournalOutcome::Completed { .. })
                });
                Ok(JournalReply::Completed(found))
            }
        }
    }

    async fn on_update(&mut self, update: JournalUpdate, _ctx: &()) -> Result<(), JournalError> {
        match update {}
    }
}
