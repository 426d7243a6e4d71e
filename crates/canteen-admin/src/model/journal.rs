//! Append-only job journal records.
//!
//! The journal replaces the configuration-table markers of older designs: it
//! is the durable memory of which scheduled job ran on which calendar day,
//! and of failed attempts kept for audit.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// The scheduled jobs that write journal entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobName {
    Closure,
    StatusSweep,
    Billing,
    AutoConfirm,
}

impl JobName {
    pub fn as_str(self) -> &'static str {
        match self {
            JobName::Closure => "CLOSURE",
            JobName::StatusSweep => "STATUS_SWEEP",
            JobName::Billing => "BILLING",
            JobName::AutoConfirm => "AUTO_CONFIRM",
        }
    }
}

impl Display for JobName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a recorded job attempt ended.
///
/// Only a `Completed` entry blocks a same-day re-run; a `Failed` entry is
/// audit data, and the job retries on its next poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JournalOutcome {
    Completed { summary: String },
    Failed { error: String },
}

/// One journal line. Append-only: never edited, never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: u64,
    pub job: JobName,
    /// The calendar day the attempt belongs to.
    pub date: NaiveDate,
    pub outcome: JournalOutcome,
    pub recorded_at: NaiveDateTime,
}

/// Payload for appending a journal line.
#[derive(Debug, Clone)]
pub struct JournalAppend {
    pub job: JobName,
    pub date: NaiveDate,
    pub outcome: JournalOutcome,
    pub recorded_at: NaiveDateTime,
}
