//! Error types for the job journal.

use thiserror::Error;

/// Errors that can occur during journal operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum JournalError {
    /// An error occurred while communicating with the actor system.
    #[error("Job journal communication error: {0}")]
    Actor(String),
}

impl From<String> for JournalError {
    fn from(msg: String) -> Self {
        JournalError::Actor(msg)
    }
}
