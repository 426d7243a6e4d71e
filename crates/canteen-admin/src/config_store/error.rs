//! Error types for the configuration store.

use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    /// The requested entry does not exist.
    #[error("Configuration entry not found: {0}")]
    NotFound(String),

    /// An error occurred while communicating with the actor system.
    #[error("Configuration store communication error: {0}")]
    Actor(String),
}

impl From<String> for ConfigError {
    fn from(msg: String) -> Self {
        ConfigError::Actor(msg)
    }
}
