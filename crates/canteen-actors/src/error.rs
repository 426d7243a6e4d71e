//! # Framework Errors
//!
//! Common error types shared by every store actor and client. Centralizing
//! them keeps error handling uniform across the system.

/// Errors that can occur within the store-actor machinery itself.
#[derive(Debug, thiserror::Error)]
pub enum ActorError {
    #[error("Store actor closed")]
    Closed,
    #[error("Store actor dropped response channel")]
    Dropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Entity error: {0}")]
    Entity(Box<dyn std::error::Error + Send + Sync>),
}

impl ActorError {
    /// Wraps a domain error produced inside an entity hook or command.
    pub fn entity<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ActorError::Entity(Box::new(err))
    }

    /// Recovers the typed domain error a store actor reported, if any.
    ///
    /// Clients use this to translate an `Entity` wrapper back into their own
    /// error enum instead of flattening everything into a string.
    pub fn entity_as<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        match self {
            ActorError::Entity(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }
}
