//! # Configuration Client
//!
//! High-level API for the configuration store actor, exposing the simple
//! get/set key-value contract.

use crate::config_store::{ConfigCommand, ConfigError, ConfigQuery, ConfigReply};
use crate::model::ConfigEntry;
use async_trait::async_trait;
use canteen_actors::{ActorError, StoreClient, StoreHandle};
use tracing::{debug, instrument};

/// Client for interacting with the configuration store actor.
#[derive(Clone)]
pub struct ConfigClient {
    inner: StoreClient<ConfigEntry>,
}

impl ConfigClient {
    pub fn new(inner: StoreClient<ConfigEntry>) -> Self {
        Self { inner }
    }

    /// The stored value for `key`, or `None` when unset or soft-deleted.
    #[instrument(skip(self))]
    pub async fn get(&self, key: &str) -> Result<Option<String>, ConfigError> {
        debug!("Sending request");
        let entry = self
            .inner
            .get(key.to_string())
            .await
            .map_err(Self::map_error)?;
        Ok(entry.filter(|e| !e.deleted).map(|e| e.value))
    }

    /// Store a value under `key`, replacing any previous value.
    #[instrument(skip(self, value, description))]
    pub async fn set(
        &self,
        key: &str,
        value: &str,
        description: Option<&str>,
    ) -> Result<(), ConfigError> {
        debug!("Sending request");
        match self
            .inner
            .command(ConfigCommand::Upsert {
                key: key.to_string(),
                value: value.to_string(),
                description: description.map(str::to_string),
            })
            .await
        {
            Ok(ConfigReply::Stored) => Ok(()),
            Ok(_) => unreachable!("Upsert must return Stored"),
            Err(e) => Err(Self::map_error(e)),
        }
    }

    /// Soft-delete the entry for `key`. Returns whether it existed.
    #[instrument(skip(self))]
    pub async fn remove(&self, key: &str) -> Result<bool, ConfigError> {
        debug!("Sending request");
        match self
            .inner
            .command(ConfigCommand::Remove {
                key: key.to_string(),
            })
            .await
        {
            Ok(ConfigReply::Removed(existed)) => Ok(existed),
            Ok(_) => unreachable!("Remove must return Removed"),
            Err(e) => Err(Self::map_error(e)),
        }
    }

    /// All live entries whose key starts with `prefix`.
    #[instrument(skip(self))]
    pub async fn entries_with_prefix(&self, prefix: &str) -> Result<Vec<ConfigEntry>, ConfigError> {
        self.query(ConfigQuery {
            prefix: Some(prefix.to_string()),
            include_deleted: false,
        })
        .await
    }
}

#[async_trait]
impl StoreHandle<ConfigEntry> for ConfigClient {
    type Error = ConfigError;

    fn inner(&self) -> &StoreClient<ConfigEntry> {
        &self.inner
    }

    fn map_error(e: ActorError) -> Self::Error {
        e.entity_as::<ConfigError>()
            .cloned()
            .unwrap_or_else(|| ConfigError::Actor(e.to_string()))
    }
}
