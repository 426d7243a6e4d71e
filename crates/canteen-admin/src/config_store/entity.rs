//! [`StoreEntity`] implementation for [`ConfigEntry`].
//!
//! Entries are keyed by their configuration key. `Set` is an upsert command
//! so that writing an existing key replaces its value, matching the simple
//! get/set contract the schedulers rely on.

use crate::config_store::ConfigError;
use crate::model::{ConfigEntry, ConfigSet};
use async_trait::async_trait;
use canteen_actors::StoreEntity;
use std::collections::HashMap;

/// Entries change only through the `Upsert`/`Remove` commands.
#[derive(Debug, Clone)]
pub enum ConfigUpdate {}

/// Row filter for configuration queries.
#[derive(Debug, Clone, Default)]
pub struct ConfigQuery {
    pub prefix: Option<String>,
    pub include_deleted: bool,
}

#[derive(Debug, Clone)]
pub enum ConfigCommand {
    /// Insert or replace the entry for `key`. Revives a soft-deleted entry.
    Upsert {
        key: String,
        value: String,
        description: Option<String>,
    },
    /// Soft-delete the entry for `key`.
    Remove { key: String },
}

#[derive(Debug, Clone)]
pub enum ConfigReply {
    Stored,
    /// Whether an entry existed to remove.
    Removed(bool),
}

#[async_trait]
impl StoreEntity for ConfigEntry {
    type Id = String;
    type Create = ConfigSet;
    type Update = ConfigUpdate;
    type Query = ConfigQuery;
    type Command = ConfigCommand;
    type Reply = ConfigReply;
    type Context = ();
    type Error = ConfigError;

    fn id(&self) -> &String {
        &self.key
    }

    /// The generated id is ignored; an entry's key is its identity.
    fn from_create_params(_id: String, params: ConfigSet) -> Result<Self, ConfigError> {
        Ok(ConfigEntry {
            key: params.key,
            value: params.value,
            description: params.description,
            deleted: false,
        })
    }

    fn matches(&self, query: &ConfigQuery) -> bool {
        if self.deleted && !query.include_deleted {
            return false;
        }
        match &query.prefix {
            Some(prefix) => self.key.starts_with(prefix.as_str()),
            None => true,
        }
    }

    async fn apply(
        store: &mut HashMap<String, ConfigEntry>,
        command: ConfigCommand,
        _ctx: &(),
    ) -> Result<ConfigReply, ConfigError> {
        match command {
            ConfigCommand::Upsert {
                key,
                value,
                description,
            } => {
                store.insert(
                    key.clone(),
                    ConfigEntry {
                        key,
                        value,
                        description,
                        deleted: false,
                    },
                );
                Ok(ConfigReply::Stored)
            }
            ConfigCommand::Remove { key } => match store.get_mut(&key) {
                Some(entry) if !entry.deleted => {
                    entry.deleted = true;
                    Ok(ConfigReply::Removed(true))
                }
                _ => Ok(ConfigReply::Removed(false)),
            },
        }
    }

    async fn on_update(&mut self, update: ConfigUpdate, _ctx: &()) -> Result<(), ConfigError> {
        match update {}
    }
}
