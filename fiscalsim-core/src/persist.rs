//! Flat key-value persistence for a game in progress.
//!
//! State, factions and policy values are stored under separate keys as JSON
//! documents. Only policy *values* are written; on restore they are matched
//! back to the catalog by id.

use crate::policy::{PolicyId, PolicyValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

pub const STATE_KEY: &str = "fiscalsim.state";
pub const FACTIONS_KEY: &str = "fiscalsim.factions";
pub const POLICIES_KEY: &str = "fiscalsim.policies";

/// A string-to-string store, such as browser local storage or a JSON file.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<(), PersistError>;
    fn remove(&mut self, key: &str) -> Result<(), PersistError>;
    fn clear(&mut self) -> Result<(), PersistError>;
}

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("failed to decode '{key}': {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One persisted policy value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPolicy {
    pub id: PolicyId,
    pub value: PolicyValue,
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), PersistError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistError> {
        self.entries.remove(key);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), PersistError> {
        self.entries.clear();
        Ok(())
    }
}

/// Serialize `value` under `key`.
pub fn store_json<T: Serialize>(
    store: &mut dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), PersistError> {
    let json = serde_json::to_string(value).map_err(|source| PersistError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.set(key, json)
}

/// Deserialize the value under `key`; `Ok(None)` if the key is absent.
pub fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, PersistError> {
    store
        .get(key)
        .map(|json| {
            serde_json::from_str(&json).map_err(|source| PersistError::Decode {
                key: key.to_string(),
                source,
            })
        })
        .transpose()
}
