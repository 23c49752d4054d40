//! Player display name
//!
//! Prompted once, then persisted so every later round (and reload) reuses it.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::MAX_NAME_LEN;
use crate::platform::{KeyValueStore, StorageError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("display name cannot be empty")]
    Empty,
}

/// A non-empty, trimmed display name of at most `MAX_NAME_LEN` characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerIdentity(String);

impl PlayerIdentity {
    /// Storage key (shared with earlier builds of the game)
    pub const STORAGE_KEY: &'static str = "displayName";

    /// Validate raw prompt input
    pub fn parse(raw: &str) -> Result<Self, IdentityError> {
        let name: String = raw.trim().chars().take(MAX_NAME_LEN).collect();
        let name = name.trim_end().to_string();
        if name.is_empty() {
            return Err(IdentityError::Empty);
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Load the stored name, if any valid one exists
    pub fn load(store: &dyn KeyValueStore) -> Option<Self> {
        let raw = store.get(Self::STORAGE_KEY)?;
        match Self::parse(&raw) {
            Ok(identity) => {
                log::info!("Welcome back, {}", identity);
                Some(identity)
            }
            Err(_) => {
                log::warn!("Ignoring blank stored display name");
                None
            }
        }
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> Result<(), StorageError> {
        store.set(Self::STORAGE_KEY, &self.0)?;
        log::info!("Display name saved");
        Ok(())
    }
}

impl fmt::Display for PlayerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PlayerIdentity {
    type Error = IdentityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PlayerIdentity> for String {
    fn from(identity: PlayerIdentity) -> Self {
        identity.0
    }
}
