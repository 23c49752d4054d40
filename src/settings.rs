//! Game settings and preferences
//!
//! Persisted separately from the display name in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::platform::{KeyValueStore, StorageError};
use crate::sim::HitLockPolicy;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Mute all cues
    pub muted: bool,

    // === Gameplay ===
    /// Which entities ignore a repeated hit during the squash animation
    pub hit_lock: HitLockPolicy,

    // === Accessibility ===
    /// Skip the squash animation
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            hit_lock: HitLockPolicy::AllEntities,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "bug_squash_settings";

    /// Effective cue volume (0 when muted)
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume.clamp(0.0, 1.0) * self.sfx_volume.clamp(0.0, 1.0)
        }
    }

    /// Load settings, falling back to defaults on a missing or unreadable blob
    pub fn load(store: &dyn KeyValueStore) -> Self {
        if let Some(json) = store.get(Self::STORAGE_KEY) {
            match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from storage");
                    return settings;
                }
                Err(e) => log::warn!("Discarding unreadable settings: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> Result<(), StorageError> {
        let json = serde_json::to_string(self)?;
        store.set(Self::STORAGE_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
