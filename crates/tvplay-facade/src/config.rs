//! Facade configuration.

use serde::{Deserialize, Serialize};
use tvplay_core::Result;

/// Forward seek applied after an audio-sink fault, in milliseconds.
const DEFAULT_AUDIO_FAULT_SEEK_MS: i64 = 200;

/// Durations above this count as video-on-demand (5 minutes).
const DEFAULT_VOD_THRESHOLD_MS: i64 = 5 * 60 * 1000;

/// Tunables of the playback facade.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FacadeConfig {
    /// Recovery seek after an audio-sink fault. Zero disables it.
    pub audio_fault_seek_ms: i64,
    pub vod_threshold_ms: i64,
}

impl Default for FacadeConfig {
    fn default() -> Self {
        Self {
            audio_fault_seek_ms: DEFAULT_AUDIO_FAULT_SEEK_MS,
            vod_threshold_ms: DEFAULT_VOD_THRESHOLD_MS,
        }
    }
}

impl FacadeConfig {
    /// Load from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub const fn with_audio_fault_seek_ms(mut self, millis: i64) -> Self {
        self.audio_fault_seek_ms = millis;
        self
    }

    #[must_use]
    pub const fn with_vod_threshold_ms(mut self, millis: i64) -> Self {
        self.vod_threshold_ms = millis;
        self
    }
}
