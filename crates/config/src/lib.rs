//! Shared configuration for Graphite
//!
//! This crate provides the single source of truth for canvas dimensions and
//! the audio/gesture tunables used by the session. Every section has
//! defaults, so a config file only needs the fields it wants to change.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

/// Default canvas width in pixels
pub const DEFAULT_WIDTH: u32 = 1280;

/// Default canvas height in pixels
pub const DEFAULT_HEIGHT: u32 = 720;

/// Environment variable holding a config file path
pub const CONFIG_ENV_VAR: &str = "GRAPHITE_CONFIG";

/// Errors raised while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Display configuration for the drawing canvas
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Canvas width in logical pixels
    pub width: u32,
    /// Canvas height in logical pixels
    pub height: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

/// Probabilities and timing for gesture-driven audio
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Chance that a `startRecording` dispatch actually records
    pub recording_probability: f32,
    /// Chance that a `playLastRecording` dispatch (or a finished recording) plays
    pub playback_probability: f32,
    /// Chance that playback is routed through the randomly picked effect
    pub effect_apply_probability: f32,
    /// Side roll after every dispatch that starts a recording on its own
    pub spontaneous_recording_probability: f32,
    /// Shortest recording length
    pub min_recording_ms: u64,
    /// Random extra recording length on top of the minimum
    pub recording_jitter_ms: u64,
    /// Recordings kept before the oldest is released
    pub max_recordings: usize,
    /// Shortest per-mapping cooldown
    pub min_cooldown_ms: u64,
    /// Random extra cooldown on top of the minimum
    pub cooldown_jitter_ms: u64,
    /// Lowest confidence threshold assigned to a mapping
    pub min_threshold: f32,
    /// Random extra threshold on top of the minimum
    pub threshold_jitter: f32,
    /// Audio level polling period
    pub level_poll_interval_ms: u64,
    /// Player volume in decibels
    pub player_volume_db: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            recording_probability: 0.15,
            playback_probability: 0.2,
            effect_apply_probability: 0.25,
            spontaneous_recording_probability: 0.05,
            min_recording_ms: 2000,
            recording_jitter_ms: 5000,
            max_recordings: 10,
            min_cooldown_ms: 1000,
            cooldown_jitter_ms: 2000,
            min_threshold: 0.6,
            threshold_jitter: 0.3,
            level_poll_interval_ms: 50,
            player_volume_db: -10.0,
        }
    }
}

impl AudioConfig {
    pub fn level_poll_interval(&self) -> Duration {
        Duration::from_millis(self.level_poll_interval_ms.max(1))
    }
}

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphiteConfig {
    pub display: DisplayConfig,
    pub audio: AudioConfig,
}

impl GraphiteConfig {
    /// Parse a config from JSON text
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json(&text)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load from `GRAPHITE_CONFIG` if set, defaults otherwise
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) if !path.is_empty() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }
}
