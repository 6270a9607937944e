//! Drawing style presets
//!
//! A [`StyleConfig`] decides which tracking signal drives which stroke
//! parameter and how strongly. Presets are immutable; changing style swaps
//! the whole value.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::random::RandomSource;

/// Style preset configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleConfig {
    /// Human-readable name
    pub name: String,

    /// Pressure follows the microphone level instead of hand stillness
    pub pressure_from_audio: bool,
    /// Width shrinks with hand speed instead of following pressure
    pub width_from_hand_speed: bool,
    /// Opacity grows with head tilt
    pub opacity_from_face_tilt: bool,
    /// Slow hands smudge the stroke
    pub smudge_from_stillness: bool,

    pub audio_sensitivity: f32,
    pub hand_speed_sensitivity: f32,
    pub face_tilt_sensitivity: f32,

    /// Base stroke width in pixels
    pub base_width: f32,
    /// Base opacity 0.0-1.0
    pub base_opacity: f32,
    /// Texture dots on replay, 0.0-1.0
    pub texture_amount: f32,
    /// Normalized speed below which smudging starts
    pub smudge_threshold: f32,

    /// Cursor smoothing weight: 0 = raw, 1 = frozen
    pub inertia: f32,
    /// Cursor jitter amplitude (scaled by 10 pixels)
    pub jitter: f32,

    pub occasional_erase: bool,
    /// Draw above which a frame turns into an erase stroke
    pub erase_threshold: f32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self::charcoal()
    }
}

impl StyleConfig {
    /// The charcoal preset every session starts with
    pub fn charcoal() -> Self {
        Self {
            name: "Charcoal".to_string(),
            pressure_from_audio: true,
            width_from_hand_speed: true,
            opacity_from_face_tilt: true,
            smudge_from_stillness: true,
            audio_sensitivity: 2.0,
            hand_speed_sensitivity: 1.2,
            face_tilt_sensitivity: 1.0,
            base_width: 1.8,
            base_opacity: 0.7,
            texture_amount: 0.6,
            smudge_threshold: 0.25,
            inertia: 0.7,
            jitter: 0.2,
            occasional_erase: true,
            erase_threshold: 0.92,
        }
    }

    /// Sample a fresh preset. Each flag and scalar is drawn independently,
    /// in declaration order.
    pub fn randomized(rng: &mut impl RandomSource) -> Self {
        let style = Self {
            name: "Random".to_string(),
            pressure_from_audio: rng.next_f32() > 0.5,
            width_from_hand_speed: rng.next_f32() > 0.3,
            opacity_from_face_tilt: rng.next_f32() > 0.4,
            smudge_from_stillness: rng.next_f32() > 0.2,
            audio_sensitivity: rng.range(0.5, 2.5),
            hand_speed_sensitivity: rng.range(0.2, 1.7),
            face_tilt_sensitivity: rng.range(0.5, 1.5),
            base_width: rng.range(0.5, 2.0),
            base_opacity: rng.range(0.3, 0.8),
            texture_amount: rng.range(0.0, 0.7),
            smudge_threshold: rng.range(0.1, 0.4),
            inertia: rng.range(0.5, 0.9),
            jitter: rng.range(0.0, 0.3),
            occasional_erase: rng.next_f32() > 0.7,
            erase_threshold: rng.range(0.85, 0.95),
        };
        debug!("StyleConfig::randomized: {:?}", style);
        style
    }
}
