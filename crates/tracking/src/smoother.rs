//! Cursor smoothing
//!
//! Exponential inertia filter from raw canvas samples to a stable cursor,
//! plus per-frame velocity from consecutive raw samples.

use glam::Vec2;
use painting::RandomSource;

/// Jitter amplitude per unit of style jitter
const JITTER_SCALE: f32 = 10.0;

/// Smoothed cursor for the tracked index fingertip
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CursorState {
    /// Smoothed position in canvas pixels
    pub position: Vec2,
    /// Smoothed position of the previous frame
    pub previous_position: Vec2,
    /// Raw delta between the last two samples, pixels per frame
    pub velocity: Vec2,
    /// Last raw sample, `None` while no hand is tracked
    previous_raw: Option<Vec2>,
}

impl CursorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the last frame had a hand
    pub fn is_tracking(&self) -> bool {
        self.previous_raw.is_some()
    }

    /// Feed one raw sample.
    ///
    /// The first sample after acquisition is taken verbatim with zero
    /// velocity. Later samples blend with `inertia` (clamped to 0.0-1.0)
    /// and get `(r - 0.5) * jitter * 10` added per axis when `jitter > 0`.
    /// Returns `true` when this sample acquired the hand.
    pub fn update(
        &mut self,
        raw: Vec2,
        inertia: f32,
        jitter: f32,
        rng: &mut impl RandomSource,
    ) -> bool {
        self.previous_position = self.position;

        let Some(previous_raw) = self.previous_raw.replace(raw) else {
            self.position = raw;
            self.velocity = Vec2::ZERO;
            return true;
        };

        self.velocity = raw - previous_raw;

        let inertia = inertia.clamp(0.0, 1.0);
        let mut position = self.position * inertia + raw * (1.0 - inertia);
        if jitter > 0.0 {
            position.x += rng.centered() * jitter * JITTER_SCALE;
            position.y += rng.centered() * jitter * JITTER_SCALE;
        }
        self.position = position;
        false
    }

    /// Forget the raw sample so the next detection is an acquisition
    pub fn lose_track(&mut self) {
        self.previous_raw = None;
        self.velocity = Vec2::ZERO;
    }
}
